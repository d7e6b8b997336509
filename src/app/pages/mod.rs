//! Page components, one module per route.

mod admin;
mod api_keys;
mod commissions;
mod dashboard;
mod login;
mod pay;
mod personalization;
mod referrals;
mod register;
mod settings;
mod tickets;
mod transactions;
mod transfers;
mod withdrawals;

pub use admin::Admin;
pub use api_keys::ApiKeys;
pub use commissions::Commissions;
pub use dashboard::Dashboard;
pub use login::Login;
pub use pay::Pay;
pub use personalization::PersonalizationPage;
pub use referrals::Referrals;
pub use register::Register;
pub use settings::Settings;
pub use tickets::Tickets;
pub use transactions::Transactions;
pub use transfers::Transfers;
pub use withdrawals::Withdrawals;
