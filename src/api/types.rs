//! Request/response types for the platform backend.
//!
//! Shapes are owned by the backend; fields the console does not strictly
//! need are defaulted so schema additions never break decoding. All money
//! amounts are integer centavos.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

// =============================================================================
// Auth Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub balance_cents: i64,
    #[serde(default)]
    pub two_factor_enabled: bool,
    #[serde(default)]
    pub referral_code: String,
    #[serde(default)]
    pub created_at: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Loose login response: either `{token, user}` or a 2FA challenge
/// `{two_factor_required: true, ticket}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub two_factor_required: bool,
    #[serde(default)]
    pub ticket: Option<String>,
}

/// Typed outcome the client derives from [`LoginResponse`].
#[derive(Clone, Debug, PartialEq)]
pub enum LoginOutcome {
    Authenticated(User),
    /// Credentials were valid; a TOTP code must be exchanged with the ticket.
    TwoFactorRequired {
        ticket: String,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

/// Secret material returned when enabling 2FA; shown once, then confirmed
/// with a TOTP code.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TwoFactorSetup {
    pub secret: String,
    #[serde(default)]
    pub otpauth_url: String,
}

// =============================================================================
// Platform Config Types
// =============================================================================

/// Unauthenticated branding/limits used by login, register and pay pages.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PublicConfig {
    #[serde(default)]
    pub platform_name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub support_email: Option<String>,
    #[serde(default)]
    pub min_withdrawal_cents: i64,
    #[serde(default = "default_true")]
    pub registration_enabled: bool,
}

// =============================================================================
// Transaction Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount_cents: i64,
    #[serde(default)]
    pub fee_cents: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub payer_name: Option<String>,
    #[serde(default)]
    pub payer_document: Option<String>,
    /// QR image as a data URL, present on freshly created charges.
    #[serde(default)]
    pub qr_code: Option<String>,
    /// PIX "copia e cola" payload.
    #[serde(default)]
    pub qr_code_text: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub paid_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionStatus {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub paid_at: Option<String>,
}

impl TransactionStatus {
    pub fn is_paid(&self) -> bool {
        self.status == "paid"
    }

    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NewChargeRequest {
    pub amount_cents: i64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_document: Option<String>,
}

// =============================================================================
// Withdrawal Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Withdrawal {
    pub id: String,
    #[serde(default)]
    pub amount_cents: i64,
    #[serde(default)]
    pub fee_cents: i64,
    #[serde(default)]
    pub net_cents: i64,
    #[serde(default)]
    pub pix_key: String,
    #[serde(default)]
    pub pix_key_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub processed_at: Option<String>,
}

/// Fee breakdown previewed before submitting a withdrawal or transfer.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FeePreview {
    pub amount_cents: i64,
    pub fee_cents: i64,
    pub net_cents: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NewWithdrawalRequest {
    pub amount_cents: i64,
    pub pix_key: String,
    pub pix_key_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_factor_code: Option<String>,
}

// =============================================================================
// Transfer Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Transfer {
    pub id: String,
    /// "sent" or "received" relative to the current user.
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub counterparty: String,
    #[serde(default)]
    pub amount_cents: i64,
    #[serde(default)]
    pub fee_cents: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
}

impl Transfer {
    pub fn is_received(&self) -> bool {
        self.direction == "received"
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FrequentRecipient {
    pub wallet: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub transfer_count: u32,
}

/// Result of a recipient wallet lookup before an internal transfer.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WalletLookup {
    pub wallet: String,
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub name: Option<String>,
}

impl WalletLookup {
    /// A transfer may proceed only when the lookup resolved to a named
    /// account holder.
    pub fn names_recipient(&self) -> bool {
        self.found && self.name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NewTransferRequest {
    pub wallet: String,
    pub amount_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// Referral / Commission Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ReferralSummary {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub total_referred: u32,
    #[serde(default)]
    pub active_referred: u32,
    #[serde(default)]
    pub earnings_cents: i64,
    #[serde(default)]
    pub referred: Vec<ReferredUser>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ReferredUser {
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub volume_cents: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CommissionReport {
    #[serde(default)]
    pub total_cents: i64,
    #[serde(default)]
    pub pending_cents: i64,
    #[serde(default)]
    pub entries: Vec<CommissionEntry>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CommissionEntry {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub referred_name: String,
    #[serde(default)]
    pub amount_cents: i64,
}

// =============================================================================
// Support Ticket Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub id: String,
    pub subject: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub messages: Vec<TicketMessage>,
}

impl Ticket {
    pub fn is_closed(&self) -> bool {
        self.status == "closed"
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TicketMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub author: String,
    pub body: String,
    #[serde(default)]
    pub from_support: bool,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NewTicketRequest {
    pub subject: String,
    pub body: String,
}

// =============================================================================
// API Key Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    /// First characters of the key, for identification in lists.
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_used_at: Option<String>,
}

/// Returned once on creation; `secret` is never retrievable again.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiKeyCreated {
    pub secret: String,
    pub api_key: ApiKey,
}

// =============================================================================
// Personalization Types
// =============================================================================

/// Per-tenant branding applied to the public payment page.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Personalization {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub checkout_message: String,
}

// =============================================================================
// Public Payment Page Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PublicCharge {
    pub code: String,
    #[serde(default)]
    pub platform_name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Fixed amount; `None` means the payer chooses.
    #[serde(default)]
    pub amount_cents: Option<i64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PayRequest {
    pub payer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PayReceipt {
    pub transaction_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub qr_code_text: Option<String>,
}

// =============================================================================
// Push Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct VapidKeyResponse {
    #[serde(default)]
    pub key: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PushSubscriptionRequest {
    pub endpoint: String,
    pub keys: PushKeys,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

// =============================================================================
// Admin Types
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_transactions: u64,
    #[serde(default)]
    pub transactions_today: u64,
    #[serde(default)]
    pub volume_cents: i64,
    #[serde(default)]
    pub fees_cents: i64,
    #[serde(default)]
    pub pending_withdrawals: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub balance_cents: i64,
    #[serde(default)]
    pub volume_cents: i64,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminWithdrawal {
    pub id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub amount_cents: i64,
    #[serde(default)]
    pub net_cents: i64,
    #[serde(default)]
    pub pix_key: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
}

/// Platform-wide settings editable by admins.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PlatformConfig {
    #[serde(default)]
    pub platform_name: String,
    #[serde(default)]
    pub support_email: String,
    #[serde(default)]
    pub deposit_fee_percent: f64,
    #[serde(default)]
    pub deposit_fee_fixed_cents: i64,
    #[serde(default)]
    pub withdrawal_fee_percent: f64,
    #[serde(default)]
    pub withdrawal_fee_fixed_cents: i64,
    #[serde(default)]
    pub min_withdrawal_cents: i64,
    #[serde(default = "default_true")]
    pub registration_enabled: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
}
