//! Shared UI components for the console.

pub mod error_alert;
pub mod form_inputs;
pub mod layout;
pub mod modal;
pub mod nav;
pub mod status_badge;

pub use error_alert::ErrorAlert;
pub use layout::{HeadAssets, Layout};
pub use modal::Modal;
pub use nav::Nav;
pub use status_badge::StatusBadge;
