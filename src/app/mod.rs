//! Dioxus fullstack application entry point.
//!
//! The root component installs the shared contexts (theme, toasts, the
//! session/API context), starts the background transfer watcher, and
//! mounts the router.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;

pub mod auth;
pub mod clipboard;
pub mod components;
pub mod format;
pub mod pages;
pub mod theme;
pub mod toast;

use auth::{use_api, use_auth, use_auth_provider, RequireAuth};
use pages::{
    Admin, ApiKeys, Commissions, Dashboard, Login, Pay, PersonalizationPage, Referrals, Register,
    Settings, Tickets, Transactions, Transfers, Withdrawals,
};
use theme::use_theme_provider;
use toast::{use_toast, use_toast_provider};

use crate::notify::NotificationPayload;
use crate::poll::{self, CancelGuard};
use crate::session::SessionPhase;

/// Root app component with routing
#[component]
pub fn App() -> Element {
    // Initialize theme context at app root (handles localStorage + DOM class)
    use_theme_provider();

    // Toast context must exist before any page or background task fires one.
    use_toast_provider();

    // Session context: owns the shared API client and the startup probe.
    use_auth_provider();

    rsx! {
        SessionServices {}
        Router::<Route> {}
    }
}

/// Application routes
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[layout(SignedInShell)]
    #[route("/")]
    Dashboard {},
    #[route("/transactions")]
    Transactions {},
    #[route("/transfers")]
    Transfers {},
    #[route("/withdrawals")]
    Withdrawals {},
    #[route("/referrals")]
    Referrals {},
    #[route("/commissions")]
    Commissions {},
    #[route("/tickets")]
    Tickets {},
    #[route("/api-keys")]
    ApiKeys {},
    #[route("/personalization")]
    PersonalizationPage {},
    #[route("/settings")]
    Settings {},
    #[route("/admin")]
    Admin {},
    #[end_layout]
    #[route("/login")]
    Login {},
    #[route("/register?:referral")]
    Register { referral: Option<String> },
    #[route("/p/:code")]
    Pay { code: String },
}

/// Everything under this layout renders behind the session gate; the
/// login, register, and public payment routes stay outside it.
#[component]
fn SignedInShell() -> Element {
    rsx! {
        RequireAuth {
            Outlet::<Route> {}
        }
    }
}

/// Invisible root child owning background work that spans pages.
#[component]
fn SessionServices() -> Element {
    use_transfer_watcher();
    rsx! {}
}

/// Keep an incoming-transfer watcher running while a session is active.
///
/// The guard lives in a hook slot at the app root; signing out (or the
/// app unmounting) drops it, which stops the loop at its next wake-up.
fn use_transfer_watcher() {
    let auth = use_auth();
    let client = use_api();
    let toast = use_toast();
    let slot: Rc<RefCell<Option<CancelGuard>>> = use_hook(|| Rc::new(RefCell::new(None)));

    use_effect(move || {
        let signed_in = auth.phase() == SessionPhase::Authenticated;
        let running = slot.borrow().is_some();

        if signed_in && !running {
            let guard = CancelGuard::new();
            let token = guard.token();
            *slot.borrow_mut() = Some(guard);

            let client = client.clone();
            spawn(async move {
                poll::watch_transfers(client, token, move |transfer| {
                    toast.notify(&NotificationPayload::transfer_received(&transfer));
                })
                .await;
            });
        } else if !signed_in && running {
            slot.borrow_mut().take();
        }
    });
}
