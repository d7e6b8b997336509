//! Session context: who is signed in and whether we know yet.
//!
//! The provider owns the shared [`ApiClient`], runs the startup session
//! probe, and reacts to expiry reported by any request. Route guards read
//! the phase instead of probing themselves.

use std::rc::Rc;

use dioxus::prelude::*;

use crate::api::{ApiClient, User};
use crate::poll::{CancelGuard, CancelToken};
use crate::session::{self, Bootstrap, SessionPhase};

use super::Route;

/// Session state shared via context.
#[derive(Clone, Copy)]
pub struct AuthContext {
    user: Signal<Option<User>>,
    phase: Signal<SessionPhase>,
    cancel: Signal<CancelToken>,
}

impl AuthContext {
    pub fn phase(&self) -> SessionPhase {
        (self.phase)()
    }

    pub fn user(&self) -> Option<User> {
        (self.user)()
    }

    pub fn is_admin(&self) -> bool {
        self.user().map(|u| u.is_admin()).unwrap_or(false)
    }

    /// Record a fresh login.
    pub fn signed_in(&self, user: User) {
        let mut user_slot = self.user;
        let mut phase = self.phase;
        user_slot.set(Some(user));
        phase.set(SessionPhase::Authenticated);
    }

    pub fn signed_out(&self) {
        let mut user_slot = self.user;
        let mut phase = self.phase;
        user_slot.set(None);
        phase.set(SessionPhase::Anonymous);
    }

    /// Refresh the cached profile after settings changes.
    pub fn update_user(&self, user: User) {
        let mut user_slot = self.user;
        user_slot.set(Some(user));
    }

    fn bootstrap_token(&self) -> CancelToken {
        (self.cancel)()
    }
}

/// Install the session context and start the bootstrap probe. Call once at
/// the app root.
pub fn use_auth_provider() {
    let user = use_signal(|| None::<User>);
    let phase = use_signal(|| SessionPhase::Loading);

    // The guard lives as long as the app root; its token also covers
    // retries after an unreachable backend.
    let guard = use_hook(|| Rc::new(CancelGuard::new()));
    let cancel = use_signal(|| guard.token());

    let auth = AuthContext {
        user,
        phase,
        cancel,
    };

    let client = use_hook(|| {
        let client = ApiClient::browser();
        client.set_on_session_expired(move || {
            tracing::info!("session expired, signing out");
            auth.signed_out();
        });
        client
    });

    use_context_provider({
        let client = client.clone();
        move || client
    });
    use_context_provider(|| auth);

    use_effect(move || {
        start_bootstrap(client.clone(), auth);
    });
}

/// Probe the stored session and settle the phase. Also used by the retry
/// button when the backend was unreachable.
pub fn start_bootstrap(client: ApiClient, auth: AuthContext) {
    let mut user = auth.user;
    let mut phase = auth.phase;
    let cancel = auth.bootstrap_token();

    phase.set(SessionPhase::Loading);
    spawn(async move {
        match session::bootstrap(&client, &cancel).await {
            Bootstrap::Authenticated(profile) => {
                user.set(Some(profile));
                phase.set(SessionPhase::Authenticated);
            }
            Bootstrap::SignedOut => phase.set(SessionPhase::Anonymous),
            Bootstrap::Unreachable => phase.set(SessionPhase::Unreachable),
            Bootstrap::Cancelled => {}
        }
    });
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
}

/// The shared API client installed by [`use_auth_provider`].
pub fn use_api() -> ApiClient {
    use_context::<ApiClient>()
}

/// Gate for signed-in routes: shows the probe state, redirects anonymous
/// visitors to the login page, and offers a retry when the backend could
/// not be reached.
#[component]
pub fn RequireAuth(children: Element) -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        if auth.phase() == SessionPhase::Anonymous {
            nav.replace(Route::Login {});
        }
    });

    match auth.phase() {
        SessionPhase::Loading => rsx! {
            main { class: "container",
                p { aria_busy: "true", "Checking session..." }
            }
        },
        SessionPhase::Authenticated => rsx! {
            {children}
        },
        SessionPhase::Anonymous => rsx! {},
        SessionPhase::Unreachable => rsx! {
            UnreachableNotice {}
        },
    }
}

#[component]
fn UnreachableNotice() -> Element {
    let auth = use_auth();
    let client = use_api();

    rsx! {
        main { class: "container",
            article { class: "status-err",
                hgroup {
                    h2 { "Service unreachable" }
                    p { "We could not reach the server. Your session is kept; try again in a moment." }
                }
                button {
                    onclick: move |_| start_bootstrap(client.clone(), auth),
                    "Try again"
                }
            }
        }
    }
}
