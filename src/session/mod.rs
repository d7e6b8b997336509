//! Session token storage and the auth bootstrap state machine.
//!
//! The token lives in durable browser storage behind [`TokenStore`] so the
//! API client, the auth context and tests all share one seam. Bootstrap
//! turns a stored token into a session on startup with a bounded retry
//! policy; its outcomes are mutually exclusive.

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{ApiClient, ApiError, User};
use crate::poll::{self, CancelToken};

/// localStorage key holding the session token.
pub const TOKEN_STORAGE_KEY: &str = "pix-console-token";

/// Durable storage for the session token.
pub trait TokenStore {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// In-memory token store for native builds and tests.
#[derive(Default)]
pub struct MemoryTokens {
    token: RefCell<Option<String>>,
}

impl MemoryTokens {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokens {
    fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn set(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.borrow_mut() = None;
    }
}

/// localStorage-backed token store. Storage failures (private browsing,
/// quota) degrade to an in-memory-less session rather than erroring.
#[cfg(target_arch = "wasm32")]
pub struct BrowserTokens;

#[cfg(target_arch = "wasm32")]
impl TokenStore for BrowserTokens {
    fn get(&self) -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage.get_item(TOKEN_STORAGE_KEY).ok()?
    }

    fn set(&self, token: &str) {
        if let Some(window) = web_sys::window() {
            if let Ok(Some(storage)) = window.local_storage() {
                let _ = storage.set_item(TOKEN_STORAGE_KEY, token);
            }
        }
    }

    fn clear(&self) {
        if let Some(window) = web_sys::window() {
            if let Ok(Some(storage)) = window.local_storage() {
                let _ = storage.remove_item(TOKEN_STORAGE_KEY);
            }
        }
    }
}

/// Token store for the current target: localStorage in the browser, memory
/// elsewhere (SSR and tests never persist tokens).
pub fn shared_token_store() -> Rc<dyn TokenStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(BrowserTokens)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryTokens::default())
    }
}

// =============================================================================
// Bootstrap
// =============================================================================

/// Where the app shell stands with respect to authentication.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Startup token check in flight.
    #[default]
    Loading,
    Authenticated,
    Anonymous,
    /// A token is stored but the backend stayed unreachable; kept so the
    /// next full load can retry.
    Unreachable,
}

/// Outcome of the startup token check. Exactly one of these happens.
#[derive(Clone, Debug, PartialEq)]
pub enum Bootstrap {
    Authenticated(User),
    /// No token, or the backend rejected it (the client already cleared it).
    SignedOut,
    /// All attempts failed without a verdict on the token.
    Unreachable,
    /// The owning view went away between attempts.
    Cancelled,
}

/// Total profile-fetch attempts before giving up.
pub const BOOTSTRAP_ATTEMPTS: u32 = 3;
/// Fixed spacing between attempts.
pub const BOOTSTRAP_RETRY_DELAY_MS: u64 = 2_000;

/// Resolve the stored token into a session.
///
/// A 401 ends the run immediately as `SignedOut` (token and user cleared
/// together by the client). Any other failure is retried up to
/// [`BOOTSTRAP_ATTEMPTS`] times with [`BOOTSTRAP_RETRY_DELAY_MS`] between
/// attempts; the cancel token is checked after each delay so an unmounted
/// view stops the retries.
pub async fn bootstrap(client: &ApiClient, cancel: &CancelToken) -> Bootstrap {
    if !client.has_token() {
        return Bootstrap::SignedOut;
    }

    for attempt in 1..=BOOTSTRAP_ATTEMPTS {
        if cancel.is_cancelled() {
            return Bootstrap::Cancelled;
        }

        match client.me().await {
            Ok(user) => return Bootstrap::Authenticated(user),
            Err(ApiError::Unauthorized) => return Bootstrap::SignedOut,
            Err(err) => {
                tracing::warn!("session bootstrap attempt {} failed: {}", attempt, err);
                if attempt == BOOTSTRAP_ATTEMPTS {
                    break;
                }
                poll::sleep_ms(BOOTSTRAP_RETRY_DELAY_MS).await;
            }
        }
    }

    Bootstrap::Unreachable
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_tokens_round_trip() {
        let store = MemoryTokens::default();
        assert_eq!(store.get(), None);
        store.set("abc");
        assert_eq!(store.get(), Some("abc".to_string()));
        store.clear();
        assert_eq!(store.get(), None);
    }
}
