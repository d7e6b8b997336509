//! Cancellable polling primitives.
//!
//! Browser intervals leak unless something owns them, so every poll loop
//! here is driven by a [`CancelToken`] whose [`CancelGuard`] lives in the
//! owning component (stored in a `use_hook`); dropping the guard on
//! unmount stops the loop at its next wake-up. The loops themselves are
//! target-independent and are exercised natively with a paused clock.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::future::Future;
use std::rc::Rc;

use crate::api::{ApiClient, Transfer, TransactionStatus};

/// Charge-status probe spacing. The first probe fires a full interval
/// after the poll starts, never sooner.
pub const CHARGE_POLL_INTERVAL_MS: u64 = 5_000;

/// Incoming-transfer check spacing.
pub const TRANSFER_POLL_INTERVAL_MS: u64 = 30_000;

// =============================================================================
// Cancellation
// =============================================================================

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// RAII owner of a poll loop; dropping it cancels the token.
///
/// Components keep one in a `use_hook` slot so unmount reliably stops
/// whatever loop was spawned from that view.
#[derive(Default)]
pub struct CancelGuard {
    token: CancelToken,
}

impl CancelGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

// =============================================================================
// Timer
// =============================================================================

/// Async sleep on the current target.
#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(ms: u64) {
    use wasm_bindgen_futures::JsFuture;

    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
        }
    });
    let _ = JsFuture::from(promise).await;
}

#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

/// Without the server runtime there is no timer source; parking beats a
/// busy loop, and nothing schedules polls in that configuration.
#[cfg(all(not(target_arch = "wasm32"), not(feature = "server")))]
pub async fn sleep_ms(_ms: u64) {
    std::future::pending::<()>().await;
}

// =============================================================================
// Poll loop
// =============================================================================

/// What a poll tick decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollFlow {
    Continue,
    Stop,
}

/// Drive `tick` every `interval_ms` until it returns [`PollFlow::Stop`] or
/// the token is cancelled. Sleeps first, so the initial tick never fires
/// before a full interval has passed. The cancel flag is re-checked after
/// each tick so a cancellation during a slow request is honored.
pub async fn run<F, Fut>(cancel: CancelToken, interval_ms: u64, mut tick: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PollFlow>,
{
    loop {
        sleep_ms(interval_ms).await;
        if cancel.is_cancelled() {
            return;
        }
        if tick().await == PollFlow::Stop {
            return;
        }
        if cancel.is_cancelled() {
            return;
        }
    }
}

/// Poll a charge until it is paid or the token cancels.
///
/// Returns the paid status, or `None` when cancelled. Request failures are
/// swallowed (the next tick retries); there is no attempt cap and no
/// backoff.
pub async fn watch_charge(
    client: ApiClient,
    transaction_id: String,
    cancel: CancelToken,
) -> Option<TransactionStatus> {
    let paid: Rc<RefCell<Option<TransactionStatus>>> = Rc::new(RefCell::new(None));
    let captured = paid.clone();

    run(cancel, CHARGE_POLL_INTERVAL_MS, move || {
        let client = client.clone();
        let id = transaction_id.clone();
        let captured = captured.clone();
        async move {
            match client.transaction_status(&id).await {
                Ok(status) if status.is_paid() => {
                    *captured.borrow_mut() = Some(status);
                    PollFlow::Stop
                }
                Ok(_) => PollFlow::Continue,
                Err(err) => {
                    // Background probe: never surfaced, retried next tick.
                    tracing::debug!("charge status probe failed: {}", err);
                    PollFlow::Continue
                }
            }
        }
    })
    .await;

    paid.take()
}

/// Periodically check for transfers received since the watch started and
/// report each new one exactly once. Runs until cancelled.
pub async fn watch_transfers<F>(client: ApiClient, cancel: CancelToken, on_received: F)
where
    F: Fn(Transfer) + 'static,
{
    fn ids(list: &[Transfer]) -> HashSet<String> {
        list.iter().map(|t| t.id.clone()).collect()
    }

    // Baseline snapshot so pre-existing transfers never notify. If it
    // fails, the first successful tick becomes the baseline instead.
    let baseline = client.transfers().await.ok().map(|list| ids(&list));
    let known: Rc<RefCell<Option<HashSet<String>>>> = Rc::new(RefCell::new(baseline));
    let on_received = Rc::new(on_received);

    run(cancel, TRANSFER_POLL_INTERVAL_MS, move || {
        let client = client.clone();
        let known = known.clone();
        let on_received = on_received.clone();
        async move {
            let list = match client.transfers().await {
                Ok(list) => list,
                Err(err) => {
                    tracing::debug!("transfer check failed: {}", err);
                    return PollFlow::Continue;
                }
            };

            let mut slot = known.borrow_mut();
            match slot.as_ref() {
                None => {
                    *slot = Some(ids(&list));
                }
                Some(seen) => {
                    for transfer in list.iter().filter(|t| t.is_received() && !seen.contains(&t.id))
                    {
                        on_received(transfer.clone());
                    }
                    *slot = Some(ids(&list));
                }
            }
            PollFlow::Continue
        }
    })
    .await;
}
