//! Client Flow Harness
//!
//! Drives the API client and the background flows built on top of it
//! (session bootstrap, charge polling, transfer watching, the web-push
//! lifecycle) against a scripted transport, the same way the browser build
//! drives them against fetch.
//!
//! Run with: cargo test --test client_flows
//!
//! Flows covered:
//! - bearer token and Idempotency-Key request plumbing
//! - login, the 2FA challenge exchange, and the session-expired hook
//! - startup bootstrap retry policy (paused tokio clock)
//! - charge status polling cadence and stop condition
//! - received-transfer detection without duplicate notifications
//! - push subscribe/unsubscribe ordering and rollback

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{timeout, Instant};

use pix_console::api::{
    ApiClient, ApiError, HttpRequest, HttpResponse, HttpTransport, LoginOutcome, NewChargeRequest,
    GENERIC_API_MESSAGE,
};
use pix_console::poll::{self, CancelToken, CHARGE_POLL_INTERVAL_MS, TRANSFER_POLL_INTERVAL_MS};
use pix_console::push::{self, Permission, PushError, PushProvider, SubscriptionInfo};
use pix_console::session::{self, Bootstrap, MemoryTokens, TokenStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Transport that answers from a pre-recorded script and keeps every request
/// it saw. An exhausted script reads as a network failure, so a flow that
/// makes more requests than its test expects fails loudly.
struct FakeTransport {
    script: RefCell<VecDeque<Result<HttpResponse, String>>>,
    seen: Rc<RefCell<Vec<HttpRequest>>>,
}

#[async_trait(?Send)]
impl HttpTransport for FakeTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        self.seen.borrow_mut().push(req);
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err("script exhausted".to_string()))
    }
}

/// Client over a scripted transport, plus the request log to assert against.
fn scripted_client(
    script: Vec<Result<HttpResponse, String>>,
    token: Option<&str>,
) -> (ApiClient, Rc<RefCell<Vec<HttpRequest>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let transport = FakeTransport {
        script: RefCell::new(script.into()),
        seen: seen.clone(),
    };
    let tokens: Rc<dyn TokenStore> = match token {
        Some(token) => Rc::new(MemoryTokens::with_token(token)),
        None => Rc::new(MemoryTokens::default()),
    };
    (ApiClient::new("/api", Box::new(transport), tokens), seen)
}

fn ok(body: &str) -> Result<HttpResponse, String> {
    Ok(HttpResponse {
        status: 200,
        body: body.to_string(),
    })
}

fn rejected(status: u16, body: &str) -> Result<HttpResponse, String> {
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

fn network(reason: &str) -> Result<HttpResponse, String> {
    Err(reason.to_string())
}

const USER_ANA: &str = r#"{"id":"u1","name":"Ana Lima","email":"ana@example.com","role":"user","balance_cents":125000,"referral_code":"ANA123"}"#;

const CHARGE_PENDING: &str = r#"{"id":"tx-1","status":"pending"}"#;
const CHARGE_PAID: &str = r#"{"id":"tx-1","status":"paid","paid_at":"2026-05-14T12:30:00Z"}"#;

/// List body for GET /transfers from (id, direction) pairs.
fn transfers_json(entries: &[(&str, &str)]) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|(id, direction)| {
            format!(
                r#"{{"id":"{}","direction":"{}","counterparty":"Bia Souza","amount_cents":5000,"status":"completed"}}"#,
                id, direction
            )
        })
        .collect();
    format!("[{}]", items.join(","))
}

// =============================================================================
// Request plumbing - headers every flow depends on
// =============================================================================

mod request_plumbing {
    use super::*;

    /// Authenticated requests must carry the stored token as a bearer header.
    #[tokio::test]
    async fn authenticated_requests_carry_the_bearer_token() {
        let (client, seen) = scripted_client(vec![ok("[]")], Some("tok-77"));

        let list = client.transactions().await.expect("list decodes");
        assert!(list.is_empty());

        let seen = seen.borrow();
        assert_eq!((seen[0].method, seen[0].url.as_str()), ("GET", "/api/transactions"));
        assert_eq!(seen[0].header("Authorization"), Some("Bearer tok-77"));
    }

    /// A 2xx body that does not match the schema is a decode error with the
    /// generic user-facing message, never a panic.
    #[tokio::test]
    async fn a_mangled_body_reads_as_a_decode_error() {
        let (client, _) = scripted_client(vec![ok("<!DOCTYPE html>")], Some("tok"));

        let err = client.me().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(err.user_message(), GENERIC_API_MESSAGE);
    }

    /// Signing out is local: the token disappears without a request.
    #[test]
    fn sign_out_discards_the_token_without_a_request() {
        let (client, seen) = scripted_client(vec![], Some("tok"));

        client.sign_out();

        assert!(!client.has_token());
        assert!(seen.borrow().is_empty());
    }

    /// Every charge-creating POST carries a fresh Idempotency-Key so a double
    /// submit cannot double-charge.
    #[tokio::test]
    async fn each_charge_submission_gets_a_fresh_idempotency_key() {
        let (client, seen) = scripted_client(
            vec![ok(r#"{"id":"tx-1"}"#), ok(r#"{"id":"tx-2"}"#)],
            Some("tok"),
        );
        let req = NewChargeRequest {
            amount_cents: 12_345,
            description: "Consulting".to_string(),
            payer_name: None,
            payer_document: None,
        };

        client.create_charge(&req).await.expect("first charge");
        client.create_charge(&req).await.expect("second charge");

        let seen = seen.borrow();
        let first = seen[0].header("Idempotency-Key").expect("key on first submit");
        let second = seen[1].header("idempotency-key").expect("key on second submit");
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second, "a resubmit must not reuse the previous key");
    }
}

// =============================================================================
// Sign-in - login, the 2FA exchange, session expiry
// =============================================================================

mod sign_in {
    use super::*;

    /// A plain login stores the token before the user reaches the caller.
    #[tokio::test]
    async fn login_stores_the_token_and_returns_the_user() {
        let (client, seen) = scripted_client(
            vec![ok(&format!(r#"{{"token":"tok-1","user":{}}}"#, USER_ANA))],
            None,
        );

        let outcome = client
            .login("ana@example.com", "secret")
            .await
            .expect("login succeeds");
        let user = match outcome {
            LoginOutcome::Authenticated(user) => user,
            other => panic!("expected an authenticated outcome, got {:?}", other),
        };
        assert_eq!(user.name, "Ana Lima");
        assert!(client.has_token(), "login must store the session token");

        let seen = seen.borrow();
        assert_eq!((seen[0].method, seen[0].url.as_str()), ("POST", "/api/auth/login"));
        assert_eq!(seen[0].header("Content-Type"), Some("application/json"));
        assert!(seen[0].header("Authorization").is_none(), "login is anonymous");
        assert!(seen[0].header("Idempotency-Key").is_none());
    }

    /// A 2FA account gets a ticket instead of a token; exchanging the ticket
    /// with a TOTP code completes the session.
    #[tokio::test]
    async fn a_twofactor_account_gets_a_ticket_then_a_session() {
        let (client, seen) = scripted_client(
            vec![
                ok(r#"{"two_factor_required":true,"ticket":"tkt-5"}"#),
                ok(&format!(r#"{{"token":"tok-2","user":{}}}"#, USER_ANA)),
            ],
            None,
        );

        let outcome = client
            .login("ana@example.com", "secret")
            .await
            .expect("login succeeds");
        assert_eq!(
            outcome,
            LoginOutcome::TwoFactorRequired {
                ticket: "tkt-5".to_string()
            }
        );
        assert!(!client.has_token(), "no token before the code is exchanged");

        let user = client
            .login_2fa("tkt-5", "123456")
            .await
            .expect("2fa exchange succeeds");
        assert_eq!(user.email, "ana@example.com");
        assert!(client.has_token());

        let seen = seen.borrow();
        assert_eq!(seen[1].url, "/api/auth/login-2fa");
        let body = seen[1].body.as_deref().unwrap_or_default();
        assert!(body.contains("tkt-5") && body.contains("123456"));
    }

    /// Wrong credentials are a business rejection with the backend's message.
    /// The 401 must not read as a session expiry: no hook, nothing cleared.
    #[tokio::test]
    async fn wrong_credentials_stay_a_plain_rejection() {
        let (client, _) = scripted_client(
            vec![rejected(401, r#"{"error":"Invalid email or password"}"#)],
            None,
        );
        let expired = Rc::new(Cell::new(false));
        let flag = expired.clone();
        client.set_on_session_expired(move || flag.set(true));

        let err = client.login("ana@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 401, .. }));
        assert_eq!(err.user_message(), "Invalid email or password");
        assert!(!expired.get(), "the expiry hook must not fire for bad credentials");
    }

    /// A rejected token clears storage and fires the hook in the same turn,
    /// so the auth context can never hold a user without a token.
    #[tokio::test]
    async fn a_rejected_token_clears_state_and_fires_the_hook() {
        let (client, _) = scripted_client(vec![rejected(401, "{}")], Some("stale"));
        let expired = Rc::new(Cell::new(false));
        let flag = expired.clone();
        client.set_on_session_expired(move || flag.set(true));

        let err = client.me().await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
        assert!(!client.has_token(), "the stale token must be discarded");
        assert!(expired.get(), "the auth context must be told immediately");
    }
}

// =============================================================================
// Session bootstrap - startup token check retry policy
// =============================================================================

mod session_bootstrap {
    use super::*;

    /// No token, no request: the app is simply signed out.
    #[tokio::test]
    async fn no_token_resolves_signed_out_without_a_request() {
        let (client, seen) = scripted_client(vec![], None);

        let outcome = session::bootstrap(&client, &CancelToken::new()).await;

        assert_eq!(outcome, Bootstrap::SignedOut);
        assert!(seen.borrow().is_empty());
    }

    /// The happy path resolves on the first profile fetch.
    #[tokio::test]
    async fn a_valid_token_resolves_on_the_first_attempt() {
        let (client, seen) = scripted_client(vec![ok(USER_ANA)], Some("tok"));

        let outcome = session::bootstrap(&client, &CancelToken::new()).await;

        match outcome {
            Bootstrap::Authenticated(user) => assert_eq!(user.email, "ana@example.com"),
            other => panic!("expected authentication, got {:?}", other),
        }
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "/api/auth/me");
        assert_eq!(seen[0].header("Authorization"), Some("Bearer tok"));
    }

    /// An unreachable backend is retried on a fixed cadence, then reported as
    /// such. The token survives so the next full load can try again.
    #[tokio::test(start_paused = true)]
    async fn an_unreachable_backend_retries_then_keeps_the_token() {
        let (client, seen) = scripted_client(
            vec![network("offline"), network("offline"), network("offline")],
            Some("tok"),
        );

        let start = Instant::now();
        let outcome = session::bootstrap(&client, &CancelToken::new()).await;

        assert_eq!(outcome, Bootstrap::Unreachable);
        assert_eq!(seen.borrow().len(), session::BOOTSTRAP_ATTEMPTS as usize);
        assert_eq!(
            start.elapsed(),
            Duration::from_millis(
                (session::BOOTSTRAP_ATTEMPTS as u64 - 1) * session::BOOTSTRAP_RETRY_DELAY_MS
            ),
            "attempts are spaced by the retry delay, with no delay after the last"
        );
        assert!(client.has_token(), "an unreachable backend must not discard the token");
    }

    /// A 401 mid-retry is a verdict: stop immediately, signed out.
    #[tokio::test(start_paused = true)]
    async fn a_rejected_token_stops_the_retries() {
        let (client, seen) = scripted_client(
            vec![network("flaky"), rejected(401, "{}")],
            Some("stale"),
        );

        let outcome = session::bootstrap(&client, &CancelToken::new()).await;

        assert_eq!(outcome, Bootstrap::SignedOut);
        assert_eq!(seen.borrow().len(), 2);
        assert!(!client.has_token());
    }

    /// A cancelled owner stops the run before the next attempt fires.
    #[tokio::test]
    async fn cancellation_wins_over_the_first_attempt() {
        let (client, seen) = scripted_client(vec![], Some("tok"));
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = session::bootstrap(&client, &cancel).await;

        assert_eq!(outcome, Bootstrap::Cancelled);
        assert!(seen.borrow().is_empty());
    }

    /// Unmounting after failed attempts stops the remaining retries. Were the
    /// flag ignored, the third attempt would hit an exhausted script and read
    /// as Unreachable instead.
    #[tokio::test(start_paused = true)]
    async fn unmount_between_retries_stops_the_run() {
        let (client, seen) =
            scripted_client(vec![network("offline"), network("offline")], Some("tok"));
        let cancel = CancelToken::new();

        let canceller = cancel.clone();
        let (outcome, _) = tokio::join!(session::bootstrap(&client, &cancel), async move {
            // Lands between the second failure and the third attempt.
            tokio::time::sleep(Duration::from_millis(session::BOOTSTRAP_RETRY_DELAY_MS + 500))
                .await;
            canceller.cancel();
        });

        assert_eq!(outcome, Bootstrap::Cancelled);
        assert_eq!(seen.borrow().len(), 2, "no attempt fires after cancellation");
        assert!(client.has_token());
    }
}

// =============================================================================
// Charge polling - paused-clock cadence tests
// =============================================================================

mod charge_polling {
    use super::*;

    /// The watch sleeps first: nothing is probed before one full interval.
    #[tokio::test(start_paused = true)]
    async fn no_probe_fires_before_a_full_interval() {
        let (client, seen) = scripted_client(vec![ok(CHARGE_PAID)], Some("tok"));

        let watch = poll::watch_charge(client, "tx-1".to_string(), CancelToken::new());
        let early = timeout(Duration::from_millis(CHARGE_POLL_INTERVAL_MS - 1), watch).await;

        assert!(early.is_err(), "the watch must still be waiting");
        assert!(seen.borrow().is_empty());
    }

    /// Pending probes keep the watch alive; the paid probe resolves it and no
    /// further requests happen.
    #[tokio::test(start_paused = true)]
    async fn the_watch_resolves_once_the_charge_is_paid() {
        let (client, seen) = scripted_client(
            vec![ok(CHARGE_PENDING), ok(CHARGE_PENDING), ok(CHARGE_PAID)],
            Some("tok"),
        );

        let start = Instant::now();
        let status = poll::watch_charge(client, "tx-1".to_string(), CancelToken::new())
            .await
            .expect("the watch resolves once paid");

        assert!(status.is_paid());
        assert_eq!(status.paid_at.as_deref(), Some("2026-05-14T12:30:00Z"));
        assert_eq!(
            start.elapsed(),
            Duration::from_millis(3 * CHARGE_POLL_INTERVAL_MS)
        );

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert!(seen
            .iter()
            .all(|req| req.method == "GET" && req.url == "/api/transactions/tx-1/status"));
    }

    /// A failed probe is swallowed and the next tick retries; the payer never
    /// sees a transient backend hiccup.
    #[tokio::test(start_paused = true)]
    async fn probe_failures_are_retried_silently() {
        let (client, seen) = scripted_client(
            vec![network("gateway timeout"), ok(CHARGE_PAID)],
            Some("tok"),
        );

        let status = poll::watch_charge(client, "tx-1".to_string(), CancelToken::new()).await;

        assert!(status.expect("resolves despite the failed probe").is_paid());
        assert_eq!(seen.borrow().len(), 2);
    }

    /// A cancelled token ends the watch without a result and without probing.
    #[tokio::test(start_paused = true)]
    async fn a_cancelled_watch_ends_quietly() {
        let (client, seen) = scripted_client(vec![], Some("tok"));
        let cancel = CancelToken::new();
        cancel.cancel();

        let status = poll::watch_charge(client, "tx-1".to_string(), cancel).await;

        assert_eq!(status, None);
        assert!(seen.borrow().is_empty());
    }
}

// =============================================================================
// Transfer watch - new received transfers notify exactly once
// =============================================================================

mod transfer_watch {
    use super::*;

    /// Pre-existing transfers never notify; a new received transfer notifies
    /// exactly once; sent transfers never notify at all.
    #[tokio::test(start_paused = true)]
    async fn new_received_transfers_notify_exactly_once() {
        let baseline = transfers_json(&[("t1", "received")]);
        let after = transfers_json(&[("t1", "received"), ("t2", "received"), ("t3", "sent")]);
        let (client, seen) = scripted_client(
            vec![ok(&baseline), ok(&after), ok(&after)],
            Some("tok"),
        );

        let received: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = received.clone();
        let watch = poll::watch_transfers(client, CancelToken::new(), move |transfer| {
            sink.borrow_mut().push(transfer.id);
        });

        // Two ticks worth of paused time; the watch itself never ends.
        let outcome = timeout(
            Duration::from_millis(2 * TRANSFER_POLL_INTERVAL_MS + 1_000),
            watch,
        )
        .await;

        assert!(outcome.is_err(), "the transfer watch only ends by cancellation");
        assert_eq!(*received.borrow(), vec!["t2".to_string()]);
        assert_eq!(seen.borrow().len(), 3, "baseline fetch plus two ticks");
    }

    /// When the baseline snapshot fails, the first successful tick becomes
    /// the baseline instead of notifying for everything in it.
    #[tokio::test(start_paused = true)]
    async fn a_failed_baseline_defers_to_the_first_successful_tick() {
        let list = transfers_json(&[("t1", "received")]);
        let (client, seen) = scripted_client(vec![network("offline"), ok(&list)], Some("tok"));

        let received: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = received.clone();
        let watch = poll::watch_transfers(client, CancelToken::new(), move |transfer| {
            sink.borrow_mut().push(transfer.id);
        });

        let _ = timeout(
            Duration::from_millis(TRANSFER_POLL_INTERVAL_MS + 1_000),
            watch,
        )
        .await;

        assert!(received.borrow().is_empty(), "the late baseline must not notify");
        assert_eq!(seen.borrow().len(), 2);
    }
}

// =============================================================================
// Push lifecycle - permission, ordering, rollback
// =============================================================================

mod push_lifecycle {
    use super::*;

    /// Scripted browser push capabilities with call counters.
    struct MockPush {
        supported: bool,
        permission: Cell<Permission>,
        grant_on_request: bool,
        subscription: RefCell<Option<SubscriptionInfo>>,
        prompts: Cell<u32>,
        sw_installs: Cell<u32>,
        subscribe_calls: Cell<u32>,
        unsubscribe_calls: Cell<u32>,
        captured_server_key: RefCell<Option<Vec<u8>>>,
    }

    impl MockPush {
        fn with_permission(permission: Permission) -> Self {
            Self {
                supported: true,
                permission: Cell::new(permission),
                grant_on_request: false,
                subscription: RefCell::new(None),
                prompts: Cell::new(0),
                sw_installs: Cell::new(0),
                subscribe_calls: Cell::new(0),
                unsubscribe_calls: Cell::new(0),
                captured_server_key: RefCell::new(None),
            }
        }

        fn granted() -> Self {
            Self::with_permission(Permission::Granted)
        }

        fn denied() -> Self {
            Self::with_permission(Permission::Denied)
        }

        fn prompting(grant: bool) -> Self {
            let mut provider = Self::with_permission(Permission::Default);
            provider.grant_on_request = grant;
            provider
        }

        fn unsupported() -> Self {
            let mut provider = Self::granted();
            provider.supported = false;
            provider
        }

        fn with_subscription(self) -> Self {
            *self.subscription.borrow_mut() = Some(sample_subscription());
            self
        }
    }

    fn sample_subscription() -> SubscriptionInfo {
        SubscriptionInfo {
            endpoint: "https://push.example.org/send/abc123".to_string(),
            p256dh: "client-p256dh".to_string(),
            auth: "client-auth".to_string(),
        }
    }

    #[async_trait(?Send)]
    impl PushProvider for MockPush {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn permission(&self) -> Permission {
            self.permission.get()
        }

        async fn request_permission(&self) -> Result<Permission, PushError> {
            self.prompts.set(self.prompts.get() + 1);
            let outcome = if self.grant_on_request {
                Permission::Granted
            } else {
                Permission::Denied
            };
            self.permission.set(outcome);
            Ok(outcome)
        }

        async fn ensure_service_worker(&self) -> Result<(), PushError> {
            self.sw_installs.set(self.sw_installs.get() + 1);
            Ok(())
        }

        async fn subscribe(&self, server_key: &[u8]) -> Result<SubscriptionInfo, PushError> {
            self.subscribe_calls.set(self.subscribe_calls.get() + 1);
            *self.captured_server_key.borrow_mut() = Some(server_key.to_vec());
            let info = sample_subscription();
            *self.subscription.borrow_mut() = Some(info.clone());
            Ok(info)
        }

        async fn current_subscription(&self) -> Result<Option<SubscriptionInfo>, PushError> {
            Ok(self.subscription.borrow().clone())
        }

        async fn unsubscribe(&self) -> Result<bool, PushError> {
            self.unsubscribe_calls.set(self.unsubscribe_calls.get() + 1);
            Ok(self.subscription.borrow_mut().take().is_some())
        }
    }

    /// Denied permission stops the flow before any service worker or network
    /// activity happens.
    #[tokio::test]
    async fn denied_permission_stops_before_any_side_effect() {
        let provider = MockPush::denied();
        let (client, seen) = scripted_client(vec![], Some("tok"));

        let err = push::subscribe(&provider, &client).await.unwrap_err();

        assert!(matches!(err, PushError::PermissionDenied));
        assert!(seen.borrow().is_empty());
        assert_eq!(provider.sw_installs.get(), 0);
        assert_eq!(provider.prompts.get(), 0, "a denied browser is never re-prompted");
    }

    /// From the default permission state the user is prompted once, then the
    /// whole chain runs: service worker, VAPID key fetch, browser
    /// subscription, backend persistence.
    #[tokio::test]
    async fn prompting_grants_then_subscribes_end_to_end() {
        let provider = MockPush::prompting(true);
        let (client, seen) = scripted_client(vec![ok(r#"{"key":"BP-_Aw"}"#), ok("{}")], Some("tok"));

        push::subscribe(&provider, &client).await.expect("subscribe succeeds");

        assert_eq!(provider.prompts.get(), 1);
        assert_eq!(provider.sw_installs.get(), 1);
        assert_eq!(
            provider.captured_server_key.borrow().as_deref(),
            Some(&[0x04, 0xff, 0xbf, 0x03][..]),
            "the VAPID key reaches the browser subscription decoded"
        );

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!((seen[0].method, seen[0].url.as_str()), ("GET", "/api/push/vapid-key"));
        assert_eq!((seen[1].method, seen[1].url.as_str()), ("POST", "/api/push/subscribe"));
        let body = seen[1].body.as_deref().unwrap_or_default();
        assert!(body.contains("push.example.org"));
        assert!(body.contains("client-p256dh"));
    }

    /// A user declining the prompt aborts before the service worker step.
    #[tokio::test]
    async fn a_declined_prompt_aborts_the_flow() {
        let provider = MockPush::prompting(false);
        let (client, seen) = scripted_client(vec![], Some("tok"));

        let err = push::subscribe(&provider, &client).await.unwrap_err();

        assert!(matches!(err, PushError::PermissionDenied));
        assert_eq!(provider.prompts.get(), 1);
        assert_eq!(provider.sw_installs.get(), 0);
        assert!(seen.borrow().is_empty());
    }

    /// An empty server key aborts before a browser subscription is created.
    #[tokio::test]
    async fn an_empty_server_key_aborts_before_subscribing() {
        let provider = MockPush::granted();
        let (client, _) = scripted_client(vec![ok(r#"{"key":""}"#)], Some("tok"));

        let err = push::subscribe(&provider, &client).await.unwrap_err();

        assert!(matches!(err, PushError::MissingServerKey));
        assert_eq!(provider.subscribe_calls.get(), 0);
    }

    /// When the backend refuses to persist the subscription, the browser-side
    /// one is cancelled again so no half-enabled state remains.
    #[tokio::test]
    async fn a_backend_rejection_rolls_back_the_browser_subscription() {
        let provider = MockPush::granted();
        let (client, _) = scripted_client(
            vec![
                ok(r#"{"key":"BP-_Aw"}"#),
                rejected(422, r#"{"error":"device limit reached"}"#),
            ],
            Some("tok"),
        );

        let err = push::subscribe(&provider, &client).await.unwrap_err();

        assert!(matches!(err, PushError::Api(ApiError::Api { status: 422, .. })));
        assert_eq!(provider.unsubscribe_calls.get(), 1);
        assert!(provider.subscription.borrow().is_none());
    }

    /// Unsubscribe cancels the browser subscription first, then deletes it
    /// from the backend by endpoint.
    #[tokio::test]
    async fn unsubscribe_cancels_browser_then_backend() {
        let provider = MockPush::granted().with_subscription();
        let (client, seen) = scripted_client(vec![ok("{}")], Some("tok"));

        push::unsubscribe(&provider, &client).await.expect("unsubscribe succeeds");

        assert_eq!(provider.unsubscribe_calls.get(), 1);
        assert!(!push::is_subscribed(&provider).await);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!((seen[0].method, seen[0].url.as_str()), ("DELETE", "/api/push/unsubscribe"));
        assert!(seen[0]
            .body
            .as_deref()
            .unwrap_or_default()
            .contains("push.example.org"));
    }

    /// Unsubscribing without a live subscription is a success and touches
    /// nothing.
    #[tokio::test]
    async fn unsubscribe_without_a_subscription_is_a_no_op() {
        let provider = MockPush::granted();
        let (client, seen) = scripted_client(vec![], Some("tok"));

        push::unsubscribe(&provider, &client).await.expect("no-op succeeds");

        assert_eq!(provider.unsubscribe_calls.get(), 0);
        assert!(seen.borrow().is_empty());
    }

    /// The status probe never errors: unsupported or unpermitted browsers
    /// simply read as "not subscribed".
    #[tokio::test]
    async fn subscription_status_reads_false_instead_of_failing() {
        assert!(!push::is_subscribed(&MockPush::unsupported().with_subscription()).await);
        assert!(!push::is_subscribed(&MockPush::denied()).await);
        assert!(!push::is_subscribed(&MockPush::granted()).await);
        assert!(push::is_subscribed(&MockPush::granted().with_subscription()).await);
    }
}
