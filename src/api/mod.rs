//! Typed client for the platform REST backend.
//!
//! One method per consumed endpoint. The client attaches the bearer token
//! from the session store to every request, validates response JSON into
//! the types in [`types`], and maps failures into [`ApiError`]. A 401 on an
//! authenticated request clears the stored token and fires the
//! session-expired hook before the error reaches the caller, so token and
//! user state can never diverge.

pub mod error;
pub mod transport;
pub mod types;

pub use error::{ApiError, GENERIC_API_MESSAGE};
pub use transport::{FetchTransport, HttpRequest, HttpResponse, HttpTransport};
pub use types::*;

use std::cell::RefCell;
use std::rc::Rc;

use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::session::TokenStore;

/// Cheaply cloneable handle to the backend. Pages share one instance via
/// context; tests build their own with a scripted transport.
#[derive(Clone)]
pub struct ApiClient {
    inner: Rc<ClientInner>,
}

struct ClientInner {
    base: String,
    transport: Box<dyn HttpTransport>,
    tokens: Rc<dyn TokenStore>,
    /// Fired after a 401 clears the token; the auth context uses this to
    /// drop the in-memory user in the same turn.
    on_session_expired: RefCell<Option<Box<dyn Fn()>>>,
}

impl ApiClient {
    pub fn new(
        base: impl Into<String>,
        transport: Box<dyn HttpTransport>,
        tokens: Rc<dyn TokenStore>,
    ) -> Self {
        Self {
            inner: Rc::new(ClientInner {
                base: base.into(),
                transport,
                tokens,
                on_session_expired: RefCell::new(None),
            }),
        }
    }

    /// Client wired for the running app: same-origin `/api` over fetch,
    /// token persisted in the browser.
    pub fn browser() -> Self {
        Self::new(
            "/api",
            Box::new(FetchTransport),
            crate::session::shared_token_store(),
        )
    }

    pub fn set_on_session_expired(&self, hook: impl Fn() + 'static) {
        *self.inner.on_session_expired.borrow_mut() = Some(Box::new(hook));
    }

    pub fn has_token(&self) -> bool {
        self.inner.tokens.get().is_some()
    }

    /// Drop the stored token without a server round-trip.
    pub fn sign_out(&self) {
        self.inner.tokens.clear();
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    async fn send(
        &self,
        method: &'static str,
        path: &str,
        body: Option<String>,
        idempotent_charge: bool,
    ) -> Result<HttpResponse, ApiError> {
        let mut req = HttpRequest::new(method, format!("{}{}", self.inner.base, path));

        let had_token = if let Some(token) = self.inner.tokens.get() {
            req.headers
                .push(("Authorization".to_string(), format!("Bearer {}", token)));
            true
        } else {
            false
        };

        if body.is_some() {
            req.headers
                .push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if idempotent_charge {
            req.headers
                .push(("Idempotency-Key".to_string(), idempotency_key()));
        }
        req.body = body;

        let resp = self
            .inner
            .transport
            .send(req)
            .await
            .map_err(ApiError::Network)?;

        if resp.status == 401 && had_token {
            // Token rejected: clear it and tell the auth context, then fail.
            self.inner.tokens.clear();
            if let Some(hook) = self.inner.on_session_expired.borrow().as_ref() {
                hook();
            }
            return Err(ApiError::Unauthorized);
        }

        if !resp.is_success() {
            // An anonymous 401 (e.g. wrong login credentials) is a plain
            // rejection, not a session expiry.
            return Err(ApiError::rejection(resp.status, &resp.body));
        }

        Ok(resp)
    }

    fn decode<T: DeserializeOwned>(resp: HttpResponse) -> Result<T, ApiError> {
        serde_json::from_str(&resp.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Self::decode(self.send("GET", path, None, false).await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Self::decode(self.send("POST", path, Some(body), false).await?)
    }

    /// POST that creates a charge; carries an Idempotency-Key header so a
    /// double submit cannot double-charge.
    async fn post_charge<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Self::decode(self.send("POST", path, Some(body), true).await?)
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Self::decode(self.send("PUT", path, Some(body), false).await?)
    }

    async fn put_no_response<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send("PUT", path, Some(body), false).await?;
        Ok(())
    }

    async fn post_no_response<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send("POST", path, Some(body), false).await?;
        Ok(())
    }

    async fn delete_no_response<B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let body = match body {
            Some(b) => Some(serde_json::to_string(b).map_err(|e| ApiError::Decode(e.to_string()))?),
            None => None,
        };
        self.send("DELETE", path, body, false).await?;
        Ok(())
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// POST /auth/login - exchange credentials for a session or a 2FA ticket.
    /// On success the token is stored before the user is returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let resp: LoginResponse = self
            .post_json(
                "/auth/login",
                &serde_json::json!({ "email": email, "password": password }),
            )
            .await?;
        self.accept_login(resp)
    }

    /// POST /auth/login-2fa - finish a 2FA login with the ticket and code.
    pub async fn login_2fa(&self, ticket: &str, code: &str) -> Result<User, ApiError> {
        let resp: LoginResponse = self
            .post_json(
                "/auth/login-2fa",
                &serde_json::json!({ "ticket": ticket, "code": code }),
            )
            .await?;
        match self.accept_login(resp)? {
            LoginOutcome::Authenticated(user) => Ok(user),
            LoginOutcome::TwoFactorRequired { .. } => Err(ApiError::Decode(
                "2FA exchange answered with another challenge".to_string(),
            )),
        }
    }

    /// POST /auth/register - create an account and sign in atomically.
    pub async fn register(&self, req: &RegisterRequest) -> Result<User, ApiError> {
        let resp: LoginResponse = self.post_json("/auth/register", req).await?;
        match self.accept_login(resp)? {
            LoginOutcome::Authenticated(user) => Ok(user),
            LoginOutcome::TwoFactorRequired { .. } => Err(ApiError::Decode(
                "register answered with a 2FA challenge".to_string(),
            )),
        }
    }

    fn accept_login(&self, resp: LoginResponse) -> Result<LoginOutcome, ApiError> {
        if resp.two_factor_required {
            let ticket = resp
                .ticket
                .ok_or_else(|| ApiError::Decode("2FA challenge without ticket".to_string()))?;
            return Ok(LoginOutcome::TwoFactorRequired { ticket });
        }
        match (resp.token, resp.user) {
            (Some(token), Some(user)) => {
                self.inner.tokens.set(&token);
                Ok(LoginOutcome::Authenticated(user))
            }
            _ => Err(ApiError::Decode(
                "login response missing token or user".to_string(),
            )),
        }
    }

    /// GET /auth/me - profile for the stored token.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.get_json("/auth/me").await
    }

    /// PUT /auth/password
    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), ApiError> {
        self.put_no_response(
            "/auth/password",
            &serde_json::json!({ "current_password": current, "new_password": new }),
        )
        .await
    }

    /// POST /auth/2fa/enable - returns the TOTP secret to confirm.
    pub async fn two_factor_enable(&self) -> Result<TwoFactorSetup, ApiError> {
        self.post_json("/auth/2fa/enable", &serde_json::json!({})).await
    }

    /// POST /auth/2fa/confirm
    pub async fn two_factor_confirm(&self, code: &str) -> Result<(), ApiError> {
        self.post_no_response("/auth/2fa/confirm", &serde_json::json!({ "code": code }))
            .await
    }

    /// POST /auth/2fa/disable
    pub async fn two_factor_disable(&self, code: &str) -> Result<(), ApiError> {
        self.post_no_response("/auth/2fa/disable", &serde_json::json!({ "code": code }))
            .await
    }

    // =========================================================================
    // Platform config
    // =========================================================================

    /// GET /config/public - unauthenticated branding and limits.
    pub async fn public_config(&self) -> Result<PublicConfig, ApiError> {
        self.get_json("/config/public").await
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// GET /transactions
    pub async fn transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        self.get_json("/transactions").await
    }

    /// POST /transactions - create a charge (idempotent against double submit).
    pub async fn create_charge(&self, req: &NewChargeRequest) -> Result<Transaction, ApiError> {
        self.post_charge("/transactions", req).await
    }

    /// GET /transactions/{id}/status - cheap status probe used by polling.
    pub async fn transaction_status(&self, id: &str) -> Result<TransactionStatus, ApiError> {
        self.get_json(&format!(
            "/transactions/{}/status",
            urlencoding::encode(id)
        ))
        .await
    }

    // =========================================================================
    // Withdrawals
    // =========================================================================

    /// GET /withdrawals
    pub async fn withdrawals(&self) -> Result<Vec<Withdrawal>, ApiError> {
        self.get_json("/withdrawals").await
    }

    /// GET /withdrawals/calculate - fee preview for an amount.
    pub async fn withdrawal_preview(&self, amount_cents: i64) -> Result<FeePreview, ApiError> {
        self.get_json(&format!(
            "/withdrawals/calculate?amount_cents={}",
            amount_cents
        ))
        .await
    }

    /// POST /withdrawals
    pub async fn create_withdrawal(
        &self,
        req: &NewWithdrawalRequest,
    ) -> Result<Withdrawal, ApiError> {
        self.post_json("/withdrawals", req).await
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    /// GET /transfers
    pub async fn transfers(&self) -> Result<Vec<Transfer>, ApiError> {
        self.get_json("/transfers").await
    }

    /// GET /transfers/frequent - recipients the user transfers to often.
    pub async fn frequent_recipients(&self) -> Result<Vec<FrequentRecipient>, ApiError> {
        self.get_json("/transfers/frequent").await
    }

    /// GET /transfers/validate/{wallet} - resolve a wallet to its holder.
    pub async fn validate_wallet(&self, wallet: &str) -> Result<WalletLookup, ApiError> {
        self.get_json(&format!(
            "/transfers/validate/{}",
            urlencoding::encode(wallet)
        ))
        .await
    }

    /// GET /transfers/calculate - fee preview for an amount.
    pub async fn transfer_preview(&self, amount_cents: i64) -> Result<FeePreview, ApiError> {
        self.get_json(&format!(
            "/transfers/calculate?amount_cents={}",
            amount_cents
        ))
        .await
    }

    /// POST /transfers
    pub async fn create_transfer(&self, req: &NewTransferRequest) -> Result<Transfer, ApiError> {
        self.post_json("/transfers", req).await
    }

    // =========================================================================
    // Referrals / Commissions
    // =========================================================================

    /// GET /referrals
    pub async fn referrals(&self) -> Result<ReferralSummary, ApiError> {
        self.get_json("/referrals").await
    }

    /// GET /commissions
    pub async fn commissions(&self) -> Result<CommissionReport, ApiError> {
        self.get_json("/commissions").await
    }

    // =========================================================================
    // Support tickets
    // =========================================================================

    /// GET /tickets
    pub async fn tickets(&self) -> Result<Vec<Ticket>, ApiError> {
        self.get_json("/tickets").await
    }

    /// POST /tickets
    pub async fn create_ticket(&self, req: &NewTicketRequest) -> Result<Ticket, ApiError> {
        self.post_json("/tickets", req).await
    }

    /// POST /tickets/{id}/reply
    pub async fn reply_ticket(&self, id: &str, body: &str) -> Result<Ticket, ApiError> {
        self.post_json(
            &format!("/tickets/{}/reply", urlencoding::encode(id)),
            &serde_json::json!({ "body": body }),
        )
        .await
    }

    /// PUT /tickets/{id}/status - close or reopen a ticket.
    pub async fn set_ticket_status(&self, id: &str, status: &str) -> Result<Ticket, ApiError> {
        self.put_json(
            &format!("/tickets/{}/status", urlencoding::encode(id)),
            &serde_json::json!({ "status": status }),
        )
        .await
    }

    // =========================================================================
    // API keys
    // =========================================================================

    /// GET /api-keys
    pub async fn api_keys(&self) -> Result<Vec<ApiKey>, ApiError> {
        self.get_json("/api-keys").await
    }

    /// POST /api-keys - the returned secret is shown once and never again.
    pub async fn create_api_key(&self, name: &str) -> Result<ApiKeyCreated, ApiError> {
        self.post_json("/api-keys", &serde_json::json!({ "name": name }))
            .await
    }

    /// DELETE /api-keys/{id}
    pub async fn delete_api_key(&self, id: &str) -> Result<(), ApiError> {
        self.delete_no_response::<()>(&format!("/api-keys/{}", urlencoding::encode(id)), None)
            .await
    }

    // =========================================================================
    // Personalization
    // =========================================================================

    /// GET /personalization
    pub async fn personalization(&self) -> Result<Personalization, ApiError> {
        self.get_json("/personalization").await
    }

    /// PUT /personalization
    pub async fn update_personalization(
        &self,
        p: &Personalization,
    ) -> Result<Personalization, ApiError> {
        self.put_json("/personalization", p).await
    }

    // =========================================================================
    // Public payment page
    // =========================================================================

    /// GET /p/{code} - public charge details for the payment page.
    pub async fn public_charge(&self, code: &str) -> Result<PublicCharge, ApiError> {
        self.get_json(&format!("/p/{}", urlencoding::encode(code)))
            .await
    }

    /// POST /p/{code}/pay - create the payable PIX charge (idempotent).
    pub async fn pay_charge(&self, code: &str, req: &PayRequest) -> Result<PayReceipt, ApiError> {
        self.post_charge(&format!("/p/{}/pay", urlencoding::encode(code)), req)
            .await
    }

    // =========================================================================
    // Push
    // =========================================================================

    /// GET /push/vapid-key
    pub async fn vapid_key(&self) -> Result<VapidKeyResponse, ApiError> {
        self.get_json("/push/vapid-key").await
    }

    /// POST /push/subscribe - persist a browser subscription server-side.
    pub async fn push_subscribe(&self, req: &PushSubscriptionRequest) -> Result<(), ApiError> {
        self.post_no_response("/push/subscribe", req).await
    }

    /// DELETE /push/unsubscribe - remove a subscription by endpoint.
    pub async fn push_unsubscribe(&self, endpoint: &str) -> Result<(), ApiError> {
        self.delete_no_response(
            "/push/unsubscribe",
            Some(&serde_json::json!({ "endpoint": endpoint })),
        )
        .await
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// GET /admin/stats
    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.get_json("/admin/stats").await
    }

    /// GET /admin/users
    pub async fn admin_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.get_json("/admin/users").await
    }

    /// GET /admin/withdrawals
    pub async fn admin_withdrawals(&self) -> Result<Vec<AdminWithdrawal>, ApiError> {
        self.get_json("/admin/withdrawals").await
    }

    /// PUT /admin/withdrawals/{id}/status - approve or reject.
    pub async fn set_admin_withdrawal_status(
        &self,
        id: &str,
        status: &str,
    ) -> Result<AdminWithdrawal, ApiError> {
        self.put_json(
            &format!("/admin/withdrawals/{}/status", urlencoding::encode(id)),
            &serde_json::json!({ "status": status }),
        )
        .await
    }

    /// GET /admin/config
    pub async fn admin_config(&self) -> Result<PlatformConfig, ApiError> {
        self.get_json("/admin/config").await
    }

    /// PUT /admin/config
    pub async fn update_admin_config(
        &self,
        cfg: &PlatformConfig,
    ) -> Result<PlatformConfig, ApiError> {
        self.put_json("/admin/config", cfg).await
    }

    /// GET /admin/team
    pub async fn admin_team(&self) -> Result<Vec<TeamMember>, ApiError> {
        self.get_json("/admin/team").await
    }
}

/// Random key for charge-creating POSTs. 16 random bytes, hex encoded.
fn idempotency_key() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotency_keys_are_hex_and_unique() {
        let a = idempotency_key();
        let b = idempotency_key();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
