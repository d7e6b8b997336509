//! Web-push subscription lifecycle.
//!
//! The browser half (permission prompt, service worker, PushManager) sits
//! behind the [`PushProvider`] trait so the sequencing rules here run and
//! test natively. The real provider is [`web::BrowserPush`]; tests drive
//! the same flows with a scripted fake.

use async_trait::async_trait;
use base64::Engine;

use crate::api::{ApiClient, ApiError, PushKeys, PushSubscriptionRequest};

#[cfg(target_arch = "wasm32")]
pub mod web;

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("push notifications are not supported in this browser")]
    Unsupported,
    #[error("notification permission was denied")]
    PermissionDenied,
    #[error("the server has no push key configured")]
    MissingServerKey,
    #[error("service worker registration failed: {0}")]
    ServiceWorker(String),
    #[error("push subscription failed: {0}")]
    Subscribe(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Mirror of the browser's notification permission state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Default,
    Granted,
    Denied,
}

/// A browser push subscription, keys already base64url-encoded the way the
/// backend stores them.
#[derive(Clone, Debug, PartialEq)]
pub struct SubscriptionInfo {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

/// Browser capabilities the lifecycle depends on.
#[async_trait(?Send)]
pub trait PushProvider {
    fn is_supported(&self) -> bool;

    fn permission(&self) -> Permission;

    async fn request_permission(&self) -> Result<Permission, PushError>;

    /// Register the service worker and wait until it is active.
    async fn ensure_service_worker(&self) -> Result<(), PushError>;

    /// Create a browser-managed subscription using the server's VAPID key.
    async fn subscribe(&self, server_key: &[u8]) -> Result<SubscriptionInfo, PushError>;

    async fn current_subscription(&self) -> Result<Option<SubscriptionInfo>, PushError>;

    /// Cancel the browser subscription. `false` when none existed.
    async fn unsubscribe(&self) -> Result<bool, PushError>;
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Enable push for this browser: permission, service worker, server key,
/// browser subscription, backend persistence, strictly in that order. Any
/// step failing aborts the whole sequence; if the backend rejects the
/// subscription the browser-side one is cancelled again so no half-enabled
/// state remains.
pub async fn subscribe(provider: &dyn PushProvider, client: &ApiClient) -> Result<(), PushError> {
    if !provider.is_supported() {
        return Err(PushError::Unsupported);
    }

    let permission = match provider.permission() {
        Permission::Granted => Permission::Granted,
        Permission::Denied => return Err(PushError::PermissionDenied),
        Permission::Default => provider.request_permission().await?,
    };
    if permission != Permission::Granted {
        return Err(PushError::PermissionDenied);
    }

    provider.ensure_service_worker().await?;

    let vapid = client.vapid_key().await?;
    let server_key = decode_server_key(&vapid.key).ok_or(PushError::MissingServerKey)?;

    let subscription = provider.subscribe(&server_key).await?;
    let request = PushSubscriptionRequest {
        endpoint: subscription.endpoint.clone(),
        keys: PushKeys {
            p256dh: subscription.p256dh.clone(),
            auth: subscription.auth.clone(),
        },
    };

    if let Err(err) = client.push_subscribe(&request).await {
        if let Err(rollback) = provider.unsubscribe().await {
            tracing::warn!("could not roll back browser subscription: {}", rollback);
        }
        return Err(err.into());
    }

    tracing::info!("push subscription registered");
    Ok(())
}

/// Disable push: cancel the browser subscription first, then delete it from
/// the backend by endpoint. A missing local subscription is a no-op success.
pub async fn unsubscribe(provider: &dyn PushProvider, client: &ApiClient) -> Result<(), PushError> {
    let Some(subscription) = provider.current_subscription().await? else {
        return Ok(());
    };

    provider.unsubscribe().await?;
    client.push_unsubscribe(&subscription.endpoint).await?;

    tracing::info!("push subscription removed");
    Ok(())
}

/// Whether this browser currently holds an active subscription. Never
/// fails: an unsupported browser or a service worker that is not ready
/// reads as "not subscribed".
pub async fn is_subscribed(provider: &dyn PushProvider) -> bool {
    if !provider.is_supported() || provider.permission() != Permission::Granted {
        return false;
    }
    matches!(provider.current_subscription().await, Ok(Some(_)))
}

/// Decode the backend's VAPID public key. Keys are usually base64url
/// without padding, but some deployments hand out standard base64.
pub fn decode_server_key(raw: &str) -> Option<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| base64::engine::general_purpose::STANDARD.decode(trimmed))
        .ok()
        .filter(|bytes| !bytes.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_url_safe_keys() {
        let key = decode_server_key("BP-_Aw").expect("url-safe key");
        assert_eq!(key, vec![0x04, 0xff, 0xbf, 0x03]);
    }

    #[test]
    fn falls_back_to_standard_base64() {
        // '+' and '/' only exist in the standard alphabet.
        let key = decode_server_key("BP+/Aw==").expect("standard key");
        assert_eq!(key, vec![0x04, 0xff, 0xbf, 0x03]);
    }

    #[test]
    fn rejects_empty_or_garbage_keys() {
        assert!(decode_server_key("").is_none());
        assert!(decode_server_key("   ").is_none());
        assert!(decode_server_key("!!not base64!!").is_none());
    }
}
