//! Browser-backed [`PushProvider`] using the real service worker and
//! PushManager APIs.

use async_trait::async_trait;
use base64::Engine;
use js_sys::Uint8Array;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Notification, NotificationPermission, PushEncryptionKeyName, PushSubscription,
    PushSubscriptionOptionsInit, ServiceWorkerContainer, ServiceWorkerRegistration, Window,
};

use super::{Permission, PushError, PushProvider, SubscriptionInfo};

const SERVICE_WORKER_URL: &str = "/sw.js";

/// Push capabilities of the hosting browser.
#[derive(Default)]
pub struct BrowserPush;

impl BrowserPush {
    pub fn new() -> Self {
        Self
    }
}

fn window() -> Result<Window, PushError> {
    web_sys::window().ok_or(PushError::Unsupported)
}

fn worker_container() -> Result<ServiceWorkerContainer, PushError> {
    Ok(window()?.navigator().service_worker())
}

fn has_property(target: &JsValue, name: &str) -> bool {
    js_sys::Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}

/// Resolves once the registered worker is active. Only called after
/// registration, otherwise `ready` would wait forever.
async fn active_registration() -> Result<ServiceWorkerRegistration, PushError> {
    let ready = worker_container()?
        .ready()
        .map_err(|e| PushError::ServiceWorker(format!("{:?}", e)))?;
    let value = JsFuture::from(ready)
        .await
        .map_err(|e| PushError::ServiceWorker(format!("{:?}", e)))?;
    value
        .dyn_into::<ServiceWorkerRegistration>()
        .map_err(|_| PushError::ServiceWorker("ready did not yield a registration".into()))
}

/// Non-blocking lookup of the current registration. `None` when no worker
/// has ever been registered for this scope.
async fn existing_registration() -> Result<Option<ServiceWorkerRegistration>, PushError> {
    let value = JsFuture::from(worker_container()?.get_registration())
        .await
        .map_err(|e| PushError::ServiceWorker(format!("{:?}", e)))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    value
        .dyn_into::<ServiceWorkerRegistration>()
        .map(Some)
        .map_err(|_| PushError::ServiceWorker("unexpected registration value".into()))
}

async fn subscription_of(
    registration: &ServiceWorkerRegistration,
) -> Result<Option<PushSubscription>, PushError> {
    let promise = registration
        .push_manager()
        .map_err(|e| PushError::Subscribe(format!("{:?}", e)))?
        .get_subscription()
        .map_err(|e| PushError::Subscribe(format!("{:?}", e)))?;
    let value = JsFuture::from(promise)
        .await
        .map_err(|e| PushError::Subscribe(format!("{:?}", e)))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    value
        .dyn_into::<PushSubscription>()
        .map(Some)
        .map_err(|_| PushError::Subscribe("unexpected subscription value".into()))
}

fn encode_key(
    subscription: &PushSubscription,
    name: PushEncryptionKeyName,
) -> Result<String, PushError> {
    let buffer = subscription
        .get_key(name)
        .map_err(|e| PushError::Subscribe(format!("{:?}", e)))?
        .ok_or_else(|| PushError::Subscribe("subscription key missing".into()))?;
    let bytes = Uint8Array::new(&buffer).to_vec();
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

fn describe(subscription: &PushSubscription) -> Result<SubscriptionInfo, PushError> {
    Ok(SubscriptionInfo {
        endpoint: subscription.endpoint(),
        p256dh: encode_key(subscription, PushEncryptionKeyName::P256dh)?,
        auth: encode_key(subscription, PushEncryptionKeyName::Auth)?,
    })
}

#[async_trait(?Send)]
impl PushProvider for BrowserPush {
    fn is_supported(&self) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        has_property(window.navigator().as_ref(), "serviceWorker")
            && has_property(window.as_ref(), "PushManager")
            && has_property(window.as_ref(), "Notification")
    }

    fn permission(&self) -> Permission {
        match Notification::permission() {
            NotificationPermission::Granted => Permission::Granted,
            NotificationPermission::Denied => Permission::Denied,
            _ => Permission::Default,
        }
    }

    async fn request_permission(&self) -> Result<Permission, PushError> {
        let promise = Notification::request_permission()
            .map_err(|e| PushError::Subscribe(format!("{:?}", e)))?;
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| PushError::Subscribe(format!("{:?}", e)))?;
        Ok(match value.as_string().as_deref() {
            Some("granted") => Permission::Granted,
            Some("denied") => Permission::Denied,
            _ => Permission::Default,
        })
    }

    async fn ensure_service_worker(&self) -> Result<(), PushError> {
        let container = worker_container()?;
        JsFuture::from(container.register(SERVICE_WORKER_URL))
            .await
            .map_err(|e| PushError::ServiceWorker(format!("{:?}", e)))?;
        active_registration().await?;
        Ok(())
    }

    async fn subscribe(&self, server_key: &[u8]) -> Result<SubscriptionInfo, PushError> {
        let registration = active_registration().await?;
        let manager = registration
            .push_manager()
            .map_err(|e| PushError::Subscribe(format!("{:?}", e)))?;

        let key_array = Uint8Array::from(server_key);
        let options = PushSubscriptionOptionsInit::new();
        options.set_user_visible_only(true);
        options.set_application_server_key(Some(&key_array));

        let promise = manager
            .subscribe_with_options(&options)
            .map_err(|e| PushError::Subscribe(format!("{:?}", e)))?;
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| PushError::Subscribe(format!("{:?}", e)))?;
        let subscription: PushSubscription = value
            .dyn_into()
            .map_err(|_| PushError::Subscribe("unexpected subscription value".into()))?;

        describe(&subscription)
    }

    async fn current_subscription(&self) -> Result<Option<SubscriptionInfo>, PushError> {
        let Some(registration) = existing_registration().await? else {
            return Ok(None);
        };
        match subscription_of(&registration).await? {
            Some(subscription) => Ok(Some(describe(&subscription)?)),
            None => Ok(None),
        }
    }

    async fn unsubscribe(&self) -> Result<bool, PushError> {
        let Some(registration) = existing_registration().await? else {
            return Ok(false);
        };
        let Some(subscription) = subscription_of(&registration).await? else {
            return Ok(false);
        };
        let value = JsFuture::from(
            subscription
                .unsubscribe()
                .map_err(|e| PushError::Subscribe(format!("{:?}", e)))?,
        )
        .await
        .map_err(|e| PushError::Subscribe(format!("{:?}", e)))?;
        Ok(value.as_bool().unwrap_or(false))
    }
}
