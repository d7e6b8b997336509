//! Transient in-app notices.
//!
//! Pages report outcomes ("charge created", "copy failed") and the
//! transfer watcher surfaces incoming money through the same stack. Each
//! toast dismisses itself after a few seconds or on click.

use dioxus::prelude::*;

use crate::notify::NotificationPayload;
use crate::poll;

const TOAST_DURATION_MS: u64 = 6_000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

impl ToastLevel {
    fn css_class(&self) -> &'static str {
        match self {
            ToastLevel::Info => "toast-info",
            ToastLevel::Success => "toast-success",
            ToastLevel::Error => "toast-error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub title: String,
    pub body: String,
}

/// Toast state shared via context.
#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
}

impl ToastContext {
    pub fn list(&self) -> Vec<Toast> {
        (self.toasts)()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastLevel::Success, String::new(), message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastLevel::Error, String::new(), message.into());
    }

    /// Show a notification-shaped payload, e.g. from the transfer watcher.
    pub fn notify(&self, payload: &NotificationPayload) {
        self.push(ToastLevel::Info, payload.title.clone(), payload.body.clone());
    }

    pub fn dismiss(&self, id: u64) {
        let mut toasts = self.toasts;
        toasts.write().retain(|t| t.id != id);
    }

    fn push(&self, level: ToastLevel, title: String, body: String) {
        let mut toasts = self.toasts;
        let mut next_id = self.next_id;

        let id = next_id();
        next_id.set(id + 1);
        toasts.write().push(Toast {
            id,
            level,
            title,
            body,
        });

        spawn(async move {
            poll::sleep_ms(TOAST_DURATION_MS).await;
            toasts.write().retain(|t| t.id != id);
        });
    }
}

/// Install the toast context; call once at the app root.
pub fn use_toast_provider() {
    let toasts = use_signal(Vec::new);
    let next_id = use_signal(|| 0u64);
    use_context_provider(|| ToastContext { toasts, next_id });
}

pub fn use_toast() -> ToastContext {
    use_context::<ToastContext>()
}

/// Renders the toast stack; mounted once in the layout.
#[component]
pub fn ToastHost() -> Element {
    let toast = use_toast();
    let entries = toast.list();

    rsx! {
        div { class: "toast-stack",
            for entry in entries {
                div {
                    key: "{entry.id}",
                    class: "toast {entry.level.css_class()}",
                    onclick: move |_| toast.dismiss(entry.id),
                    if !entry.title.is_empty() {
                        strong { "{entry.title}" }
                    }
                    span { "{entry.body}" }
                }
            }
        }
    }
}
