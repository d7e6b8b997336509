//! Account settings: password, two-factor auth, push notifications, theme.

use std::rc::Rc;

use dioxus::prelude::*;

use crate::api::TwoFactorSetup;
use crate::app::auth::{use_api, use_auth};
use crate::app::components::form_inputs::ToggleInput;
use crate::app::components::Layout;
use crate::app::theme::{use_theme, Theme};
use crate::app::toast::use_toast;
use crate::push::{self, PushProvider};

/// Password change is submitted only when the new password holds up.
pub fn password_problem(current: &str, new: &str, confirm: &str) -> Option<&'static str> {
    if current.is_empty() {
        return Some("Enter your current password.");
    }
    if new.len() < 8 {
        return Some("New password must be at least 8 characters.");
    }
    if new != confirm {
        return Some("New passwords do not match.");
    }
    None
}

/// The browser push capabilities, when running in a browser.
fn push_provider() -> Option<Rc<dyn PushProvider>> {
    #[cfg(target_arch = "wasm32")]
    {
        Some(Rc::new(push::web::BrowserPush::new()))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

#[component]
pub fn Settings() -> Element {
    let auth = use_auth();
    let theme = use_theme();

    let user = auth.user();
    let two_factor_on = user.as_ref().map(|u| u.two_factor_enabled).unwrap_or(false);

    rsx! {
        Layout {
            title: "Settings".to_string(),
            nav_active: "settings".to_string(),

            h1 { "Settings" }

            if let Some(user) = user.as_ref() {
                article {
                    hgroup {
                        h2 { "Account" }
                        p { "{user.email}" }
                    }
                    p { "Signed in as " strong { "{user.name}" } }
                }
            }

            PasswordSection {}
            TwoFactorSection { enabled: two_factor_on }
            PushSection {}

            article {
                hgroup {
                    h2 { "Appearance" }
                    p { "Color scheme for this browser" }
                }
                select {
                    value: "{theme.get().as_str()}",
                    onchange: move |e| theme.set(Theme::parse(&e.value())),
                    for option in Theme::ALL {
                        option { value: "{option.as_str()}", "{option.label()}" }
                    }
                }
            }
        }
    }
}

#[component]
fn PasswordSection() -> Element {
    let client = use_api();
    let toast = use_toast();

    let mut current = use_signal(String::new);
    let mut new = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut problem = use_signal(|| None::<String>);

    let submit = {
        let client = client.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            if let Some(p) = password_problem(&current(), &new(), &confirm()) {
                problem.set(Some(p.to_string()));
                return;
            }

            let client = client.clone();
            let current_value = current();
            let new_value = new();

            busy.set(true);
            problem.set(None);
            spawn(async move {
                match client.change_password(&current_value, &new_value).await {
                    Ok(()) => {
                        toast.success("Password changed");
                        current.set(String::new());
                        new.set(String::new());
                        confirm.set(String::new());
                    }
                    Err(err) => {
                        problem.set(Some(err.user_message()));
                    }
                }
                busy.set(false);
            });
        }
    };

    rsx! {
        article {
            hgroup {
                h2 { "Password" }
                p { "Change your sign-in password" }
            }
            form { onsubmit: submit,
                label { "Current password"
                    input {
                        r#type: "password",
                        autocomplete: "current-password",
                        value: "{current}",
                        oninput: move |e| current.set(e.value()),
                    }
                }
                div { class: "grid",
                    label { "New password"
                        input {
                            r#type: "password",
                            autocomplete: "new-password",
                            value: "{new}",
                            oninput: move |e| new.set(e.value()),
                        }
                    }
                    label { "Confirm new password"
                        input {
                            r#type: "password",
                            autocomplete: "new-password",
                            value: "{confirm}",
                            oninput: move |e| confirm.set(e.value()),
                        }
                    }
                }
                if let Some(p) = problem() {
                    p { class: "status-err", "{p}" }
                }
                button { r#type: "submit", aria_busy: "{busy}", disabled: busy(),
                    "Change password"
                }
            }
        }
    }
}

#[component]
fn TwoFactorSection(enabled: bool) -> Element {
    let auth = use_auth();
    let client = use_api();
    let toast = use_toast();

    // Present while the enable flow is waiting for the first code.
    let mut setup = use_signal(|| None::<TwoFactorSetup>);
    let mut code = use_signal(String::new);
    let mut busy = use_signal(|| false);

    let refresh_profile = {
        let client = client.clone();
        move || {
            let client = client.clone();
            spawn(async move {
                if let Ok(user) = client.me().await {
                    auth.update_user(user);
                }
            });
        }
    };

    let begin_enable = {
        let client = client.clone();
        move |_| {
            let client = client.clone();
            busy.set(true);
            spawn(async move {
                match client.two_factor_enable().await {
                    Ok(s) => setup.set(Some(s)),
                    Err(err) => toast.error(err.user_message()),
                }
                busy.set(false);
            });
        }
    };

    let confirm_enable = {
        let client = client.clone();
        let refresh_profile = refresh_profile.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            let client = client.clone();
            let mut refresh_profile = refresh_profile.clone();
            let user_code = code().trim().to_string();

            busy.set(true);
            spawn(async move {
                match client.two_factor_confirm(&user_code).await {
                    Ok(()) => {
                        toast.success("Two-factor authentication enabled");
                        setup.set(None);
                        code.set(String::new());
                        refresh_profile();
                    }
                    Err(err) => toast.error(err.user_message()),
                }
                busy.set(false);
            });
        }
    };

    let disable = {
        let client = client.clone();
        let refresh_profile = refresh_profile.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            let client = client.clone();
            let mut refresh_profile = refresh_profile.clone();
            let user_code = code().trim().to_string();

            busy.set(true);
            spawn(async move {
                match client.two_factor_disable(&user_code).await {
                    Ok(()) => {
                        toast.success("Two-factor authentication disabled");
                        code.set(String::new());
                        refresh_profile();
                    }
                    Err(err) => toast.error(err.user_message()),
                }
                busy.set(false);
            });
        }
    };

    rsx! {
        article {
            hgroup {
                h2 { "Two-factor authentication" }
                p {
                    if enabled {
                        "Enabled. A code is required to sign in and withdraw."
                    } else {
                        "Protect sign-in and withdrawals with an authenticator app."
                    }
                }
            }

            if let Some(s) = setup() {
                p { "Add this secret to your authenticator app, then confirm with a code:" }
                p { code { "{s.secret}" } }
                if !s.otpauth_url.is_empty() {
                    p {
                        a { href: "{s.otpauth_url}", "Open in authenticator" }
                    }
                }
                form { onsubmit: confirm_enable,
                    label { "Code"
                        input {
                            r#type: "text",
                            inputmode: "numeric",
                            maxlength: "6",
                            value: "{code}",
                            oninput: move |e| code.set(e.value()),
                        }
                    }
                    button { r#type: "submit", aria_busy: "{busy}", disabled: busy(),
                        "Confirm"
                    }
                }
            } else if enabled {
                form { onsubmit: disable,
                    label { "Code from your authenticator"
                        input {
                            r#type: "text",
                            inputmode: "numeric",
                            maxlength: "6",
                            value: "{code}",
                            oninput: move |e| code.set(e.value()),
                        }
                    }
                    button {
                        r#type: "submit",
                        class: "outline danger",
                        aria_busy: "{busy}",
                        disabled: busy(),
                        "Disable 2FA"
                    }
                }
            } else {
                button { aria_busy: "{busy}", disabled: busy(), onclick: begin_enable,
                    "Enable 2FA"
                }
            }
        }
    }
}

#[component]
fn PushSection() -> Element {
    let client = use_api();
    let toast = use_toast();

    let provider = use_hook(push_provider);
    let supported = provider.as_ref().map(|p| p.is_supported()).unwrap_or(false);

    let mut subscribed = use_signal(|| false);
    let mut busy = use_signal(|| false);

    // Ask the browser for the current state once.
    use_effect({
        let provider = provider.clone();
        move || {
            let Some(provider) = provider.clone() else {
                return;
            };
            spawn(async move {
                subscribed.set(push::is_subscribed(provider.as_ref()).await);
            });
        }
    });

    let mut toggle = {
        let provider = provider.clone();
        let client = client.clone();
        move |enable: bool| {
            let Some(provider) = provider.clone() else {
                return;
            };
            let client = client.clone();

            busy.set(true);
            spawn(async move {
                let result = if enable {
                    push::subscribe(provider.as_ref(), &client).await
                } else {
                    push::unsubscribe(provider.as_ref(), &client).await
                };
                match result {
                    Ok(()) => {
                        subscribed.set(enable);
                        if enable {
                            toast.success("Push notifications enabled");
                        } else {
                            toast.success("Push notifications disabled");
                        }
                    }
                    Err(err) => {
                        tracing::warn!("push toggle failed: {}", err);
                        toast.error(err.to_string());
                        subscribed.set(push::is_subscribed(provider.as_ref()).await);
                    }
                }
                busy.set(false);
            });
        }
    };

    rsx! {
        article {
            hgroup {
                h2 { "Notifications" }
                p { "Get notified about payments even when this tab is closed" }
            }
            if supported {
                ToggleInput {
                    label: "Push notifications",
                    description: "Payments, transfers, and ticket replies",
                    checked: subscribed(),
                    disabled: busy(),
                    on_change: move |enable| toggle(enable),
                }
            } else {
                p { class: "text-muted", "Push notifications are not supported in this browser." }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_change_requires_all_fields() {
        assert!(password_problem("", "newpassword", "newpassword").is_some());
        assert!(password_problem("old", "short", "short").is_some());
        assert!(password_problem("old", "newpassword", "other").is_some());
        assert!(password_problem("old", "newpassword", "newpassword").is_none());
    }
}
