//! Account creation page.

use dioxus::prelude::*;

use crate::api::{PublicConfig, RegisterRequest};
use crate::app::auth::{use_api, use_auth};
use crate::app::components::{ErrorAlert, HeadAssets};
use crate::app::Route;

/// Client-side check before the request leaves the page. The backend
/// revalidates everything; this only catches the obvious.
pub fn register_problem(
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Option<&'static str> {
    if name.trim().is_empty() || email.trim().is_empty() {
        return Some("Fill in your name and email.");
    }
    if password.len() < 8 {
        return Some("Password must be at least 8 characters.");
    }
    if password != confirm {
        return Some("Passwords do not match.");
    }
    None
}

#[component]
pub fn Register(referral: Option<String>) -> Element {
    let auth = use_auth();
    let client = use_api();
    let nav = use_navigator();

    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut referral_code = use_signal(|| referral.clone().unwrap_or_default());
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let public_config = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.public_config().await.ok() }
        }
    });

    let submit = {
        let client = client.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            if let Some(problem) = register_problem(&name(), &email(), &password(), &confirm()) {
                error.set(Some(problem.to_string()));
                return;
            }

            let client = client.clone();
            let request = RegisterRequest {
                name: name().trim().to_string(),
                email: email().trim().to_string(),
                password: password(),
                referral_code: Some(referral_code().trim().to_string())
                    .filter(|code| !code.is_empty()),
            };

            busy.set(true);
            error.set(None);
            spawn(async move {
                match client.register(&request).await {
                    Ok(user) => {
                        auth.signed_in(user);
                        nav.replace(Route::Dashboard {});
                    }
                    Err(err) => {
                        error.set(Some(err.user_message()));
                    }
                }
                busy.set(false);
            });
        }
    };

    let config = public_config
        .read()
        .clone()
        .flatten()
        .unwrap_or_else(PublicConfig::default);

    rsx! {
        HeadAssets { title: "Create account - PIX Console".to_string() }

        main { class: "container narrow",
            article {
                hgroup {
                    h1 { "Create account" }
                    p { "Start collecting PIX payments" }
                }

                if let Some(message) = error() {
                    ErrorAlert {
                        message,
                        on_dismiss: move |_| error.set(None),
                    }
                }

                if !config.registration_enabled {
                    p { class: "status-err",
                        "Registration is currently closed on this platform."
                    }
                } else {
                    form { onsubmit: submit,
                        label { "Name"
                            input {
                                r#type: "text",
                                autocomplete: "name",
                                required: true,
                                value: "{name}",
                                oninput: move |e| name.set(e.value()),
                            }
                        }
                        label { "Email"
                            input {
                                r#type: "email",
                                autocomplete: "email",
                                required: true,
                                value: "{email}",
                                oninput: move |e| email.set(e.value()),
                            }
                        }
                        div { class: "grid",
                            label { "Password"
                                input {
                                    r#type: "password",
                                    autocomplete: "new-password",
                                    required: true,
                                    value: "{password}",
                                    oninput: move |e| password.set(e.value()),
                                }
                            }
                            label { "Confirm password"
                                input {
                                    r#type: "password",
                                    autocomplete: "new-password",
                                    required: true,
                                    value: "{confirm}",
                                    oninput: move |e| confirm.set(e.value()),
                                }
                            }
                        }
                        label { "Referral code (optional)"
                            input {
                                r#type: "text",
                                value: "{referral_code}",
                                oninput: move |e| referral_code.set(e.value()),
                            }
                        }
                        button { r#type: "submit", aria_busy: "{busy}", disabled: busy(),
                            "Create account"
                        }
                    }
                    p {
                        "Already registered? "
                        a { href: "/login", "Sign in" }
                    }
                }
            }
        }
    }
}
