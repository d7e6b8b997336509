//! Sign-in page, including the second step for accounts with 2FA enabled.

use dioxus::prelude::*;

use crate::api::LoginOutcome;
use crate::app::auth::{use_api, use_auth};
use crate::app::components::{ErrorAlert, HeadAssets};
use crate::app::Route;
use crate::session::SessionPhase;

#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let client = use_api();
    let nav = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut code = use_signal(String::new);
    // Present once the backend asked for a second factor.
    let mut ticket = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    // Already signed in: nothing to do here.
    use_effect(move || {
        if auth.phase() == SessionPhase::Authenticated {
            nav.replace(Route::Dashboard {});
        }
    });

    let submit_credentials = {
        let client = client.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            let client = client.clone();
            let user_email = email();
            let user_password = password();

            busy.set(true);
            error.set(None);
            spawn(async move {
                match client.login(&user_email, &user_password).await {
                    Ok(LoginOutcome::Authenticated(user)) => {
                        auth.signed_in(user);
                        nav.replace(Route::Dashboard {});
                    }
                    Ok(LoginOutcome::TwoFactorRequired { ticket: t }) => {
                        ticket.set(Some(t));
                    }
                    Err(err) => {
                        error.set(Some(err.user_message()));
                    }
                }
                busy.set(false);
            });
        }
    };

    let submit_code = {
        let client = client.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            let client = client.clone();
            let Some(t) = ticket() else { return };
            let user_code = code();

            busy.set(true);
            error.set(None);
            spawn(async move {
                match client.login_2fa(&t, &user_code).await {
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

    rsx! {
        HeadAssets { title: "Sign in - PIX Console".to_string() }

        main { class: "container narrow",
            article {
                hgroup {
                    h1 { "PIX Console" }
                    p { "Sign in to your account" }
                }

                if let Some(message) = error() {
                    ErrorAlert {
                        message,
                        on_dismiss: move |_| error.set(None),
                    }
                }

                if ticket().is_none() {
                    form { onsubmit: submit_credentials,
                        label { "Email"
                            input {
                                r#type: "email",
                                autocomplete: "email",
                                required: true,
                                value: "{email}",
                                oninput: move |e| email.set(e.value()),
                            }
                        }
                        label { "Password"
                            input {
                                r#type: "password",
                                autocomplete: "current-password",
                                required: true,
                                value: "{password}",
                                oninput: move |e| password.set(e.value()),
                            }
                        }
                        button { r#type: "submit", aria_busy: "{busy}", disabled: busy(),
                            "Sign in"
                        }
                    }
                    p {
                        "No account yet? "
                        a { href: "/register", "Create one" }
                    }
                } else {
                    form { onsubmit: submit_code,
                        p { "Enter the 6-digit code from your authenticator app." }
                        label { "Code"
                            input {
                                r#type: "text",
                                inputmode: "numeric",
                                autocomplete: "one-time-code",
                                maxlength: "6",
                                required: true,
                                value: "{code}",
                                oninput: move |e| code.set(e.value()),
                            }
                        }
                        button { r#type: "submit", aria_busy: "{busy}", disabled: busy(),
                            "Verify"
                        }
                        button {
                            r#type: "button",
                            class: "secondary",
                            onclick: move |_| {
                                ticket.set(None);
                                code.set(String::new());
                            },
                            "Back"
                        }
                    }
                }
            }
        }
    }
}
