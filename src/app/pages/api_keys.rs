//! API keys for server-to-server integrations. The secret is shown once
//! at creation and never again.

use dioxus::prelude::*;

use crate::api::ApiKeyCreated;
use crate::app::auth::use_api;
use crate::app::clipboard;
use crate::app::components::{ErrorAlert, Layout, Modal};
use crate::app::format::format_date;
use crate::app::toast::use_toast;

#[component]
pub fn ApiKeys() -> Element {
    let client = use_api();
    let toast = use_toast();

    let mut keys = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.api_keys().await.ok() }
        }
    });

    let mut show_create = use_signal(|| false);
    let mut name = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut created = use_signal(|| None::<ApiKeyCreated>);

    let submit = {
        let client = client.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            if name().trim().is_empty() {
                error.set(Some("Give the key a name.".to_string()));
                return;
            }

            let client = client.clone();
            let key_name = name().trim().to_string();

            busy.set(true);
            error.set(None);
            spawn(async move {
                match client.create_api_key(&key_name).await {
                    Ok(result) => {
                        created.set(Some(result));
                        name.set(String::new());
                        keys.restart();
                    }
                    Err(err) => {
                        error.set(Some(err.user_message()));
                    }
                }
                busy.set(false);
            });
        }
    };

    let delete_key = {
        let client = client.clone();
        move |id: String| {
            let client = client.clone();
            spawn(async move {
                match client.delete_api_key(&id).await {
                    Ok(()) => {
                        toast.success("API key revoked");
                        keys.restart();
                    }
                    Err(err) => toast.error(err.user_message()),
                }
            });
        }
    };

    let list = keys.read().clone().flatten().unwrap_or_default();
    let is_loading = keys.read().is_none();

    rsx! {
        Layout {
            title: "API Keys".to_string(),
            nav_active: "api-keys".to_string(),

            div { class: "page-head",
                h1 { "API Keys" }
                button {
                    onclick: move |_| show_create.set(true),
                    "New key"
                }
            }

            p { class: "text-muted",
                "Keys authenticate server-to-server calls against the platform API. Revoking a key takes effect immediately."
            }

            if is_loading {
                p { aria_busy: "true", "Loading keys..." }
            } else if list.is_empty() {
                p { class: "text-muted", "No API keys yet." }
            } else {
                table {
                    thead {
                        tr {
                            th { "Name" }
                            th { "Key" }
                            th { "Created" }
                            th { "Last used" }
                            th { "" }
                        }
                    }
                    tbody {
                        for key in list {
                            tr { key: "{key.id}",
                                td { "{key.name}" }
                                td { code { "{key.prefix}..." } }
                                td { "{format_date(&key.created_at)}" }
                                td {
                                    "{key.last_used_at.as_deref().map(format_date).unwrap_or_else(|| \"never\".to_string())}"
                                }
                                td {
                                    button {
                                        class: "outline danger",
                                        onclick: {
                                            let mut delete_key = delete_key.clone();
                                            let id = key.id.clone();
                                            move |_| delete_key(id.clone())
                                        },
                                        "Revoke"
                                    }
                                }
                            }
                        }
                    }
                }
            }

            if show_create() {
                Modal {
                    title: if created().is_some() { "Key created".to_string() } else { "New API key".to_string() },
                    on_close: move |_| {
                        show_create.set(false);
                        created.set(None);
                        error.set(None);
                    },

                    if let Some(message) = error() {
                        ErrorAlert {
                            message,
                            on_dismiss: move |_| error.set(None),
                        }
                    }

                    if let Some(result) = created() {
                        p { class: "status-warn",
                            "Copy the secret now. It cannot be shown again."
                        }
                        textarea { readonly: true, rows: "2", "{result.secret}" }
                        button {
                            class: "outline",
                            onclick: {
                                let secret = result.secret.clone();
                                move |_| {
                                    let secret = secret.clone();
                                    spawn(async move {
                                        match clipboard::copy_to_clipboard(&secret).await {
                                            Ok(()) => toast.success("Secret copied"),
                                            Err(e) => toast.error(format!("Copy failed: {}", e)),
                                        }
                                    });
                                }
                            },
                            "Copy secret"
                        }
                    } else {
                        form { onsubmit: submit,
                            label { "Name"
                                input {
                                    r#type: "text",
                                    placeholder: "e.g. storefront backend",
                                    value: "{name}",
                                    oninput: move |e| name.set(e.value()),
                                }
                            }
                            button { r#type: "submit", aria_busy: "{busy}", disabled: busy(),
                                "Create key"
                            }
                        }
                    }
                }
            }
        }
    }
}
