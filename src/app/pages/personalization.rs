//! Checkout personalization: branding shown on the public payment page.

use dioxus::prelude::*;

use crate::api::Personalization;
use crate::app::auth::use_api;
use crate::app::components::Layout;

#[component]
pub fn PersonalizationPage() -> Element {
    let client = use_api();

    let current = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.personalization().await.ok() }
        }
    });

    // Form fields
    let mut display_name = use_signal(String::new);
    let mut logo_url = use_signal(String::new);
    let mut primary_color = use_signal(|| "#00b37e".to_string());
    let mut checkout_message = use_signal(String::new);
    let mut save_status = use_signal(|| None::<String>);

    // Sync the saved branding into the form when it loads.
    use_effect(move || {
        if let Some(Some(p)) = current.read().as_ref() {
            display_name.set(p.display_name.clone());
            logo_url.set(p.logo_url.clone());
            if !p.primary_color.is_empty() {
                primary_color.set(p.primary_color.clone());
            }
            checkout_message.set(p.checkout_message.clone());
        }
    });

    let save = {
        let client = client.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            let client = client.clone();
            let update = Personalization {
                display_name: display_name().trim().to_string(),
                logo_url: logo_url().trim().to_string(),
                primary_color: primary_color(),
                checkout_message: checkout_message().trim().to_string(),
            };

            save_status.set(Some("Saving...".to_string()));
            spawn(async move {
                match client.update_personalization(&update).await {
                    Ok(_) => save_status.set(Some("Saved".to_string())),
                    Err(e) => save_status.set(Some(format!("Error: {}", e.user_message()))),
                }
            });
        }
    };

    let is_loading = current.read().is_none();

    rsx! {
        Layout {
            title: "Personalization".to_string(),
            nav_active: "personalization".to_string(),

            h1 { "Personalization" }
            p { class: "text-muted",
                "Payers see this branding on your public payment pages."
            }

            if is_loading {
                p { aria_busy: "true", "Loading branding..." }
            } else {
                article {
                    form { onsubmit: save,
                        label { "Display name"
                            input {
                                r#type: "text",
                                placeholder: "Your store name",
                                value: "{display_name}",
                                oninput: move |e| display_name.set(e.value()),
                            }
                        }
                        label { "Logo URL"
                            input {
                                r#type: "url",
                                placeholder: "https://...",
                                value: "{logo_url}",
                                oninput: move |e| logo_url.set(e.value()),
                            }
                        }
                        label { "Primary color"
                            input {
                                r#type: "color",
                                value: "{primary_color}",
                                oninput: move |e| primary_color.set(e.value()),
                            }
                        }
                        label { "Checkout message"
                            textarea {
                                rows: "3",
                                placeholder: "Shown under the amount, e.g. delivery details",
                                value: "{checkout_message}",
                                oninput: move |e| checkout_message.set(e.value()),
                            }
                        }
                        button { r#type: "submit", "Save branding" }
                        if let Some(status) = save_status() {
                            if status.starts_with("Error") {
                                span { class: "status-err", " {status}" }
                            } else {
                                span { class: "status-ok", " {status}" }
                            }
                        }
                    }
                }

                article { class: "preview-card",
                    hgroup {
                        h2 { "Preview" }
                        p { "Header of the public payment page" }
                    }
                    div { class: "pay-brand", style: "border-color: {primary_color};",
                        if !logo_url().is_empty() {
                            img { class: "pay-logo", src: "{logo_url}", alt: "" }
                        }
                        hgroup {
                            h3 { "{display_name}" }
                            if !checkout_message().is_empty() {
                                p { "{checkout_message}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
