//! Charges page: list existing charges, create new ones, and wait for
//! payment on a freshly created QR.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;

use crate::api::{NewChargeRequest, Transaction};
use crate::app::auth::use_api;
use crate::app::clipboard;
use crate::app::components::form_inputs::MoneyInput;
use crate::app::components::{ErrorAlert, Layout, Modal, StatusBadge};
use crate::app::format::{format_brl, format_date, parse_brl};
use crate::app::toast::use_toast;
use crate::poll::{self, CancelGuard};

/// Amount a new charge may carry. Zero and negative amounts are refused
/// before any request is made.
pub fn charge_amount_cents(raw: &str) -> Option<i64> {
    parse_brl(raw).filter(|cents| *cents > 0)
}

#[component]
pub fn Transactions() -> Element {
    let client = use_api();
    let toast = use_toast();

    let mut transactions = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.transactions().await.ok() }
        }
    });

    // Create-charge modal state
    let mut show_create = use_signal(|| false);
    let mut amount = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut payer_name = use_signal(String::new);
    let mut creating = use_signal(|| false);
    let mut create_error = use_signal(|| None::<String>);
    let mut created = use_signal(|| None::<Transaction>);
    let mut paid = use_signal(|| false);

    // Owns the payment poll for the charge shown in the modal. Replacing
    // or clearing the slot cancels the previous poll; unmount does too.
    let watch = use_hook(|| Rc::new(RefCell::new(None::<CancelGuard>)));

    let reset_modal = {
        let watch = watch.clone();
        move || {
            watch.borrow_mut().take();
            show_create.set(false);
            created.set(None);
            paid.set(false);
            create_error.set(None);
            amount.set(String::new());
            description.set(String::new());
            payer_name.set(String::new());
        }
    };

    let submit = {
        let client = client.clone();
        let watch = watch.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            let Some(amount_cents) = charge_amount_cents(&amount()) else {
                create_error.set(Some("Enter a valid amount.".to_string()));
                return;
            };

            let client = client.clone();
            let watch = watch.clone();
            let request = NewChargeRequest {
                amount_cents,
                description: description().trim().to_string(),
                payer_name: Some(payer_name().trim().to_string()).filter(|s| !s.is_empty()),
                payer_document: None,
            };

            creating.set(true);
            create_error.set(None);
            spawn(async move {
                match client.create_charge(&request).await {
                    Ok(tx) => {
                        let id = tx.id.clone();
                        created.set(Some(tx));

                        let guard = CancelGuard::new();
                        let token = guard.token();
                        *watch.borrow_mut() = Some(guard);

                        let poll_client = client.clone();
                        spawn(async move {
                            if let Some(status) =
                                poll::watch_charge(poll_client, id, token).await
                            {
                                tracing::info!("charge {} paid", status.id);
                                paid.set(true);
                                toast.success("Payment received");
                                transactions.restart();
                            }
                        });
                    }
                    Err(err) => {
                        create_error.set(Some(err.user_message()));
                    }
                }
                creating.set(false);
            });
        }
    };

    let list = transactions.read().clone().flatten().unwrap_or_default();
    let is_loading = transactions.read().is_none();

    rsx! {
        Layout {
            title: "Charges".to_string(),
            nav_active: "transactions".to_string(),

            div { class: "page-head",
                h1 { "Charges" }
                button {
                    onclick: move |_| show_create.set(true),
                    "New charge"
                }
            }

            if is_loading {
                p { aria_busy: "true", "Loading charges..." }
            } else if list.is_empty() {
                p { class: "text-muted", "No charges yet." }
            } else {
                table {
                    thead {
                        tr {
                            th { "Created" }
                            th { "Description" }
                            th { "Payer" }
                            th { "Amount" }
                            th { "Fee" }
                            th { "Status" }
                        }
                    }
                    tbody {
                        for tx in list {
                            tr { key: "{tx.id}",
                                td { "{format_date(&tx.created_at)}" }
                                td { "{tx.description}" }
                                td { "{tx.payer_name.clone().unwrap_or_default()}" }
                                td { "{format_brl(tx.amount_cents)}" }
                                td { "{format_brl(tx.fee_cents)}" }
                                td { StatusBadge { status: tx.status.clone() } }
                            }
                        }
                    }
                }
            }

            if show_create() {
                Modal {
                    title: if created().is_some() { "Charge created".to_string() } else { "New charge".to_string() },
                    on_close: {
                        let mut reset = reset_modal.clone();
                        move |_| reset()
                    },

                    if let Some(message) = create_error() {
                        ErrorAlert {
                            message,
                            on_dismiss: move |_| create_error.set(None),
                        }
                    }

                    if let Some(tx) = created() {
                        if paid() {
                            div { class: "pay-confirmed",
                                h3 { class: "status-ok", "Payment received" }
                                p { "{format_brl(tx.amount_cents)} confirmed." }
                                button {
                                    onclick: {
                                        let mut reset = reset_modal.clone();
                                        move |_| reset()
                                    },
                                    "Done"
                                }
                            }
                        } else {
                            div { class: "qr-panel",
                                if let Some(qr) = tx.qr_code.as_ref() {
                                    img { class: "qr-image", src: "{qr}", alt: "PIX QR code" }
                                }
                                p { aria_busy: "true", "Waiting for payment..." }
                                if let Some(payload) = tx.qr_code_text.clone() {
                                    textarea { readonly: true, rows: "4", "{payload}" }
                                    button {
                                        class: "outline",
                                        onclick: move |_| {
                                            let text = payload.clone();
                                            spawn(async move {
                                                match clipboard::copy_to_clipboard(&text).await {
                                                    Ok(()) => toast.success("PIX code copied"),
                                                    Err(e) => toast.error(format!("Copy failed: {}", e)),
                                                }
                                            });
                                        },
                                        "Copy PIX code"
                                    }
                                }
                            }
                        }
                    } else {
                        form { onsubmit: submit,
                            MoneyInput {
                                label: "Amount",
                                value: amount(),
                                on_change: move |v| amount.set(v),
                            }
                            label { "Description"
                                input {
                                    r#type: "text",
                                    placeholder: "What is this charge for?",
                                    value: "{description}",
                                    oninput: move |e| description.set(e.value()),
                                }
                            }
                            label { "Payer name (optional)"
                                input {
                                    r#type: "text",
                                    value: "{payer_name}",
                                    oninput: move |e| payer_name.set(e.value()),
                                }
                            }
                            button { r#type: "submit", aria_busy: "{creating}", disabled: creating(),
                                "Create charge"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_needs_a_positive_amount() {
        assert_eq!(charge_amount_cents("10,00"), Some(1000));
        assert_eq!(charge_amount_cents("0"), None);
        assert_eq!(charge_amount_cents("0,00"), None);
        assert_eq!(charge_amount_cents("abc"), None);
    }
}
