//! Public payment page: what a payer sees after following a charge link.
//!
//! No session is involved; the charge code in the URL is the only
//! credential. After the payer submits, the page shows the PIX QR and
//! waits for confirmation.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;

use crate::api::{PayReceipt, PayRequest};
use crate::app::auth::use_api;
use crate::app::clipboard;
use crate::app::components::{ErrorAlert, HeadAssets};
use crate::app::format::{format_brl, parse_brl};
use crate::app::toast::use_toast;
use crate::poll::{self, CancelGuard};

/// Form check before submitting a payment. `amount_text` only matters for
/// open-amount charges.
pub fn pay_problem(name: &str, needs_amount: bool, amount_text: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        return Some("Enter your name.");
    }
    if needs_amount && parse_brl(amount_text).filter(|c| *c > 0).is_none() {
        return Some("Enter a valid amount.");
    }
    None
}

/// Whether a charge in this backend status can still be paid.
pub fn is_payable(status: &str) -> bool {
    matches!(status, "" | "active" | "pending" | "created")
}

#[component]
pub fn Pay(code: String) -> Element {
    let client = use_api();
    let toast = use_toast();

    let charge = use_resource({
        let client = client.clone();
        let code = code.clone();
        move || {
            let client = client.clone();
            let code = code.clone();
            async move { client.public_charge(&code).await }
        }
    });

    let mut payer_name = use_signal(String::new);
    let mut payer_document = use_signal(String::new);
    let mut amount = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut receipt = use_signal(|| None::<PayReceipt>);
    let mut paid = use_signal(|| false);

    // Poll for payment confirmation; dropped with the page.
    let watch = use_hook(|| Rc::new(RefCell::new(None::<CancelGuard>)));

    let loaded = charge.read().clone();
    let needs_amount = matches!(&loaded, Some(Ok(c)) if c.amount_cents.is_none());

    let submit = {
        let client = client.clone();
        let code = code.clone();
        let watch = watch.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            if let Some(problem) = pay_problem(&payer_name(), needs_amount, &amount()) {
                error.set(Some(problem.to_string()));
                return;
            }

            let client = client.clone();
            let code = code.clone();
            let watch = watch.clone();
            let request = PayRequest {
                payer_name: payer_name().trim().to_string(),
                payer_document: Some(payer_document().trim().to_string())
                    .filter(|s| !s.is_empty()),
                amount_cents: if needs_amount {
                    parse_brl(&amount())
                } else {
                    None
                },
            };

            busy.set(true);
            error.set(None);
            spawn(async move {
                match client.pay_charge(&code, &request).await {
                    Ok(r) => {
                        let transaction_id = r.transaction_id.clone();
                        receipt.set(Some(r));

                        let guard = CancelGuard::new();
                        let token = guard.token();
                        *watch.borrow_mut() = Some(guard);

                        let poll_client = client.clone();
                        spawn(async move {
                            if poll::watch_charge(poll_client, transaction_id, token)
                                .await
                                .is_some()
                            {
                                paid.set(true);
                            }
                        });
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
        HeadAssets { title: "Pay with PIX".to_string() }

        main { class: "container narrow",
            {match loaded {
                None => rsx! {
                    p { aria_busy: "true", "Loading charge..." }
                },
                Some(Err(_)) => rsx! {
                    article { class: "status-err",
                        h2 { "Charge not found" }
                        p { "This payment link is invalid or no longer available." }
                    }
                },
                Some(Ok(charge)) => rsx! {
                    article {
                        header { class: "pay-brand",
                            if let Some(logo) = charge.logo_url.as_ref() {
                                img { class: "pay-logo", src: "{logo}", alt: "" }
                            }
                            hgroup {
                                h1 { "{charge.platform_name}" }
                                p { "Payment via PIX" }
                            }
                        }

                        if paid() {
                            div { class: "pay-confirmed",
                                h2 { class: "status-ok", "Payment confirmed" }
                                p { "Thank you, you can close this page." }
                            }
                        } else if let Some(receipt) = receipt() {
                            div { class: "qr-panel",
                                if let Some(qr) = receipt.qr_code.as_ref() {
                                    img { class: "qr-image", src: "{qr}", alt: "PIX QR code" }
                                }
                                p { aria_busy: "true", "Scan the QR or paste the code in your bank app. Waiting for payment..." }
                                if let Some(payload) = receipt.qr_code_text.clone() {
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
                        } else if !is_payable(&charge.status) {
                            p { class: "status-err", "This charge can no longer be paid." }
                        } else {
                            if let Some(description) = charge.description.as_ref() {
                                p { "{description}" }
                            }
                            if let Some(cents) = charge.amount_cents {
                                p { class: "balance", "{format_brl(cents)}" }
                            }

                            if let Some(message) = error() {
                                ErrorAlert {
                                    message,
                                    on_dismiss: move |_| error.set(None),
                                }
                            }

                            form { onsubmit: submit,
                                label { "Your name"
                                    input {
                                        r#type: "text",
                                        required: true,
                                        value: "{payer_name}",
                                        oninput: move |e| payer_name.set(e.value()),
                                    }
                                }
                                label { "CPF/CNPJ (optional)"
                                    input {
                                        r#type: "text",
                                        inputmode: "numeric",
                                        value: "{payer_document}",
                                        oninput: move |e| payer_document.set(e.value()),
                                    }
                                }
                                if charge.amount_cents.is_none() {
                                    label { "Amount"
                                        input {
                                            r#type: "text",
                                            inputmode: "decimal",
                                            placeholder: "0,00",
                                            value: "{amount}",
                                            oninput: move |e| amount.set(e.value()),
                                        }
                                    }
                                }
                                button { r#type: "submit", aria_busy: "{busy}", disabled: busy(),
                                    "Pay with PIX"
                                }
                            }
                        }
                    }
                },
            }}

            footer { class: "pay-footer",
                small { class: "text-muted", "Powered by PIX Console" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payer_name_is_required() {
        assert!(pay_problem("", false, "").is_some());
        assert!(pay_problem("  ", false, "").is_some());
        assert!(pay_problem("Maria", false, "").is_none());
    }

    #[test]
    fn open_amount_charges_validate_the_amount() {
        assert!(pay_problem("Maria", true, "").is_some());
        assert!(pay_problem("Maria", true, "0,00").is_some());
        assert!(pay_problem("Maria", true, "25,00").is_none());
    }

    #[test]
    fn only_open_statuses_are_payable() {
        assert!(is_payable("active"));
        assert!(is_payable("pending"));
        assert!(is_payable(""));
        assert!(!is_payable("paid"));
        assert!(!is_payable("expired"));
    }
}
