//! Withdrawals page: request a payout to a PIX key and track its status.

use dioxus::prelude::*;

use crate::api::NewWithdrawalRequest;
use crate::app::auth::{use_api, use_auth};
use crate::app::components::form_inputs::MoneyInput;
use crate::app::components::{ErrorAlert, Layout, StatusBadge};
use crate::app::format::{format_brl, format_date, parse_brl};
use crate::app::toast::use_toast;

/// Platform fallback when the backend does not announce a minimum.
pub const DEFAULT_MIN_WITHDRAWAL_CENTS: i64 = 1000;

pub fn effective_min(config_min: i64) -> i64 {
    if config_min > 0 {
        config_min
    } else {
        DEFAULT_MIN_WITHDRAWAL_CENTS
    }
}

/// Amount worth previewing fees for. Below the minimum nothing is fetched
/// and nothing can be submitted.
pub fn preview_amount(raw: &str, min_cents: i64) -> Option<i64> {
    parse_brl(raw).filter(|cents| *cents >= min_cents)
}

pub fn can_submit(
    raw: &str,
    min_cents: i64,
    pix_key: &str,
    needs_code: bool,
    code: &str,
) -> bool {
    preview_amount(raw, min_cents).is_some()
        && !pix_key.trim().is_empty()
        && (!needs_code || code.trim().len() == 6)
}

const KEY_TYPES: [(&str, &str); 5] = [
    ("cpf", "CPF"),
    ("cnpj", "CNPJ"),
    ("email", "Email"),
    ("phone", "Phone"),
    ("random", "Random key"),
];

/// Guess the key type from what was typed, so the selector follows the
/// key instead of the user having to set both. `None` when the shape is
/// still ambiguous; the current selection is left alone.
///
/// Phone keys carry the +country prefix on PIX, so bare digits read as
/// CPF/CNPJ documents.
pub fn detect_key_type(key: &str) -> Option<&'static str> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let email = regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok()?;
    if email.is_match(key) {
        return Some("email");
    }

    let evp = regex::Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
    .ok()?;
    if evp.is_match(key) {
        return Some("random");
    }

    let phone = regex::Regex::new(r"^\+[1-9]\d{7,14}$").ok()?;
    if phone.is_match(key) {
        return Some("phone");
    }

    // Digits with document punctuation only, e.g. "123.456.789-09".
    let document = regex::Regex::new(r"^[\d./-]+$").ok()?;
    if document.is_match(key) {
        match key.chars().filter(|c| c.is_ascii_digit()).count() {
            11 => return Some("cpf"),
            14 => return Some("cnpj"),
            _ => {}
        }
    }

    None
}

#[component]
pub fn Withdrawals() -> Element {
    let auth = use_auth();
    let client = use_api();
    let toast = use_toast();

    let mut withdrawals = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.withdrawals().await.ok() }
        }
    });

    let config = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.public_config().await.ok() }
        }
    });

    let mut amount = use_signal(String::new);
    let mut pix_key = use_signal(String::new);
    let mut pix_key_type = use_signal(|| "cpf".to_string());
    let mut code = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let needs_code = auth.user().map(|u| u.two_factor_enabled).unwrap_or(false);

    // Fee preview follows the amount field, but only from the minimum up.
    let fee_preview = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            let raw = amount();
            let min_cents = effective_min(
                config
                    .read()
                    .clone()
                    .flatten()
                    .map(|c| c.min_withdrawal_cents)
                    .unwrap_or(0),
            );
            async move {
                let cents = preview_amount(&raw, min_cents)?;
                client.withdrawal_preview(cents).await.ok()
            }
        }
    });

    let min_cents = effective_min(
        config
            .read()
            .clone()
            .flatten()
            .map(|c| c.min_withdrawal_cents)
            .unwrap_or(0),
    );
    let submit_ready = can_submit(&amount(), min_cents, &pix_key(), needs_code, &code());

    let submit = {
        let client = client.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            let Some(amount_cents) = preview_amount(&amount(), min_cents) else {
                return;
            };

            let client = client.clone();
            let request = NewWithdrawalRequest {
                amount_cents,
                pix_key: pix_key().trim().to_string(),
                pix_key_type: pix_key_type(),
                two_factor_code: Some(code().trim().to_string()).filter(|c| !c.is_empty()),
            };

            busy.set(true);
            error.set(None);
            spawn(async move {
                match client.create_withdrawal(&request).await {
                    Ok(w) => {
                        tracing::info!("withdrawal {} requested", w.id);
                        toast.success("Withdrawal requested");
                        amount.set(String::new());
                        pix_key.set(String::new());
                        code.set(String::new());
                        withdrawals.restart();
                    }
                    Err(err) => {
                        error.set(Some(err.user_message()));
                    }
                }
                busy.set(false);
            });
        }
    };

    let list = withdrawals.read().clone().flatten().unwrap_or_default();
    let is_loading = withdrawals.read().is_none();
    let preview = fee_preview.read().clone().flatten();

    rsx! {
        Layout {
            title: "Withdrawals".to_string(),
            nav_active: "withdrawals".to_string(),

            h1 { "Withdrawals" }

            article {
                hgroup {
                    h2 { "Request a withdrawal" }
                    p { "Minimum {format_brl(min_cents)} per request" }
                }

                if let Some(message) = error() {
                    ErrorAlert {
                        message,
                        on_dismiss: move |_| error.set(None),
                    }
                }

                form { onsubmit: submit,
                    div { class: "grid",
                        MoneyInput {
                            label: "Amount",
                            value: amount(),
                            on_change: move |v| amount.set(v),
                        }
                        label { "PIX key type"
                            select {
                                value: "{pix_key_type}",
                                onchange: move |e| pix_key_type.set(e.value()),
                                for (value, label) in KEY_TYPES {
                                    option { value: "{value}", "{label}" }
                                }
                            }
                        }
                        label { "PIX key"
                            input {
                                r#type: "text",
                                value: "{pix_key}",
                                oninput: move |e| {
                                    let value = e.value();
                                    if let Some(kind) = detect_key_type(&value) {
                                        pix_key_type.set(kind.to_string());
                                    }
                                    pix_key.set(value);
                                },
                            }
                        }
                    }
                    if needs_code {
                        label { "2FA code"
                            input {
                                r#type: "text",
                                inputmode: "numeric",
                                maxlength: "6",
                                value: "{code}",
                                oninput: move |e| code.set(e.value()),
                            }
                        }
                    }

                    if let Some(preview) = preview.as_ref() {
                        p { class: "fee-preview",
                            "Fee {format_brl(preview.fee_cents)}, you receive "
                            strong { "{format_brl(preview.net_cents)}" }
                        }
                    }

                    button {
                        r#type: "submit",
                        aria_busy: "{busy}",
                        disabled: busy() || !submit_ready,
                        "Request withdrawal"
                    }
                }
            }

            section {
                h2 { "History" }
                if is_loading {
                    p { aria_busy: "true", "Loading withdrawals..." }
                } else if list.is_empty() {
                    p { class: "text-muted", "No withdrawals yet." }
                } else {
                    table {
                        thead {
                            tr {
                                th { "Requested" }
                                th { "Amount" }
                                th { "Fee" }
                                th { "Net" }
                                th { "PIX key" }
                                th { "Status" }
                            }
                        }
                        tbody {
                            for w in list {
                                tr { key: "{w.id}",
                                    td { "{format_date(&w.created_at)}" }
                                    td { "{format_brl(w.amount_cents)}" }
                                    td { "{format_brl(w.fee_cents)}" }
                                    td { "{format_brl(w.net_cents)}" }
                                    td { "{w.pix_key}" }
                                    td { StatusBadge { status: w.status.clone() } }
                                }
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
    fn below_minimum_fetches_no_preview() {
        assert_eq!(preview_amount("5,00", 1000), None);
        assert_eq!(preview_amount("9,99", 1000), None);
        assert_eq!(preview_amount("10,00", 1000), Some(1000));
    }

    #[test]
    fn below_minimum_cannot_submit() {
        assert!(!can_submit("5,00", 1000, "a@b.com", false, ""));
        assert!(can_submit("10,00", 1000, "a@b.com", false, ""));
    }

    #[test]
    fn submission_needs_a_pix_key() {
        assert!(!can_submit("10,00", 1000, "", false, ""));
        assert!(!can_submit("10,00", 1000, "   ", false, ""));
    }

    #[test]
    fn two_factor_accounts_need_a_code() {
        assert!(!can_submit("10,00", 1000, "a@b.com", true, ""));
        assert!(!can_submit("10,00", 1000, "a@b.com", true, "123"));
        assert!(can_submit("10,00", 1000, "a@b.com", true, "123456"));
    }

    #[test]
    fn config_minimum_overrides_the_default() {
        assert_eq!(effective_min(0), DEFAULT_MIN_WITHDRAWAL_CENTS);
        assert_eq!(effective_min(2500), 2500);
    }

    #[test]
    fn typed_keys_select_their_own_type() {
        assert_eq!(detect_key_type("ana@example.com"), Some("email"));
        assert_eq!(detect_key_type("+5511987654321"), Some("phone"));
        assert_eq!(detect_key_type("12345678909"), Some("cpf"));
        assert_eq!(detect_key_type("123.456.789-09"), Some("cpf"));
        assert_eq!(detect_key_type("12.345.678/0001-95"), Some("cnpj"));
        assert_eq!(
            detect_key_type("b6295b1b-4c65-4a1f-8e5a-2d9c62d1a0f3"),
            Some("random")
        );
    }

    #[test]
    fn ambiguous_keys_leave_the_selection_alone() {
        assert_eq!(detect_key_type(""), None);
        assert_eq!(detect_key_type("   "), None);
        assert_eq!(detect_key_type("123"), None);
        assert_eq!(detect_key_type("ana@"), None);
        assert_eq!(detect_key_type("+55 11 98765-4321"), None);
    }
}
