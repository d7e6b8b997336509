//! Transfers page: send balance to another wallet on the platform.
//!
//! The destination must be looked up and resolve to a named account
//! before the amount step unlocks; the fee preview only fires after
//! that.

use dioxus::prelude::*;

use crate::api::{NewTransferRequest, WalletLookup};
use crate::app::auth::use_api;
use crate::app::components::form_inputs::MoneyInput;
use crate::app::components::{ErrorAlert, Layout, StatusBadge};
use crate::app::format::{format_brl, format_date, parse_brl};
use crate::app::toast::use_toast;

/// Amount a transfer may carry.
pub fn transfer_amount_cents(raw: &str) -> Option<i64> {
    parse_brl(raw).filter(|cents| *cents > 0)
}

/// The confirm step unlocks only when the lookup named a recipient and
/// the amount parses. Nothing is calculated or sent before that.
pub fn can_continue(lookup: Option<&WalletLookup>, raw_amount: &str) -> bool {
    lookup.map(WalletLookup::names_recipient).unwrap_or(false)
        && transfer_amount_cents(raw_amount).is_some()
}

#[component]
pub fn Transfers() -> Element {
    let client = use_api();
    let toast = use_toast();

    let mut transfers = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.transfers().await.ok() }
        }
    });

    let mut frequent = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.frequent_recipients().await.ok() }
        }
    });

    let mut wallet = use_signal(String::new);
    let mut lookup = use_signal(|| None::<WalletLookup>);
    let mut looking = use_signal(|| false);
    let mut amount = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let run_lookup = {
        let client = client.clone();
        move |target: String| {
            let client = client.clone();
            let target = target.trim().to_string();
            if target.is_empty() {
                return;
            }

            looking.set(true);
            lookup.set(None);
            error.set(None);
            spawn(async move {
                match client.validate_wallet(&target).await {
                    Ok(result) => lookup.set(Some(result)),
                    Err(err) => error.set(Some(err.user_message())),
                }
                looking.set(false);
            });
        }
    };

    // Fee preview, gated on a validated recipient.
    let fee_preview = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            let recipient_ok = lookup().map(|l| l.names_recipient()).unwrap_or(false);
            let raw = amount();
            async move {
                if !recipient_ok {
                    return None;
                }
                let cents = transfer_amount_cents(&raw)?;
                client.transfer_preview(cents).await.ok()
            }
        }
    });

    let submit = {
        let client = client.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            let Some(resolved) = lookup().filter(|l| l.names_recipient()) else {
                return;
            };
            let Some(amount_cents) = transfer_amount_cents(&amount()) else {
                return;
            };

            let client = client.clone();
            let request = NewTransferRequest {
                wallet: resolved.wallet,
                amount_cents,
                description: Some(description().trim().to_string()).filter(|s| !s.is_empty()),
            };

            busy.set(true);
            error.set(None);
            spawn(async move {
                match client.create_transfer(&request).await {
                    Ok(t) => {
                        tracing::info!("transfer {} sent", t.id);
                        toast.success("Transfer sent");
                        wallet.set(String::new());
                        lookup.set(None);
                        amount.set(String::new());
                        description.set(String::new());
                        transfers.restart();
                        frequent.restart();
                    }
                    Err(err) => {
                        error.set(Some(err.user_message()));
                    }
                }
                busy.set(false);
            });
        }
    };

    let list = transfers.read().clone().flatten().unwrap_or_default();
    let is_loading = transfers.read().is_none();
    let chips = frequent.read().clone().flatten().unwrap_or_default();
    let resolved = lookup();
    let preview = fee_preview.read().clone().flatten();
    let ready = can_continue(resolved.as_ref(), &amount());

    rsx! {
        Layout {
            title: "Transfers".to_string(),
            nav_active: "transfers".to_string(),

            h1 { "Transfers" }

            article {
                hgroup {
                    h2 { "Send a transfer" }
                    p { "Instant, between wallets on this platform" }
                }

                if let Some(message) = error() {
                    ErrorAlert {
                        message,
                        on_dismiss: move |_| error.set(None),
                    }
                }

                if !chips.is_empty() {
                    p { class: "text-muted", "Frequent recipients:" }
                    div { class: "chip-row",
                        for recipient in chips {
                            button {
                                key: "{recipient.wallet}",
                                class: "outline chip",
                                onclick: {
                                    let mut run_lookup = run_lookup.clone();
                                    let target = recipient.wallet.clone();
                                    move |_| {
                                        wallet.set(target.clone());
                                        run_lookup(target.clone());
                                    }
                                },
                                "{recipient.name} ({recipient.transfer_count}x)"
                            }
                        }
                    }
                }

                form { onsubmit: submit,
                    label { "Destination wallet"
                        fieldset { role: "group",
                            input {
                                r#type: "text",
                                placeholder: "wallet id",
                                value: "{wallet}",
                                oninput: move |e| {
                                    wallet.set(e.value());
                                    // A changed destination invalidates the lookup.
                                    lookup.set(None);
                                },
                            }
                            button {
                                r#type: "button",
                                aria_busy: "{looking}",
                                disabled: looking(),
                                onclick: {
                                    let mut run_lookup = run_lookup.clone();
                                    move |_| run_lookup(wallet())
                                },
                                "Check"
                            }
                        }
                    }

                    {match resolved.as_ref() {
                        Some(l) if l.names_recipient() => rsx! {
                            p { class: "status-ok",
                                "Recipient: "
                                strong { "{l.name.clone().unwrap_or_default()}" }
                            }
                        },
                        Some(_) => rsx! {
                            p { class: "status-err", "No account found for this wallet." }
                        },
                        None => rsx! {},
                    }}

                    div { class: "grid",
                        MoneyInput {
                            label: "Amount",
                            value: amount(),
                            disabled: !resolved.as_ref().map(WalletLookup::names_recipient).unwrap_or(false),
                            on_change: move |v| amount.set(v),
                        }
                        label { "Description (optional)"
                            input {
                                r#type: "text",
                                value: "{description}",
                                oninput: move |e| description.set(e.value()),
                            }
                        }
                    }

                    if let Some(preview) = preview.as_ref() {
                        p { class: "fee-preview",
                            "Fee {format_brl(preview.fee_cents)}, recipient gets "
                            strong { "{format_brl(preview.net_cents)}" }
                        }
                    }

                    button {
                        r#type: "submit",
                        aria_busy: "{busy}",
                        disabled: busy() || !ready,
                        "Send transfer"
                    }
                }
            }

            section {
                h2 { "History" }
                if is_loading {
                    p { aria_busy: "true", "Loading transfers..." }
                } else if list.is_empty() {
                    p { class: "text-muted", "No transfers yet." }
                } else {
                    table {
                        thead {
                            tr {
                                th { "Date" }
                                th { "Direction" }
                                th { "Counterparty" }
                                th { "Amount" }
                                th { "Status" }
                            }
                        }
                        tbody {
                            for t in list {
                                tr { key: "{t.id}",
                                    td { "{format_date(&t.created_at)}" }
                                    td {
                                        if t.is_received() {
                                            span { class: "status-ok", "received" }
                                        } else {
                                            span { "sent" }
                                        }
                                    }
                                    td { "{t.counterparty}" }
                                    td { "{format_brl(t.amount_cents)}" }
                                    td { StatusBadge { status: t.status.clone() } }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
