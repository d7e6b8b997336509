//! Dashboard: balance, referral code, and the latest charges.

use dioxus::prelude::*;

use crate::app::auth::{use_api, use_auth};
use crate::app::clipboard;
use crate::app::components::{Layout, StatusBadge};
use crate::app::format::{format_brl, format_date};
use crate::app::toast::use_toast;

const RECENT_LIMIT: usize = 5;

#[component]
pub fn Dashboard() -> Element {
    let auth = use_auth();
    let client = use_api();
    let toast = use_toast();

    // The cached profile may be stale; refetch for the balance card.
    let profile = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.me().await.ok() }
        }
    });

    let transactions = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.transactions().await.ok() }
        }
    });

    let user = profile.read().clone().flatten().or_else(|| auth.user());
    let recent: Vec<_> = transactions
        .read()
        .clone()
        .flatten()
        .unwrap_or_default()
        .into_iter()
        .take(RECENT_LIMIT)
        .collect();
    let is_loading = transactions.read().is_none();

    let copy_referral = {
        let code = user.as_ref().map(|u| u.referral_code.clone()).unwrap_or_default();
        move |_| {
            let code = code.clone();
            spawn(async move {
                match clipboard::copy_to_clipboard(&code).await {
                    Ok(()) => toast.success("Referral code copied"),
                    Err(e) => toast.error(format!("Copy failed: {}", e)),
                }
            });
        }
    };

    rsx! {
        Layout {
            title: "Dashboard".to_string(),
            nav_active: "dashboard".to_string(),

            h1 { "Dashboard" }

            div { class: "grid",
                article {
                    hgroup {
                        h2 { "Balance" }
                        p { "Available for transfers and withdrawals" }
                    }
                    if let Some(user) = user.as_ref() {
                        p { class: "balance", "{format_brl(user.balance_cents)}" }
                    } else {
                        p { aria_busy: "true", "Loading..." }
                    }
                }
                article {
                    hgroup {
                        h2 { "Referral code" }
                        p { "Share it to earn commission on referred volume" }
                    }
                    if let Some(user) = user.as_ref() {
                        p {
                            code { "{user.referral_code}" }
                            button {
                                class: "outline inline-action",
                                onclick: copy_referral,
                                "Copy"
                            }
                        }
                    } else {
                        p { aria_busy: "true", "Loading..." }
                    }
                }
            }

            section {
                hgroup {
                    h2 { "Recent charges" }
                    p { "Your latest collection activity" }
                }
                if is_loading {
                    p { aria_busy: "true", "Loading charges..." }
                } else if recent.is_empty() {
                    p { class: "text-muted", "No charges yet. Create one from the Charges page." }
                } else {
                    table {
                        thead {
                            tr {
                                th { "Created" }
                                th { "Description" }
                                th { "Amount" }
                                th { "Status" }
                            }
                        }
                        tbody {
                            for tx in recent {
                                tr { key: "{tx.id}",
                                    td { "{format_date(&tx.created_at)}" }
                                    td { "{tx.description}" }
                                    td { "{format_brl(tx.amount_cents)}" }
                                    td { StatusBadge { status: tx.status.clone() } }
                                }
                            }
                        }
                    }
                    p {
                        a { href: "/transactions", "All charges" }
                    }
                }
            }
        }
    }
}
