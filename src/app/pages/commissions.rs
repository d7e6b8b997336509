//! Commissions page: earnings from referred accounts' payment volume.

use dioxus::prelude::*;

use crate::app::auth::use_api;
use crate::app::components::Layout;
use crate::app::format::{format_brl, format_date};

#[component]
pub fn Commissions() -> Element {
    let client = use_api();

    let report = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.commissions().await.ok() }
        }
    });

    let data = report.read().clone().flatten();
    let is_loading = report.read().is_none();

    rsx! {
        Layout {
            title: "Commissions".to_string(),
            nav_active: "commissions".to_string(),

            h1 { "Commissions" }

            if is_loading {
                p { aria_busy: "true", "Loading commissions..." }
            } else if let Some(data) = data {
                div { class: "grid",
                    article {
                        hgroup {
                            h2 { "Total earned" }
                            p { "Credited to your balance" }
                        }
                        p { class: "balance", "{format_brl(data.total_cents)}" }
                    }
                    article {
                        hgroup {
                            h2 { "Pending" }
                            p { "Waiting for settlement" }
                        }
                        p { class: "balance", "{format_brl(data.pending_cents)}" }
                    }
                }

                section {
                    h2 { "Entries" }
                    if data.entries.is_empty() {
                        p { class: "text-muted", "No commission entries yet." }
                    } else {
                        table {
                            thead {
                                tr {
                                    th { "Date" }
                                    th { "Referred account" }
                                    th { "Amount" }
                                }
                            }
                            tbody {
                                for (i, entry) in data.entries.into_iter().enumerate() {
                                    tr { key: "{i}",
                                        td { "{format_date(&entry.date)}" }
                                        td { "{entry.referred_name}" }
                                        td { "{format_brl(entry.amount_cents)}" }
                                    }
                                }
                            }
                        }
                    }
                }
            } else {
                p { class: "status-err", "Could not load commission data." }
            }
        }
    }
}
