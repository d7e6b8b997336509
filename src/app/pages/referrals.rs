//! Referrals page: your code, who signed up with it, and what it earned.

use dioxus::prelude::*;

use crate::app::auth::use_api;
use crate::app::clipboard;
use crate::app::components::Layout;
use crate::app::format::{format_brl, format_date};
use crate::app::toast::use_toast;

#[component]
pub fn Referrals() -> Element {
    let client = use_api();
    let toast = use_toast();

    let summary = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.referrals().await.ok() }
        }
    });

    let data = summary.read().clone().flatten();
    let is_loading = summary.read().is_none();

    rsx! {
        Layout {
            title: "Referrals".to_string(),
            nav_active: "referrals".to_string(),

            h1 { "Referrals" }

            if is_loading {
                p { aria_busy: "true", "Loading referrals..." }
            } else if let Some(data) = data {
                div { class: "grid",
                    article {
                        hgroup {
                            h2 { "Your code" }
                            p { "New accounts that register with it count as yours" }
                        }
                        p {
                            code { "{data.code}" }
                            button {
                                class: "outline inline-action",
                                onclick: {
                                    let code = data.code.clone();
                                    move |_| {
                                        let code = code.clone();
                                        spawn(async move {
                                            match clipboard::copy_to_clipboard(&code).await {
                                                Ok(()) => toast.success("Referral code copied"),
                                                Err(e) => toast.error(format!("Copy failed: {}", e)),
                                            }
                                        });
                                    }
                                },
                                "Copy"
                            }
                        }
                    }
                    article {
                        hgroup {
                            h2 { "Totals" }
                            p { "{data.active_referred} active of {data.total_referred} referred" }
                        }
                        p { class: "balance", "{format_brl(data.earnings_cents)}" }
                        p { class: "text-muted", "earned so far" }
                    }
                }

                section {
                    h2 { "Referred accounts" }
                    if data.referred.is_empty() {
                        p { class: "text-muted", "Nobody has used your code yet." }
                    } else {
                        table {
                            thead {
                                tr {
                                    th { "Name" }
                                    th { "Joined" }
                                    th { "Volume" }
                                }
                            }
                            tbody {
                                for referred in data.referred {
                                    tr { key: "{referred.name}",
                                        td { "{referred.name}" }
                                        td { "{format_date(&referred.created_at)}" }
                                        td { "{format_brl(referred.volume_cents)}" }
                                    }
                                }
                            }
                        }
                    }
                }
            } else {
                p { class: "status-err", "Could not load referral data." }
            }
        }
    }
}
