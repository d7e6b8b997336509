//! Admin area: platform stats, user list, withdrawal review, platform
//! config, and the support team roster.

use dioxus::prelude::*;

use crate::api::PlatformConfig;
use crate::app::auth::{use_api, use_auth};
use crate::app::components::{Layout, StatusBadge};
use crate::app::format::{format_brl, format_date, parse_brl};
use crate::app::toast::use_toast;

#[derive(Clone, Copy, PartialEq, Default)]
enum AdminTab {
    #[default]
    Stats,
    Users,
    Withdrawals,
    Config,
    Team,
}

impl AdminTab {
    const ALL: [AdminTab; 5] = [
        AdminTab::Stats,
        AdminTab::Users,
        AdminTab::Withdrawals,
        AdminTab::Config,
        AdminTab::Team,
    ];

    fn label(&self) -> &'static str {
        match self {
            AdminTab::Stats => "Overview",
            AdminTab::Users => "Users",
            AdminTab::Withdrawals => "Withdrawals",
            AdminTab::Config => "Platform",
            AdminTab::Team => "Team",
        }
    }
}

#[component]
pub fn Admin() -> Element {
    let auth = use_auth();
    let mut tab = use_signal(AdminTab::default);

    if !auth.is_admin() {
        return rsx! {
            Layout {
                title: "Admin".to_string(),
                nav_active: "admin".to_string(),
                article { class: "status-err",
                    h2 { "Not authorized" }
                    p { "This area is restricted to platform administrators." }
                }
            }
        };
    }

    rsx! {
        Layout {
            title: "Admin".to_string(),
            nav_active: "admin".to_string(),

            h1 { "Admin" }

            div { role: "group", class: "tab-bar",
                for candidate in AdminTab::ALL {
                    button {
                        class: if tab() == candidate { "" } else { "outline" },
                        onclick: move |_| tab.set(candidate),
                        "{candidate.label()}"
                    }
                }
            }

            {match tab() {
                AdminTab::Stats => rsx! { StatsTab {} },
                AdminTab::Users => rsx! { UsersTab {} },
                AdminTab::Withdrawals => rsx! { WithdrawalsTab {} },
                AdminTab::Config => rsx! { ConfigTab {} },
                AdminTab::Team => rsx! { TeamTab {} },
            }}
        }
    }
}

#[component]
fn StatsTab() -> Element {
    let client = use_api();

    let stats = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.admin_stats().await.ok() }
        }
    });

    let data = stats.read().clone().flatten();

    rsx! {
        section {
            if let Some(s) = data {
                div { class: "grid",
                    article {
                        hgroup { h2 { "Users" } p { "registered" } }
                        p { class: "balance", "{s.total_users}" }
                    }
                    article {
                        hgroup { h2 { "Transactions" } p { "{s.transactions_today} today" } }
                        p { class: "balance", "{s.total_transactions}" }
                    }
                }
                div { class: "grid",
                    article {
                        hgroup { h2 { "Volume" } p { "all time" } }
                        p { class: "balance", "{format_brl(s.volume_cents)}" }
                    }
                    article {
                        hgroup { h2 { "Fees collected" } p { "platform revenue" } }
                        p { class: "balance", "{format_brl(s.fees_cents)}" }
                    }
                    article {
                        hgroup { h2 { "Pending withdrawals" } p { "waiting for review" } }
                        p { class: "balance", "{s.pending_withdrawals}" }
                    }
                }
            } else {
                p { aria_busy: "true", "Loading stats..." }
            }
        }
    }
}

#[component]
fn UsersTab() -> Element {
    let client = use_api();

    let users = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.admin_users().await.ok() }
        }
    });

    let list = users.read().clone().flatten().unwrap_or_default();
    let is_loading = users.read().is_none();

    rsx! {
        section {
            if is_loading {
                p { aria_busy: "true", "Loading users..." }
            } else if list.is_empty() {
                p { class: "text-muted", "No users." }
            } else {
                table {
                    thead {
                        tr {
                            th { "Name" }
                            th { "Email" }
                            th { "Role" }
                            th { "Balance" }
                            th { "Volume" }
                            th { "Joined" }
                        }
                    }
                    tbody {
                        for u in list {
                            tr { key: "{u.id}",
                                td { "{u.name}" }
                                td { "{u.email}" }
                                td { "{u.role}" }
                                td { "{format_brl(u.balance_cents)}" }
                                td { "{format_brl(u.volume_cents)}" }
                                td { "{format_date(&u.created_at)}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn WithdrawalsTab() -> Element {
    let client = use_api();
    let toast = use_toast();

    let mut withdrawals = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.admin_withdrawals().await.ok() }
        }
    });

    let review = {
        let client = client.clone();
        move |(id, status): (String, &'static str)| {
            let client = client.clone();
            spawn(async move {
                match client.set_admin_withdrawal_status(&id, status).await {
                    Ok(_) => {
                        toast.success(format!("Withdrawal {}", status));
                        withdrawals.restart();
                    }
                    Err(err) => toast.error(err.user_message()),
                }
            });
        }
    };

    let list = withdrawals.read().clone().flatten().unwrap_or_default();
    let is_loading = withdrawals.read().is_none();

    rsx! {
        section {
            if is_loading {
                p { aria_busy: "true", "Loading withdrawals..." }
            } else if list.is_empty() {
                p { class: "text-muted", "No withdrawals to review." }
            } else {
                table {
                    thead {
                        tr {
                            th { "Requested" }
                            th { "User" }
                            th { "Amount" }
                            th { "Net" }
                            th { "PIX key" }
                            th { "Status" }
                            th { "" }
                        }
                    }
                    tbody {
                        for w in list {
                            tr { key: "{w.id}",
                                td { "{format_date(&w.created_at)}" }
                                td { "{w.user_name}" }
                                td { "{format_brl(w.amount_cents)}" }
                                td { "{format_brl(w.net_cents)}" }
                                td { "{w.pix_key}" }
                                td { StatusBadge { status: w.status.clone() } }
                                td {
                                    if w.status == "pending" {
                                        div { role: "group",
                                            button {
                                                onclick: {
                                                    let mut review = review.clone();
                                                    let id = w.id.clone();
                                                    move |_| review((id.clone(), "approved"))
                                                },
                                                "Approve"
                                            }
                                            button {
                                                class: "outline danger",
                                                onclick: {
                                                    let mut review = review.clone();
                                                    let id = w.id.clone();
                                                    move |_| review((id.clone(), "rejected"))
                                                },
                                                "Reject"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ConfigTab() -> Element {
    let client = use_api();

    let current = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.admin_config().await.ok() }
        }
    });

    let mut platform_name = use_signal(String::new);
    let mut support_email = use_signal(String::new);
    let mut deposit_fee_percent = use_signal(String::new);
    let mut withdrawal_fee_percent = use_signal(String::new);
    let mut min_withdrawal = use_signal(String::new);
    let mut registration_enabled = use_signal(|| true);
    let mut save_status = use_signal(|| None::<String>);

    // Sync loaded config into the form.
    use_effect(move || {
        if let Some(Some(cfg)) = current.read().as_ref() {
            platform_name.set(cfg.platform_name.clone());
            support_email.set(cfg.support_email.clone());
            deposit_fee_percent.set(format!("{}", cfg.deposit_fee_percent));
            withdrawal_fee_percent.set(format!("{}", cfg.withdrawal_fee_percent));
            min_withdrawal.set(format_brl(cfg.min_withdrawal_cents).replace("R$ ", ""));
            registration_enabled.set(cfg.registration_enabled);
        }
    });

    let save = {
        let client = client.clone();
        move |e: Event<FormData>| {
            e.prevent_default();
            let client = client.clone();
            let previous = current.read().clone().flatten().unwrap_or_default();
            let update = PlatformConfig {
                platform_name: platform_name().trim().to_string(),
                support_email: support_email().trim().to_string(),
                deposit_fee_percent: deposit_fee_percent().parse().unwrap_or(previous.deposit_fee_percent),
                withdrawal_fee_percent: withdrawal_fee_percent()
                    .parse()
                    .unwrap_or(previous.withdrawal_fee_percent),
                min_withdrawal_cents: parse_brl(&min_withdrawal())
                    .unwrap_or(previous.min_withdrawal_cents),
                registration_enabled: registration_enabled(),
                ..previous
            };

            save_status.set(Some("Saving...".to_string()));
            spawn(async move {
                match client.update_admin_config(&update).await {
                    Ok(_) => save_status.set(Some("Saved".to_string())),
                    Err(e) => save_status.set(Some(format!("Error: {}", e.user_message()))),
                }
            });
        }
    };

    rsx! {
        section {
            if current.read().is_none() {
                p { aria_busy: "true", "Loading config..." }
            } else {
                article {
                    form { onsubmit: save,
                        div { class: "grid",
                            label { "Platform name"
                                input {
                                    r#type: "text",
                                    value: "{platform_name}",
                                    oninput: move |e| platform_name.set(e.value()),
                                }
                            }
                            label { "Support email"
                                input {
                                    r#type: "email",
                                    value: "{support_email}",
                                    oninput: move |e| support_email.set(e.value()),
                                }
                            }
                        }
                        div { class: "grid",
                            label { "Deposit fee (%)"
                                input {
                                    r#type: "text",
                                    inputmode: "decimal",
                                    value: "{deposit_fee_percent}",
                                    oninput: move |e| deposit_fee_percent.set(e.value()),
                                }
                            }
                            label { "Withdrawal fee (%)"
                                input {
                                    r#type: "text",
                                    inputmode: "decimal",
                                    value: "{withdrawal_fee_percent}",
                                    oninput: move |e| withdrawal_fee_percent.set(e.value()),
                                }
                            }
                            label { "Minimum withdrawal"
                                input {
                                    r#type: "text",
                                    inputmode: "decimal",
                                    value: "{min_withdrawal}",
                                    oninput: move |e| min_withdrawal.set(e.value()),
                                }
                            }
                        }
                        label {
                            input {
                                r#type: "checkbox",
                                role: "switch",
                                checked: registration_enabled(),
                                onchange: move |e| registration_enabled.set(e.checked()),
                            }
                            "Allow new registrations"
                        }
                        button { r#type: "submit", "Save platform config" }
                        if let Some(status) = save_status() {
                            if status.starts_with("Error") {
                                span { class: "status-err", " {status}" }
                            } else {
                                span { class: "status-ok", " {status}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TeamTab() -> Element {
    let client = use_api();

    let team = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { client.admin_team().await.ok() }
        }
    });

    let list = team.read().clone().flatten().unwrap_or_default();
    let is_loading = team.read().is_none();

    rsx! {
        section {
            if is_loading {
                p { aria_busy: "true", "Loading team..." }
            } else if list.is_empty() {
                p { class: "text-muted", "No team members." }
            } else {
                table {
                    thead {
                        tr {
                            th { "Name" }
                            th { "Email" }
                            th { "Role" }
                        }
                    }
                    tbody {
                        for member in list {
                            tr { key: "{member.id}",
                                td { "{member.name}" }
                                td { "{member.email}" }
                                td { "{member.role}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
