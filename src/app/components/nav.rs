//! Navigation bar for the signed-in console.

use dioxus::prelude::*;

use crate::app::auth::{use_api, use_auth};

#[derive(Props, Clone, PartialEq)]
pub struct NavProps {
    /// The currently active page ID (e.g., "dashboard", "transfers")
    pub active: String,
}

#[component]
fn NavItem(href: &'static str, id: &'static str, label: &'static str, active: String) -> Element {
    rsx! {
        li {
            if active == id {
                a { href: "{href}", "aria-current": "page", strong { "{label}" } }
            } else {
                a { href: "{href}", "{label}" }
            }
        }
    }
}

/// Navigation bar using the Pico CSS nav pattern.
#[component]
pub fn Nav(props: NavProps) -> Element {
    let auth = use_auth();
    let client = use_api();

    rsx! {
        nav {
            ul {
                li {
                    strong { "PIX Console" }
                }
            }
            ul {
                NavItem { href: "/", id: "dashboard", label: "Dashboard", active: props.active.clone() }
                NavItem { href: "/transactions", id: "transactions", label: "Charges", active: props.active.clone() }
                NavItem { href: "/transfers", id: "transfers", label: "Transfers", active: props.active.clone() }
                NavItem { href: "/withdrawals", id: "withdrawals", label: "Withdrawals", active: props.active.clone() }
                NavItem { href: "/referrals", id: "referrals", label: "Referrals", active: props.active.clone() }
                NavItem { href: "/commissions", id: "commissions", label: "Commissions", active: props.active.clone() }
                NavItem { href: "/tickets", id: "tickets", label: "Support", active: props.active.clone() }
                NavItem { href: "/api-keys", id: "api-keys", label: "API Keys", active: props.active.clone() }
                NavItem { href: "/personalization", id: "personalization", label: "Personalization", active: props.active.clone() }
                NavItem { href: "/settings", id: "settings", label: "Settings", active: props.active.clone() }
                if auth.is_admin() {
                    NavItem { href: "/admin", id: "admin", label: "Admin", active: props.active.clone() }
                }
                if let Some(user) = auth.user() {
                    li {
                        span { class: "text-muted", "{user.name}" }
                    }
                }
                li {
                    a {
                        href: "#",
                        class: "secondary",
                        onclick: move |e: Event<MouseData>| {
                            e.prevent_default();
                            client.sign_out();
                            auth.signed_out();
                        },
                        "Sign out"
                    }
                }
            }
        }
    }
}
