//! Layout component wrapping the signed-in console pages.

use dioxus::prelude::*;

use crate::app::toast::ToastHost;

use super::nav::Nav;

/// Head elements shared by every page, including the bare public ones.
#[component]
pub fn HeadAssets(title: String) -> Element {
    rsx! {
        // Dioxus hoists these into the real <head>
        document::Title { "{title}" }
        document::Link {
            rel: "stylesheet",
            href: asset!("/public/style.css")
        }
        document::Link {
            rel: "icon",
            r#type: "image/svg+xml",
            href: asset!("/public/favicon.svg")
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct LayoutProps {
    /// Page title (shown in browser tab)
    pub title: String,
    /// Active navigation item ID
    pub nav_active: String,
    /// Page content
    pub children: Element,
}

/// Main layout component wrapping all console pages.
#[component]
pub fn Layout(props: LayoutProps) -> Element {
    let version = env!("CARGO_PKG_VERSION");
    let full_title = format!("{} - PIX Console", props.title);

    rsx! {
        HeadAssets { title: full_title }

        Nav { active: props.nav_active.clone() }
        main { class: "container",
            {props.children}
        }
        ToastHost {}
        footer { class: "container footer",
            small { class: "text-muted", "PIX Console v{version}" }
        }
    }
}
