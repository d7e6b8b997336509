//! Status pill used in transaction, withdrawal, and ticket tables.

use dioxus::prelude::*;

/// Tone groups for the backend's status strings.
pub fn status_tone(status: &str) -> &'static str {
    match status.to_ascii_lowercase().as_str() {
        "paid" | "completed" | "approved" | "received" | "active" | "open" => "status-ok",
        "pending" | "processing" | "created" | "awaiting" => "status-warn",
        "failed" | "rejected" | "cancelled" | "canceled" | "expired" | "closed" => "status-err",
        _ => "status-neutral",
    }
}

#[component]
pub fn StatusBadge(status: String) -> Element {
    let tone = status_tone(&status);
    rsx! {
        span { class: "badge {tone}", "{status}" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_known_statuses() {
        assert_eq!(status_tone("paid"), "status-ok");
        assert_eq!(status_tone("PAID"), "status-ok");
        assert_eq!(status_tone("pending"), "status-warn");
        assert_eq!(status_tone("expired"), "status-err");
        assert_eq!(status_tone("weird"), "status-neutral");
    }
}
