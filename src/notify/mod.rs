//! Notification payload model shared with the service worker.
//!
//! Push payloads arrive as JSON (`title`, `body`, `icon`, `kind`,
//! `reference`) with a plain-text fallback. The click routing table here
//! is the authoritative copy; `public/sw.js` mirrors it in JavaScript and
//! a contract test keeps the two from drifting. The in-app toast layer
//! reuses the same payload type for events noticed while a tab is open.

use serde::{Deserialize, Serialize};

use crate::api::Transfer;

/// Notification title when a payload carries none.
pub const DEFAULT_TITLE: &str = "PIX Console";

/// Action id the service worker assigns to the dismiss button.
pub const DISMISS_ACTION: &str = "dismiss";

/// Classification tag carried in the push payload, used to route clicks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotificationKind {
    PaymentReceived,
    TransferReceived,
    WithdrawalUpdated,
    TicketReply,
    #[default]
    Generic,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::PaymentReceived => "payment_received",
            NotificationKind::TransferReceived => "transfer_received",
            NotificationKind::WithdrawalUpdated => "withdrawal_updated",
            NotificationKind::TicketReply => "ticket_reply",
            NotificationKind::Generic => "generic",
        }
    }

    /// Unknown tags fall back to [`NotificationKind::Generic`] so old
    /// service workers survive new event types.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "payment_received" => NotificationKind::PaymentReceived,
            "transfer_received" => NotificationKind::TransferReceived,
            "withdrawal_updated" => NotificationKind::WithdrawalUpdated,
            "ticket_reply" => NotificationKind::TicketReply,
            _ => NotificationKind::Generic,
        }
    }

    /// In-app route a notification click should land on.
    pub fn click_route(&self) -> &'static str {
        match self {
            NotificationKind::PaymentReceived => "/transactions",
            NotificationKind::TransferReceived => "/transfers",
            NotificationKind::WithdrawalUpdated => "/withdrawals",
            NotificationKind::TicketReply => "/tickets",
            NotificationKind::Generic => "/",
        }
    }
}

impl serde::Serialize for NotificationKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for NotificationKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(NotificationKind::parse(&tag))
    }
}

/// A displayable notification, whether delivered by push or raised by an
/// in-tab watcher.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub reference: Option<String>,
}

impl NotificationPayload {
    /// Toast raised when the transfer watcher spots an incoming transfer.
    pub fn transfer_received(transfer: &Transfer) -> Self {
        let who = if transfer.counterparty.is_empty() {
            "someone"
        } else {
            transfer.counterparty.as_str()
        };
        Self {
            title: "Transfer received".to_string(),
            body: format!(
                "{} sent you {}",
                who,
                crate::app::format::format_brl(transfer.amount_cents)
            ),
            icon: None,
            kind: NotificationKind::TransferReceived,
            reference: Some(transfer.id.clone()),
        }
    }
}

/// What a notification click does, given the action button (if any) and
/// the payload's classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickAction {
    Dismiss,
    Focus(&'static str),
}

pub fn click_action(action: &str, kind: NotificationKind) -> ClickAction {
    if action == DISMISS_ACTION {
        ClickAction::Dismiss
    } else {
        ClickAction::Focus(kind.click_route())
    }
}

/// Decode a raw push payload. Anything that is not a JSON object becomes a
/// generic text notification so malformed pushes still render.
pub fn parse_push_payload(raw: &str) -> NotificationPayload {
    match serde_json::from_str::<NotificationPayload>(raw) {
        Ok(mut payload) => {
            if payload.title.is_empty() {
                payload.title = DEFAULT_TITLE.to_string();
            }
            payload
        }
        Err(_) => NotificationPayload {
            title: DEFAULT_TITLE.to_string(),
            body: raw.to_string(),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_payloads() {
        let payload = parse_push_payload(
            r#"{"title":"Payment received","body":"R$ 12,00","kind":"payment_received","reference":"tx_9"}"#,
        );
        assert_eq!(payload.title, "Payment received");
        assert_eq!(payload.kind, NotificationKind::PaymentReceived);
        assert_eq!(payload.reference.as_deref(), Some("tx_9"));
    }

    #[test]
    fn plain_text_becomes_generic_body() {
        let payload = parse_push_payload("maintenance window tonight");
        assert_eq!(payload.title, DEFAULT_TITLE);
        assert_eq!(payload.body, "maintenance window tonight");
        assert_eq!(payload.kind, NotificationKind::Generic);
    }

    #[test]
    fn unknown_kind_tags_are_generic() {
        let payload = parse_push_payload(r#"{"title":"x","body":"y","kind":"audit_event"}"#);
        assert_eq!(payload.kind, NotificationKind::Generic);
    }

    #[test]
    fn clicks_route_by_kind() {
        assert_eq!(
            click_action("open", NotificationKind::TransferReceived),
            ClickAction::Focus("/transfers")
        );
        assert_eq!(
            click_action("", NotificationKind::PaymentReceived),
            ClickAction::Focus("/transactions")
        );
        assert_eq!(
            click_action(DISMISS_ACTION, NotificationKind::TransferReceived),
            ClickAction::Dismiss
        );
        assert_eq!(
            click_action("", NotificationKind::Generic),
            ClickAction::Focus("/")
        );
    }
}
