//! Reusable form input components.

use dioxus::prelude::*;

use crate::app::format::{format_brl, parse_brl};

/// A labeled money input. The raw text stays with the caller; a live
/// preview shows what the input parses to, or that it does not parse.
#[component]
pub fn MoneyInput(
    /// Input label
    label: &'static str,
    /// Raw text as typed
    value: String,
    /// Whether the control accepts input
    #[props(default = false)]
    disabled: bool,
    /// Called with the new raw text on every keystroke
    on_change: EventHandler<String>,
) -> Element {
    let preview = if value.trim().is_empty() {
        None
    } else {
        Some(match parse_brl(&value) {
            Some(cents) => format!("= {}", format_brl(cents)),
            None => "not a valid amount".to_string(),
        })
    };

    rsx! {
        label { "{label}"
            input {
                r#type: "text",
                inputmode: "decimal",
                placeholder: "0,00",
                value: "{value}",
                disabled: disabled,
                oninput: move |e| on_change.call(e.value()),
            }
            if let Some(preview) = preview {
                small { class: "text-muted", "{preview}" }
            }
        }
    }
}

/// A labeled toggle switch with description.
#[component]
pub fn ToggleInput(
    /// Input label
    label: &'static str,
    /// Description text shown below label
    description: &'static str,
    /// Current checked state
    checked: bool,
    /// Whether the control accepts input
    #[props(default = false)]
    disabled: bool,
    /// Called when the toggle changes
    on_change: EventHandler<bool>,
) -> Element {
    rsx! {
        div { class: "toggle-row",
            div {
                label { "{label}" }
                p { class: "text-muted", "{description}" }
            }
            input {
                r#type: "checkbox",
                role: "switch",
                checked: checked,
                disabled: disabled,
                onchange: move |e| on_change.call(e.checked()),
            }
        }
    }
}
