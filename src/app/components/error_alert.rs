//! Dismissable error alert component.

use dioxus::prelude::*;

/// A dismissable alert showing a request failure.
#[component]
pub fn ErrorAlert(
    /// The error message to display
    message: String,
    /// Called when the dismiss button is clicked
    on_dismiss: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "alert status-err", role: "alert",
            span { "{message}" }
            button {
                class: "alert-dismiss",
                "aria-label": "Dismiss",
                onclick: move |_| on_dismiss.call(()),
                "×"
            }
        }
    }
}
