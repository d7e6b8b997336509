//! Modal dialog using the Pico CSS dialog pattern.

use dioxus::prelude::*;

#[component]
pub fn Modal(
    /// Dialog heading
    title: String,
    /// Called when the close button or backdrop is clicked
    on_close: EventHandler<()>,
    children: Element,
) -> Element {
    rsx! {
        dialog { open: true,
            article {
                header {
                    button {
                        "aria-label": "Close",
                        "rel": "prev",
                        onclick: move |_| on_close.call(()),
                    }
                    strong { "{title}" }
                }
                {children}
            }
        }
    }
}
