use dioxus::prelude::*;

use crate::icons::{FaRotateRight, FaTriangleExclamation};
use crate::Icon;

/// Inline error message, with a retry button when `on_retry` is set.
#[component]
pub fn ErrorBanner(message: String, on_retry: Option<EventHandler<()>>) -> Element {
    if message.is_empty() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "error-banner",
            role: "alert",
            Icon { icon: FaTriangleExclamation, width: 14, height: 14 }
            span { class: "error-banner__message", "{message}" }
            if let Some(on_retry) = on_retry {
                button {
                    class: "error-banner__retry",
                    onclick: move |_| on_retry.call(()),
                    Icon { icon: FaRotateRight, width: 12, height: 12 }
                    " Retry"
                }
            }
        }
    }
}
