//! Newsletter card, list and full preview.

use dioxus::prelude::*;
use store::Newsletter;

use crate::icons::{FaClock, FaXmark};
use crate::Icon;

/// One newsletter in a list: sender, date, subject, preview, tags and read time.
#[component]
pub fn NewsletterCard(newsletter: Newsletter, on_press: EventHandler<String>) -> Element {
    let id = newsletter.id.clone();
    let preview = newsletter.metadata.preview_text.clone().unwrap_or_default();

    rsx! {
        button {
            class: "newsletter-card",
            r#type: "button",
            onclick: move |_| on_press.call(id.clone()),
            div {
                class: "newsletter-card__header",
                span { class: "newsletter-card__sender", "{newsletter.sender.name}" }
                span { class: "newsletter-card__date", "{newsletter.received_label()}" }
            }
            h3 { class: "newsletter-card__subject", "{newsletter.subject}" }
            p { class: "newsletter-card__preview", "{preview}" }
            div {
                class: "newsletter-card__footer",
                div {
                    class: "newsletter-card__tags",
                    for tag in newsletter.tags.iter() {
                        span { key: "{tag}", class: "tag", "{tag}" }
                    }
                }
                if let Some(minutes) = newsletter.metadata.read_time {
                    span {
                        class: "newsletter-card__read-time",
                        Icon { icon: FaClock, width: 12, height: 12 }
                        " {minutes} min read"
                    }
                }
            }
        }
    }
}

/// Scrollable list of [`NewsletterCard`]s with an optional refresh control.
#[component]
pub fn NewsletterList(
    newsletters: Vec<Newsletter>,
    on_select: EventHandler<String>,
    #[props(default)] loading: bool,
    #[props(default)] refreshing: bool,
    on_refresh: Option<EventHandler<()>>,
) -> Element {
    rsx! {
        div {
            class: "newsletter-list",
            if let Some(on_refresh) = on_refresh {
                button {
                    class: "newsletter-list__refresh",
                    disabled: refreshing,
                    onclick: move |_| on_refresh.call(()),
                    if refreshing { "Refreshing..." } else { "Refresh" }
                }
            }
            for newsletter in newsletters {
                NewsletterCard {
                    key: "{newsletter.id}",
                    newsletter: newsletter.clone(),
                    on_press: on_select,
                }
            }
            if loading {
                div { class: "newsletter-list__footer spinner" }
            }
        }
    }
}

/// Full newsletter: header with subject, sender and date above the HTML body.
#[component]
pub fn NewsletterPreview(
    newsletter: Newsletter,
    on_close: EventHandler<()>,
    #[props(default = 16)] font_size: u8,
) -> Element {
    rsx! {
        div {
            class: "newsletter-preview",
            header {
                class: "newsletter-preview__header",
                div {
                    class: "newsletter-preview__title-row",
                    h1 { class: "newsletter-preview__subject", "{newsletter.subject}" }
                    button {
                        class: "icon-button",
                        title: "Close",
                        onclick: move |_| on_close.call(()),
                        Icon { icon: FaXmark, width: 20, height: 20 }
                    }
                }
                div {
                    class: "newsletter-preview__sender",
                    span { "{newsletter.sender.name}" }
                    span { class: "newsletter-preview__date", "{newsletter.received_label()}" }
                }
            }
            article {
                class: "newsletter-preview__body",
                style: "font-size: {font_size}px;",
                dangerous_inner_html: "{newsletter.content.html}",
            }
        }
    }
}
