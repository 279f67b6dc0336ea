use dioxus::prelude::*;
use store::{LibraryFilter, NewsletterSource};
use ui::ErrorBanner;

use super::use_source;
use crate::Route;

/// Saved newsletters with reading progress, filterable by reading status.
#[component]
pub fn Library() -> Element {
    let source = use_source();
    let nav = use_navigator();
    let mut filter = use_signal(LibraryFilter::default);

    let mut saved = use_resource(move || {
        let source = source.clone();
        async move {
            let saved = source.saved_newsletters().await;
            if let Err(e) = &saved {
                tracing::error!("Error fetching saved newsletters: {}", e);
            }
            saved
        }
    });

    rsx! {
        h1 { class: "screen-title", "Library" }

        div {
            class: "chips",
            for option in LibraryFilter::ALL {
                button {
                    key: "{option.label()}",
                    class: if filter() == option { "chip active" } else { "chip" },
                    onclick: move |_| filter.set(option),
                    "{option.label()}"
                }
            }
        }

        {match &*saved.read_unchecked() {
            None => rsx! {
                div { class: "spinner" }
            },
            Some(Err(_)) => rsx! {
                ErrorBanner {
                    message: "Failed to load saved newsletters",
                    on_retry: move |_| saved.restart(),
                }
            },
            Some(Ok(items)) => {
                let visible = filter().apply(items);
                if visible.is_empty() {
                    rsx! {
                        div { class: "empty-state", "No saved newsletters" }
                    }
                } else {
                    rsx! {
                        for item in visible {
                            div {
                                key: "{item.newsletter.id}",
                                class: "saved-item newsletter-card",
                                onclick: {
                                    let id = item.newsletter.id.clone();
                                    move |_| {
                                        nav.push(Route::NewsletterPreview { id: id.clone() });
                                    }
                                },
                                div {
                                    class: "progress",
                                    div {
                                        class: "progress__bar",
                                        style: "width: {item.progress_percent()}%;",
                                    }
                                }
                                div {
                                    class: "newsletter-card__header",
                                    h3 { class: "newsletter-card__subject", "{item.newsletter.subject}" }
                                    span { class: "newsletter-card__date", "{item.saved_label()}" }
                                }
                                div {
                                    class: "newsletter-card__header",
                                    span { class: "tag", "{item.progress_label()}" }
                                    if let Some(minutes) = item.newsletter.metadata.read_time {
                                        span { class: "newsletter-card__read-time", "{minutes} min read" }
                                    }
                                }
                                if let Some(notes) = &item.notes {
                                    p { class: "newsletter-card__preview", "Notes: {notes}" }
                                }
                                div {
                                    class: "newsletter-card__tags",
                                    for tag in item.newsletter.tags.iter() {
                                        span { key: "{tag}", class: "tag", "{tag}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }}
    }
}
