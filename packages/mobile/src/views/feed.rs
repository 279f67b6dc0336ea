use dioxus::prelude::*;
use store::{NewsletterSource, DEFAULT_PAGE_SIZE};
use ui::{ErrorBanner, NewsletterList};

use super::use_source;
use crate::Route;

/// First page of the newsletter feed, with pull-to-refresh and retry.
#[component]
pub fn Feed() -> Element {
    let source = use_source();
    let nav = use_navigator();

    let mut feed = use_resource(move || {
        let source = source.clone();
        async move {
            let page = source.get_newsletters(1, DEFAULT_PAGE_SIZE, None).await;
            if let Err(e) = &page {
                tracing::error!("Error fetching newsletters: {}", e);
            }
            page
        }
    });

    let refreshing = !feed.finished();

    rsx! {
        h1 { class: "screen-title", "Feed" }
        {match &*feed.read_unchecked() {
            None => rsx! {
                div { class: "spinner" }
            },
            Some(Err(_)) => rsx! {
                ErrorBanner {
                    message: "Failed to load newsletters",
                    on_retry: move |_| feed.restart(),
                }
            },
            Some(Ok(page)) if page.items.is_empty() => rsx! {
                div { class: "empty-state", "No newsletters yet" }
            },
            Some(Ok(page)) => rsx! {
                NewsletterList {
                    newsletters: page.items.clone(),
                    refreshing,
                    on_refresh: move |_| feed.restart(),
                    on_select: move |id: String| {
                        nav.push(Route::NewsletterPreview { id });
                    },
                }
            },
        }}
    }
}
