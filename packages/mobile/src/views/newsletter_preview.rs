use dioxus::prelude::*;
use store::{
    FeedError, MockNewsletterSource, Newsletter, NewsletterSource, NewsletterStatus,
    NewsletterUpdate,
};
use ui::{use_reader_settings, ErrorBanner, NewsletterPreview as PreviewPanel};

use super::use_source;

/// Full-screen newsletter reader. Opening an unread newsletter marks it read.
#[component]
pub fn NewsletterPreview(id: String) -> Element {
    let mut id_signal = use_signal(|| id.clone());
    if *id_signal.peek() != id {
        id_signal.set(id.clone());
    }

    let source = use_source();
    let settings = use_reader_settings();
    let nav = use_navigator();

    let newsletter = use_resource(move || {
        let source = source.clone();
        let id = id_signal();
        async move { open_newsletter(&source, &id).await }
    });

    match &*newsletter.read_unchecked() {
        None => rsx! {
            div { class: "loading-screen", div { class: "spinner" } }
        },
        Some(Ok(newsletter)) => rsx! {
            PreviewPanel {
                newsletter: newsletter.clone(),
                font_size: settings().reader.font_size,
                on_close: move |_| nav.go_back(),
            }
        },
        Some(Err(e)) => rsx! {
            div {
                class: "auth-screen",
                ErrorBanner { message: e.to_string() }
                button { class: "link-button", onclick: move |_| nav.go_back(), "Back" }
            }
        },
    }
}

async fn open_newsletter(
    source: &MockNewsletterSource,
    id: &str,
) -> Result<Newsletter, FeedError> {
    let newsletter = source
        .get_newsletter(id)
        .await?
        .ok_or_else(|| FeedError::NotFound(id.to_string()))?;

    if newsletter.status != NewsletterStatus::Unread {
        return Ok(newsletter);
    }
    let update = NewsletterUpdate {
        status: Some(NewsletterStatus::Read),
        ..Default::default()
    };
    match source.update_newsletter(id, &update).await {
        Ok(updated) => Ok(updated),
        Err(e) => {
            tracing::warn!("Failed to mark {} as read: {}", id, e);
            Ok(newsletter)
        }
    }
}
