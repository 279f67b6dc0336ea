use std::sync::{Arc, Mutex, PoisonError};

use crate::fixtures;
use crate::library::SavedNewsletter;
use crate::models::{Newsletter, NewsletterFilters, NewsletterPage, NewsletterUpdate};
use crate::source::{collect_tags, paginate, FeedError, NewsletterSource};

/// In-memory NewsletterSource backed by the static fixtures.
/// Updates are kept for the lifetime of the source.
#[derive(Clone, Debug)]
pub struct MockNewsletterSource {
    newsletters: Arc<Mutex<Vec<Newsletter>>>,
    saved: Arc<Mutex<Vec<SavedNewsletter>>>,
}

impl Default for MockNewsletterSource {
    fn default() -> Self {
        Self::with_newsletters(fixtures::newsletters(), fixtures::saved_newsletters())
    }
}

impl MockNewsletterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_newsletters(newsletters: Vec<Newsletter>, saved: Vec<SavedNewsletter>) -> Self {
        Self {
            newsletters: Arc::new(Mutex::new(newsletters)),
            saved: Arc::new(Mutex::new(saved)),
        }
    }

    fn snapshot(&self) -> Vec<Newsletter> {
        self.newsletters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NewsletterSource for MockNewsletterSource {
    async fn get_newsletters(
        &self,
        page: usize,
        page_size: usize,
        filters: Option<&NewsletterFilters>,
    ) -> Result<NewsletterPage, FeedError> {
        let mut items = self.snapshot();
        if let Some(filters) = filters {
            items.retain(|n| n.matches(filters));
        }
        tracing::debug!(page, page_size, matched = items.len(), "listing newsletters");
        paginate(items, page, page_size)
    }

    async fn get_newsletter(&self, id: &str) -> Result<Option<Newsletter>, FeedError> {
        Ok(self.snapshot().into_iter().find(|n| n.id == id))
    }

    async fn update_newsletter(
        &self,
        id: &str,
        update: &NewsletterUpdate,
    ) -> Result<Newsletter, FeedError> {
        let mut newsletters = self
            .newsletters
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let newsletter = newsletters
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| FeedError::NotFound(id.to_string()))?;
        newsletter.apply(update);
        let updated = newsletter.clone();
        drop(newsletters);

        // Keep the library copy in step with the feed.
        let mut saved = self.saved.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = saved.iter_mut().find(|s| s.newsletter.id == id) {
            entry.newsletter = updated.clone();
        }

        Ok(updated)
    }

    async fn get_tags(&self) -> Result<Vec<String>, FeedError> {
        Ok(collect_tags(&self.snapshot()))
    }

    async fn saved_newsletters(&self) -> Result<Vec<SavedNewsletter>, FeedError> {
        Ok(self
            .saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsletterStatus;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_first_page_of_feed() {
        let source = MockNewsletterSource::new();

        let page = source.get_newsletters(1, 10, None).await.unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total, 3);
        assert!(page.next_token.is_none());
        assert_eq!(page.items[0].subject, "The Future of AI: Weekly Insights");
    }

    #[tokio::test]
    async fn test_filter_by_status_and_tags() {
        let source = MockNewsletterSource::new();

        let filters = NewsletterFilters::default().with_status(NewsletterStatus::Read);
        let page = source.get_newsletters(1, 10, Some(&filters)).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, "2");

        let filters = NewsletterFilters::default()
            .with_tags(vec!["ai".to_string(), "business".to_string()]);
        let page = source.get_newsletters(1, 10, Some(&filters)).await.unwrap();
        let ids: Vec<_> = page.items.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        // An empty tag list does not narrow anything
        let filters = NewsletterFilters::default().with_tags(Vec::new());
        let page = source.get_newsletters(1, 10, Some(&filters)).await.unwrap();
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let source = MockNewsletterSource::new();

        let filters = NewsletterFilters::default().with_search("DESIGN");
        let page = source.get_newsletters(1, 10, Some(&filters)).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, "2");

        // Matches the plain-text body, not only the subject
        let filters = NewsletterFilters::default().with_search("valuations");
        let page = source.get_newsletters(1, 10, Some(&filters)).await.unwrap();
        assert_eq!(page.items[0].id, "3");
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive() {
        let source = MockNewsletterSource::new();
        let start = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap();

        let filters = NewsletterFilters::default().with_date_range(start, end);
        let page = source.get_newsletters(1, 10, Some(&filters)).await.unwrap();
        let ids: Vec<_> = page.items.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_get_newsletter() {
        let source = MockNewsletterSource::new();

        let found = source.get_newsletter("3").await.unwrap().unwrap();
        assert_eq!(found.sender.name, "Startup Digest");
        assert!(source.get_newsletter("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_newsletter_persists() {
        let source = MockNewsletterSource::new();

        let update = NewsletterUpdate {
            status: Some(NewsletterStatus::Read),
            tags: None,
        };
        let updated = source.update_newsletter("1", &update).await.unwrap();
        assert_eq!(updated.status, NewsletterStatus::Read);
        assert_eq!(updated.tags, vec!["tech", "ai"]);

        let reloaded = source.get_newsletter("1").await.unwrap().unwrap();
        assert_eq!(reloaded.status, NewsletterStatus::Read);

        let saved = source.saved_newsletters().await.unwrap();
        assert_eq!(saved[0].newsletter.status, NewsletterStatus::Read);
    }

    #[tokio::test]
    async fn test_update_unknown_newsletter() {
        let source = MockNewsletterSource::new();

        let err = source
            .update_newsletter("nope", &NewsletterUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err, FeedError::NotFound("nope".to_string()));
        assert_eq!(err.to_string(), "Newsletter not found");
    }

    #[tokio::test]
    async fn test_get_tags() {
        let source = MockNewsletterSource::new();

        let tags = source.get_tags().await.unwrap();
        assert_eq!(
            tags,
            vec!["tech", "ai", "design", "inspiration", "startup", "business"]
        );
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let source = MockNewsletterSource::new();
        let other = source.clone();

        let update = NewsletterUpdate {
            status: None,
            tags: Some(vec!["favorite".to_string()]),
        };
        source.update_newsletter("2", &update).await.unwrap();

        assert!(other.get_tags().await.unwrap().contains(&"favorite".to_string()));
    }
}
