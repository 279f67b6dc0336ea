//! # Newsletter source: the data-source seam for the Feed and Library
//!
//! Every screen that shows newsletters reads through the [`NewsletterSource`] trait,
//! so the same views work against the static fixtures ([`crate::MockNewsletterSource`])
//! or a remote feed API.
//!
//! ## Pagination
//!
//! Pages are 1-based. [`paginate`] slices an already filtered list and computes the
//! `next_token` (the next page number as a string) when more items remain. A page of
//! zero or a page size of zero is rejected with [`FeedError::InvalidPage`].

use thiserror::Error;

use crate::library::SavedNewsletter;
use crate::models::{Newsletter, NewsletterFilters, NewsletterPage, NewsletterUpdate};

/// Default page size used by the feed screen.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("Newsletter not found")]
    NotFound(String),
    #[error("Invalid page {page} with page size {page_size}")]
    InvalidPage { page: usize, page_size: usize },
}

/// Async interface to a newsletter feed.
pub trait NewsletterSource {
    fn get_newsletters(
        &self,
        page: usize,
        page_size: usize,
        filters: Option<&NewsletterFilters>,
    ) -> impl std::future::Future<Output = Result<NewsletterPage, FeedError>>;
    fn get_newsletter(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Newsletter>, FeedError>>;
    fn update_newsletter(
        &self,
        id: &str,
        update: &NewsletterUpdate,
    ) -> impl std::future::Future<Output = Result<Newsletter, FeedError>>;
    fn get_tags(&self) -> impl std::future::Future<Output = Result<Vec<String>, FeedError>>;
    fn saved_newsletters(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SavedNewsletter>, FeedError>>;
}

/// Slice one page out of `items`.
pub fn paginate(
    items: Vec<Newsletter>,
    page: usize,
    page_size: usize,
) -> Result<NewsletterPage, FeedError> {
    if page == 0 || page_size == 0 {
        return Err(FeedError::InvalidPage { page, page_size });
    }

    let total = items.len();
    let start = (page - 1).saturating_mul(page_size);
    let end = start.saturating_add(page_size);

    let items = items
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect::<Vec<_>>();

    Ok(NewsletterPage {
        items,
        total,
        next_token: (end < total).then(|| (page + 1).to_string()),
    })
}

/// Distinct tags in first-seen order.
pub fn collect_tags<'a>(newsletters: impl IntoIterator<Item = &'a Newsletter>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for newsletter in newsletters {
        for tag in &newsletter.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_paginate_pages_and_tokens() {
        let all = fixtures::newsletters();

        let first = paginate(all.clone(), 1, 2).unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total, 3);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let second = paginate(all.clone(), 2, 2).unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].id, "3");
        assert!(second.next_token.is_none());

        let beyond = paginate(all, 5, 2).unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 3);
        assert!(beyond.next_token.is_none());
    }

    #[test]
    fn test_paginate_rejects_zero() {
        assert_eq!(
            paginate(fixtures::newsletters(), 0, 10),
            Err(FeedError::InvalidPage { page: 0, page_size: 10 })
        );
        assert!(paginate(fixtures::newsletters(), 1, 0).is_err());
    }

    #[test]
    fn test_collect_tags_dedupes_in_order() {
        let mut all = fixtures::newsletters();
        all[1].tags.push("ai".to_string());
        assert_eq!(
            collect_tags(&all),
            vec!["tech", "ai", "design", "inspiration", "startup", "business"]
        );
    }
}
