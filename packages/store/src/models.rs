//! # Domain models for newsletters
//!
//! Defines the data structures returned by a [`crate::NewsletterSource`] when listing,
//! reading or updating newsletters. These types are `Serialize + Deserialize` so the
//! same shapes can come from the mock fixtures today and a remote feed API later.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Newsletter`] | A single received newsletter: sender, subject, HTML and plain-text bodies, read status, tags and reading metadata. |
//! | [`NewsletterFilters`] | Optional narrowing applied by [`crate::NewsletterSource::get_newsletters`]. |
//! | [`NewsletterUpdate`] | Partial update accepted by [`crate::NewsletterSource::update_newsletter`]. |
//! | [`NewsletterPage`] | One page of results plus the total match count and the token of the next page. |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read state of a newsletter in the feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsletterStatus {
    #[default]
    Unread,
    Read,
    Archived,
}

impl NewsletterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsletterStatus::Unread => "unread",
            NewsletterStatus::Read => "read",
            NewsletterStatus::Archived => "archived",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub name: String,
    pub email: String,
}

/// Both renditions of the body. The HTML is shown in the preview, the text is searched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterContent {
    pub html: String,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterMetadata {
    /// Estimated reading time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_text: Option<String>,
}

/// A newsletter as delivered to the reader's inbox.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Newsletter {
    pub id: String,
    pub subject: String,
    pub sender: Sender,
    pub received_at: DateTime<Utc>,
    pub content: NewsletterContent,
    pub status: NewsletterStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: NewsletterMetadata,
}

impl Newsletter {
    /// Date shown on cards, e.g. "Jan 5, 2024".
    pub fn received_label(&self) -> String {
        self.received_at.format("%b %-d, %Y").to_string()
    }

    /// Whether this newsletter passes every filter that is set.
    pub fn matches(&self, filters: &NewsletterFilters) -> bool {
        if let Some(status) = filters.status {
            if self.status != status {
                return false;
            }
        }

        if let Some(tags) = filters.tags.as_ref().filter(|t| !t.is_empty()) {
            if !self.tags.iter().any(|tag| tags.contains(tag)) {
                return false;
            }
        }

        if let Some(range) = &filters.date_range {
            if !range.contains(&self.received_at) {
                return false;
            }
        }

        if let Some(query) = filters.search_query.as_deref().filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            if !self.subject.to_lowercase().contains(&query)
                && !self.content.text.to_lowercase().contains(&query)
            {
                return false;
            }
        }

        true
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, update: &NewsletterUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(tags) = &update.tags {
            self.tags = tags.clone();
        }
    }
}

/// Inclusive range over `received_at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        *at >= self.start && *at <= self.end
    }
}

/// Filters for listing newsletters. Unset fields do not narrow the result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterFilters {
    pub status: Option<NewsletterStatus>,
    /// Matches when the newsletter carries at least one of these tags
    pub tags: Option<Vec<String>>,
    pub date_range: Option<DateRange>,
    /// Case-insensitive match against subject and plain-text body
    pub search_query: Option<String>,
}

impl NewsletterFilters {
    pub fn with_status(mut self, status: NewsletterStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn with_date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.date_range = Some(DateRange { start, end });
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterUpdate {
    pub status: Option<NewsletterStatus>,
    pub tags: Option<Vec<String>>,
}

/// One page of newsletters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterPage {
    pub items: Vec<Newsletter>,
    /// Number of newsletters matching the filters, across all pages
    pub total: usize,
    /// Token for the following page, `None` on the last page
    pub next_token: Option<String>,
}
