//! Saved newsletters and reading progress for the Library tab.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Newsletter;

/// A newsletter the reader explicitly saved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedNewsletter {
    #[serde(flatten)]
    pub newsletter: Newsletter,
    pub saved_at: DateTime<Utc>,
    /// Percentage of the body already read, 0..=100
    #[serde(default)]
    pub last_read_position: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SavedNewsletter {
    pub fn reading_status(&self) -> ReadingStatus {
        ReadingStatus::from_position(self.last_read_position)
    }

    /// Progress clamped to a percentage, for the progress bar width.
    pub fn progress_percent(&self) -> u8 {
        self.last_read_position.min(100)
    }

    /// Badge text: the status name, or "45% Read" while in progress.
    pub fn progress_label(&self) -> String {
        match self.reading_status() {
            ReadingStatus::InProgress => format!("{}% Read", self.progress_percent()),
            status => status.label().to_string(),
        }
    }

    /// e.g. "Saved Jan 6, 2024".
    pub fn saved_label(&self) -> String {
        format!("Saved {}", self.saved_at.format("%b %-d, %Y"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl ReadingStatus {
    pub fn from_position(position: u8) -> Self {
        match position {
            0 => ReadingStatus::NotStarted,
            1..=99 => ReadingStatus::InProgress,
            _ => ReadingStatus::Completed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReadingStatus::NotStarted => "Not Started",
            ReadingStatus::InProgress => "In Progress",
            ReadingStatus::Completed => "Completed",
        }
    }
}

/// Filter chips shown above the library list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LibraryFilter {
    #[default]
    All,
    Status(ReadingStatus),
}

impl LibraryFilter {
    pub const ALL: [LibraryFilter; 4] = [
        LibraryFilter::All,
        LibraryFilter::Status(ReadingStatus::NotStarted),
        LibraryFilter::Status(ReadingStatus::InProgress),
        LibraryFilter::Status(ReadingStatus::Completed),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LibraryFilter::All => "All",
            LibraryFilter::Status(status) => status.label(),
        }
    }

    pub fn matches(&self, saved: &SavedNewsletter) -> bool {
        match self {
            LibraryFilter::All => true,
            LibraryFilter::Status(status) => saved.reading_status() == *status,
        }
    }

    /// Saved newsletters passing this filter, in their original order.
    pub fn apply<'a>(&self, saved: &'a [SavedNewsletter]) -> Vec<&'a SavedNewsletter> {
        saved.iter().filter(|s| self.matches(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_reading_status_thresholds() {
        assert_eq!(ReadingStatus::from_position(0), ReadingStatus::NotStarted);
        assert_eq!(ReadingStatus::from_position(1), ReadingStatus::InProgress);
        assert_eq!(ReadingStatus::from_position(99), ReadingStatus::InProgress);
        assert_eq!(ReadingStatus::from_position(100), ReadingStatus::Completed);
        assert_eq!(ReadingStatus::from_position(250), ReadingStatus::Completed);
    }

    #[test]
    fn test_library_filter() {
        let saved = fixtures::saved_newsletters();
        assert_eq!(LibraryFilter::All.apply(&saved).len(), saved.len());

        let in_progress = LibraryFilter::Status(ReadingStatus::InProgress).apply(&saved);
        assert!(!in_progress.is_empty());
        assert!(in_progress
            .iter()
            .all(|s| s.reading_status() == ReadingStatus::InProgress));

        let counted: usize = LibraryFilter::ALL[1..]
            .iter()
            .map(|f| f.apply(&saved).len())
            .sum();
        assert_eq!(counted, saved.len());
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut saved = fixtures::saved_newsletters().remove(0);
        saved.last_read_position = 180;
        assert_eq!(saved.progress_percent(), 100);
        assert_eq!(saved.progress_label(), "Completed");
    }

    #[test]
    fn test_badge_and_saved_labels() {
        let saved = fixtures::saved_newsletters();
        let labels: Vec<String> = saved.iter().map(|s| s.progress_label()).collect();
        assert_eq!(labels, ["Not Started", "45% Read", "Completed"]);
        assert_eq!(saved[0].saved_label(), "Saved Jan 6, 2024");
    }
}
