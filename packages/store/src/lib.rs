pub mod config;
pub mod fixtures;
pub mod library;
pub mod models;
pub mod source;

mod memory;
pub use memory::MockNewsletterSource;

pub use config::{inbox_address, ReaderSettings};
pub use library::{LibraryFilter, ReadingStatus, SavedNewsletter};
pub use models::{
    Newsletter, NewsletterFilters, NewsletterPage, NewsletterStatus, NewsletterUpdate,
};
pub use source::{FeedError, NewsletterSource, DEFAULT_PAGE_SIZE};
