//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub const DIMLY_CSS: Asset = asset!("/assets/dimly.css");

mod auth;
pub use auth::{use_auth, use_session, AuthProvider, SessionHandle, SignOutButton};

mod error_banner;
pub use error_banner::ErrorBanner;

mod newsletter;
pub use newsletter::{NewsletterCard, NewsletterList, NewsletterPreview};

pub mod settings;
pub use settings::{load_settings, save_settings, use_reader_settings, SettingsSignal};
