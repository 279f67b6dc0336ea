//! # Reader settings: `settings.toml`
//!
//! Preferences edited on the Settings tab and persisted by the mobile app as a small
//! TOML file (filename: [`ReaderSettings::filename`] = `"settings.toml"`).
//!
//! ## Structure
//!
//! ```toml
//! [reader]
//! font_size = 16          # 12..=24
//!
//! [notifications]
//! push_enabled = true
//! ```
//!
//! All structs derive or implement `Default` so that a missing or empty file is
//! equivalent to the default configuration. Out-of-range font sizes are clamped on
//! load rather than rejected.

use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE: u8 = 12;
pub const MAX_FONT_SIZE: u8 = 24;

/// Domain that receives newsletters on the reader's behalf.
pub const INBOX_DOMAIN: &str = "read.yopa.page";

/// Top-level settings stored in `settings.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReaderSettings {
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Body font size in points.
    #[serde(default = "default_font_size")]
    pub font_size: u8,
}

fn default_font_size() -> u8 {
    16
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_push_enabled")]
    pub push_enabled: bool,
}

fn default_push_enabled() -> bool {
    true
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            push_enabled: default_push_enabled(),
        }
    }
}

impl ReaderSettings {
    /// Builder method to set the font size, clamped to the supported range.
    pub fn with_font_size(mut self, size: u8) -> Self {
        self.reader.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self
    }

    pub fn with_push_enabled(mut self, enabled: bool) -> Self {
        self.notifications.push_enabled = enabled;
        self
    }

    /// The well-known filename for the settings file.
    pub fn filename() -> &'static str {
        "settings.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        let settings: Self = toml::from_str(s)?;
        let size = settings.reader.font_size;
        Ok(settings.with_font_size(size))
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Address newsletters should be sent to for this reader.
pub fn inbox_address(username: &str) -> String {
    format!("{username}@{INBOX_DOMAIN}")
}
