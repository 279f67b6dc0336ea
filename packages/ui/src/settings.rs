//! Reader settings persisted next to the app's other config.
//!
//! Stored as [`store::ReaderSettings`] TOML at `<config_dir>/dimly/settings.toml`.
//! A missing file means defaults; a file that cannot be read or parsed is logged and
//! replaced by defaults so the Settings tab always opens.

use std::path::{Path, PathBuf};

use dioxus::prelude::*;
use store::ReaderSettings;
use thiserror::Error;

/// Reader settings shared between the Settings tab and the preview screen.
pub type SettingsSignal = Signal<ReaderSettings>;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// `<config_dir>/dimly/settings.toml`, or a relative path if the platform has none.
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dimly")
        .join(ReaderSettings::filename())
}

pub fn load_settings_from(path: &Path) -> ReaderSettings {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ReaderSettings::default(),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            return ReaderSettings::default();
        }
    };
    ReaderSettings::from_toml(&text).unwrap_or_else(|e| {
        tracing::warn!("Ignoring invalid settings in {}: {}", path.display(), e);
        ReaderSettings::default()
    })
}

pub fn save_settings_to(path: &Path, settings: &ReaderSettings) -> Result<(), SettingsError> {
    let io_error = |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, settings.to_toml()?).map_err(io_error)
}

pub fn load_settings() -> ReaderSettings {
    load_settings_from(&settings_path())
}

pub fn save_settings(settings: &ReaderSettings) -> Result<(), SettingsError> {
    save_settings_to(&settings_path(), settings)
}

pub fn use_reader_settings() -> SettingsSignal {
    use_context::<SettingsSignal>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("settings.toml"));
        assert_eq!(settings, ReaderSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dimly").join("settings.toml");
        let settings = ReaderSettings::default()
            .with_font_size(20)
            .with_push_enabled(false);

        save_settings_to(&path, &settings).unwrap();

        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[reader\nfont_size = ").unwrap();

        assert_eq!(load_settings_from(&path), ReaderSettings::default());
    }
}
