//! Configuration consumed from the host application's config store.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Separator for the `translation_directories` list.
pub const DIRECTORY_SEPARATOR: char = ';';

/// Configuration for one [`Tolk`](crate::Tolk) instance.
///
/// All fields have defaults, so a config store only needs to carry the keys
/// it wants to change. Values are read lazily: identifiers are validated
/// when a request first resolves them, not when the struct is built.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TolkConfig {
    /// Locale used when no selector is registered or the selector returns
    /// nothing.
    pub default_locale: String,
    /// Timezone used when no selector is registered or the selector returns
    /// nothing.
    pub default_timezone: String,
    /// `;`-separated list of catalog directories. Each entry is resolved
    /// against `root_path` unless it is absolute.
    pub translation_directories: String,
    /// Name of the domain backing the free translation functions.
    pub default_domain: String,
    /// Application root that relative directory entries are resolved
    /// against.
    pub root_path: PathBuf,
}

impl Default for TolkConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".into(),
            default_timezone: "UTC".into(),
            translation_directories: "translations".into(),
            default_domain: "messages".into(),
            root_path: PathBuf::from("."),
        }
    }
}

impl TolkConfig {
    /// The resolved translation directories, in configured order. Empty
    /// entries are skipped.
    pub fn directories(&self) -> Vec<PathBuf> {
        self.translation_directories
            .split(DIRECTORY_SEPARATOR)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let path = Path::new(entry);
                if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    self.root_path.join(path)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_resolve_against_root() {
        let config = TolkConfig {
            translation_directories: "translations;renamed_translations".into(),
            root_path: PathBuf::from("/srv/app"),
            ..TolkConfig::default()
        };
        assert_eq!(
            config.directories(),
            vec![
                PathBuf::from("/srv/app/translations"),
                PathBuf::from("/srv/app/renamed_translations"),
            ]
        );
    }

    #[test]
    fn absolute_entries_pass_through() {
        let config = TolkConfig {
            translation_directories: "/opt/i18n; ".into(),
            ..TolkConfig::default()
        };
        assert_eq!(config.directories(), vec![PathBuf::from("/opt/i18n")]);
    }

    #[test]
    fn deserializes_with_partial_keys() {
        let config: TolkConfig =
            serde_json::from_str(r#"{"default_locale": "de_DE"}"#).unwrap();
        assert_eq!(config.default_locale, "de_DE");
        assert_eq!(config.default_domain, "messages");
    }
}
