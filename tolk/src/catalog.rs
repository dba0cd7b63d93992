//! Catalog loading and the opaque translations value.
//!
//! Catalog parsing is delegated to the [`gettext`] crate; this module only
//! decides *where* catalogs live and what happens when none exist. Lookups
//! never fail: a missing catalog degrades to the null value, which passes
//! every message through unchanged.

use std::fs::File;
use std::path::{Path, PathBuf};

use gettext::Catalog;
use log::debug;

use crate::error::Result;
use crate::locale::Locale;

/// Loaded translations for one `(locale, domain)` pair.
///
/// Holds one parsed catalog per directory that had a match, in configured
/// order; the first catalog that translates a message wins, so earlier
/// directories shadow later ones only for the keys they actually carry.
/// The empty value is the null catalog.
#[derive(Default)]
pub struct Translations {
    catalogs: Vec<Catalog>,
}

impl Translations {
    /// The null catalog: every lookup returns its input.
    pub fn null() -> Self {
        Self::default()
    }

    pub(crate) fn from_catalogs(catalogs: Vec<Catalog>) -> Self {
        Self { catalogs }
    }

    /// Whether no catalog backs this value.
    pub fn is_null(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Translate `message`, returning it unchanged when no catalog carries
    /// a translation.
    pub fn gettext<'a>(&'a self, message: &'a str) -> &'a str {
        for catalog in &self.catalogs {
            let translated = catalog.gettext(message);
            if translated != message {
                return translated;
            }
        }
        message
    }

    /// Translate with plural selection.
    ///
    /// The plural form is chosen by the catalog's own `Plural-Forms` rule.
    /// Without any catalog entry the germanic `num == 1` rule picks between
    /// the two source strings.
    pub fn ngettext<'a>(&'a self, singular: &'a str, plural: &'a str, num: u64) -> &'a str {
        for catalog in &self.catalogs {
            let translated = catalog.ngettext(singular, plural, num);
            if translated != singular && translated != plural {
                return translated;
            }
        }
        if num == 1 {
            singular
        } else {
            plural
        }
    }
}

/// Source of parsed catalogs.
///
/// The default implementation is [`MoLoader`]; tests inject wrappers to
/// count or fake loads.
pub trait CatalogLoader: Send + Sync + 'static {
    /// Load the `domain` catalog for `locale` from `dir`. `Ok(None)` when
    /// the directory carries no matching catalog; that is not an error.
    fn load(&self, dir: &Path, locale: &Locale, domain: &str) -> Result<Option<Catalog>>;

    /// Locales for which `dir` carries at least one catalog, regardless of
    /// domain, without loading any of them.
    fn available(&self, dir: &Path) -> Vec<Locale>;
}

/// Filesystem loader for gettext MO catalogs laid out as
/// `{dir}/{locale}/LC_MESSAGES/{domain}.mo`, falling back from the full
/// locale (`de_DE`) to the bare language (`de`).
#[derive(Debug, Default, Clone, Copy)]
pub struct MoLoader;

impl MoLoader {
    fn catalog_path(dir: &Path, locale: &Locale, domain: &str) -> Option<PathBuf> {
        for candidate in locale.candidates() {
            let path = dir
                .join(candidate)
                .join("LC_MESSAGES")
                .join(format!("{domain}.mo"));
            if path.is_file() {
                return Some(path);
            }
        }
        None
    }
}

impl CatalogLoader for MoLoader {
    fn load(&self, dir: &Path, locale: &Locale, domain: &str) -> Result<Option<Catalog>> {
        let Some(path) = Self::catalog_path(dir, locale, domain) else {
            debug!(
                "no {domain} catalog for {locale} under {}",
                dir.display()
            );
            return Ok(None);
        };
        let file = File::open(&path)?;
        let catalog = Catalog::parse(file)?;
        debug!("loaded catalog {}", path.display());
        Ok(Some(catalog))
    }

    fn available(&self, dir: &Path) -> Vec<Locale> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut locales = Vec::new();
        for entry in entries.flatten() {
            let messages_dir = entry.path().join("LC_MESSAGES");
            if !messages_dir.is_dir() {
                continue;
            }
            let has_catalog = std::fs::read_dir(&messages_dir)
                .map(|mut files| {
                    files.any(|file| {
                        file.ok()
                            .and_then(|f| f.file_name().into_string().ok())
                            .is_some_and(|name| name.ends_with(".mo"))
                    })
                })
                .unwrap_or(false);
            if !has_catalog {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            match name.parse::<Locale>() {
                Ok(locale) => locales.push(locale),
                Err(_) => debug!("skipping non-locale directory {name:?}"),
            }
        }
        locales.sort_by_key(Locale::to_string);
        locales
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_translations_pass_through() {
        let translations = Translations::null();
        assert!(translations.is_null());
        assert_eq!(translations.gettext("Hello"), "Hello");
        assert_eq!(translations.ngettext("Apple", "Apples", 1), "Apple");
        assert_eq!(translations.ngettext("Apple", "Apples", 3), "Apples");
        assert_eq!(translations.ngettext("Apple", "Apples", 0), "Apples");
    }

    #[test]
    fn missing_directory_scans_empty() {
        let loader = MoLoader;
        assert!(loader.available(Path::new("/nonexistent")).is_empty());
        let locale: Locale = "de".parse().unwrap();
        assert!(loader
            .load(Path::new("/nonexistent"), &locale, "messages")
            .unwrap()
            .is_none());
    }
}
