//! Shared fixtures for the tolk test suite.
//!
//! Provides a programmatic MO-catalog writer (so fixtures need no
//! `msgfmt` at build time) and the standard German fixture tree the
//! integration tests run against.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tolk::TolkConfig;

/// A gettext MO catalog under construction.
///
/// Entries are written in sorted msgid order with a standard UTF-8 header
/// carrying the germanic plural rule (`nplurals=2; plural=(n != 1);`).
#[derive(Debug, Default, Clone)]
pub struct MoCatalog {
    entries: BTreeMap<String, String>,
}

impl MoCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a singular message.
    pub fn message(mut self, id: &str, text: &str) -> Self {
        self.entries.insert(id.to_owned(), text.to_owned());
        self
    }

    /// Add a plural message with its two German-style forms.
    pub fn plural(
        mut self,
        id: &str,
        id_plural: &str,
        singular_text: &str,
        plural_text: &str,
    ) -> Self {
        self.entries.insert(
            format!("{id}\u{0}{id_plural}"),
            format!("{singular_text}\u{0}{plural_text}"),
        );
        self
    }

    /// Serialize into the little-endian MO binary format.
    pub fn bytes(&self) -> Vec<u8> {
        let mut entries = self.entries.clone();
        entries.entry(String::new()).or_insert_with(|| {
            "Content-Type: text/plain; charset=UTF-8\n\
             Plural-Forms: nplurals=2; plural=(n != 1);\n"
                .to_owned()
        });

        let count = entries.len() as u32;
        let originals_offset = 28u32;
        let translations_offset = originals_offset + 8 * count;
        // no hash table, strings follow the index tables directly
        let strings_offset = translations_offset + 8 * count;

        let mut blob: Vec<u8> = Vec::new();
        let mut original_entries: Vec<(u32, u32)> = Vec::new();
        let mut translation_entries: Vec<(u32, u32)> = Vec::new();

        for id in entries.keys() {
            original_entries.push((id.len() as u32, strings_offset + blob.len() as u32));
            blob.extend_from_slice(id.as_bytes());
            blob.push(0);
        }
        for text in entries.values() {
            translation_entries.push((text.len() as u32, strings_offset + blob.len() as u32));
            blob.extend_from_slice(text.as_bytes());
            blob.push(0);
        }

        let mut out = Vec::with_capacity(28 + 16 * entries.len() + blob.len());
        for word in [
            0x9504_12de_u32,
            0,
            count,
            originals_offset,
            translations_offset,
            0,
            strings_offset,
        ] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        for (len, offset) in original_entries.into_iter().chain(translation_entries) {
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
        }
        out.extend_from_slice(&blob);
        out
    }

    /// Write the catalog to `{root}/{locale}/LC_MESSAGES/{domain}.mo`.
    pub fn write(&self, root: &Path, locale: &str, domain: &str) -> io::Result<PathBuf> {
        let dir = root.join(locale).join("LC_MESSAGES");
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{domain}.mo"));
        fs::write(&path, self.bytes())?;
        Ok(path)
    }
}

/// The German `messages` catalog used across the suite.
pub fn german_messages() -> MoCatalog {
    MoCatalog::new()
        .message("Hello %(name)s!", "Hallo %(name)s!")
        .message("Yes", "Ja")
        .plural(
            "%(num)s Apple",
            "%(num)s Apples",
            "%(num)s Apfel",
            "%(num)s Äpfel",
        )
}

/// The standard fixture tree:
///
/// ```text
/// translations/de/LC_MESSAGES/{messages,test}.mo
/// renamed_translations/de/LC_MESSAGES/messages.mo
/// translations_different_domain/de/LC_MESSAGES/myapp.mo
/// ```
///
/// `translations` and `renamed_translations` share the `Hello` message but
/// otherwise carry disjoint keys, so directory-merge behaviour is
/// observable from either side.
pub fn fixture_tree() -> TempDir {
    let tmp = tempfile::tempdir().expect("create fixture directory");
    let root = tmp.path();

    german_messages()
        .write(&root.join("translations"), "de", "messages")
        .expect("write messages catalog");
    MoCatalog::new()
        .message("first", "erste")
        .write(&root.join("translations"), "de", "test")
        .expect("write test catalog");
    MoCatalog::new()
        .message("Hello %(name)s!", "Hallo %(name)s!")
        .message("Good morning", "Guten Morgen")
        .write(&root.join("renamed_translations"), "de", "messages")
        .expect("write renamed catalog");
    MoCatalog::new()
        .message("Good bye", "Auf Wiedersehen")
        .message("Hello %(name)s!", "Hallo %(name)s!")
        .write(&root.join("translations_different_domain"), "de", "myapp")
        .expect("write myapp catalog");

    tmp
}

/// Config rooted at `root` with the suite's default locale `de_DE`.
pub fn german_config(root: &Path) -> TolkConfig {
    TolkConfig {
        default_locale: "de_DE".into(),
        root_path: root.to_path_buf(),
        ..TolkConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_round_trip_through_the_parser() {
        let bytes = german_messages().bytes();
        let catalog = gettext::Catalog::parse(&bytes[..]).unwrap();
        assert_eq!(catalog.gettext("Yes"), "Ja");
        assert_eq!(catalog.gettext("missing"), "missing");
        assert_eq!(
            catalog.ngettext("%(num)s Apple", "%(num)s Apples", 1),
            "%(num)s Apfel"
        );
        assert_eq!(
            catalog.ngettext("%(num)s Apple", "%(num)s Apples", 3),
            "%(num)s Äpfel"
        );
    }

    #[test]
    fn fixture_tree_layout() {
        let tree = fixture_tree();
        assert!(tree
            .path()
            .join("translations/de/LC_MESSAGES/messages.mo")
            .is_file());
        assert!(tree
            .path()
            .join("translations_different_domain/de/LC_MESSAGES/myapp.mo")
            .is_file());
    }
}
