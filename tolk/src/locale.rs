//! Locale and timezone identifiers.
//!
//! Both types are validated on construction; an identifier that does not
//! parse is a [`Error::Configuration`], surfaced when the value is first
//! resolved rather than at setup.

use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;
use unic_langid::{langid, LanguageIdentifier};

use crate::error::Error;

/// A resolved locale.
///
/// Wraps a [`LanguageIdentifier`]; parsing accepts both the BCP 47 hyphen
/// form (`de-DE`) and the POSIX underscore form (`de_DE`). The canonical
/// string form is the underscore form used by gettext directory layouts,
/// fixed at construction.
///
/// ```
/// use tolk::Locale;
///
/// let locale: Locale = "de-DE".parse().unwrap();
/// assert_eq!(locale.to_string(), "de_DE");
/// assert_eq!(locale, "de_DE".parse().unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    id: LanguageIdentifier,
    canonical: String,
}

impl Locale {
    fn from_id(id: LanguageIdentifier) -> Self {
        let mut canonical = id.language().as_str().to_owned();
        if let Some(region) = id.region() {
            canonical.push('_');
            canonical.push_str(region.as_str());
        }
        Self { id, canonical }
    }

    /// The primary language subtag, lowercased (`de` for `de_DE`).
    pub fn language(&self) -> &str {
        self.canonical
            .split('_')
            .next()
            .unwrap_or(&self.canonical)
    }

    /// The region subtag, if any (`DE` for `de_DE`).
    pub fn region(&self) -> Option<String> {
        self.id.region().map(|region| region.as_str().to_owned())
    }

    /// Directory names to try when looking up a catalog for this locale,
    /// most specific first: `["de_DE", "de"]`, or just `["de"]` when no
    /// region is present.
    pub(crate) fn candidates(&self) -> Vec<String> {
        let full = self.canonical.clone();
        let language = self.language().to_owned();
        if full == language {
            vec![full]
        } else {
            vec![full, language]
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::from_id(langid!("en"))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.replace('_', "-")
            .parse::<LanguageIdentifier>()
            .map(Self::from_id)
            .map_err(|_| Error::Configuration(format!("invalid locale identifier: {s:?}")))
    }
}

/// A resolved IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(Tz);

impl Timezone {
    /// The IANA name, e.g. `Europe/Vienna`.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// The underlying [`chrono_tz::Tz`], for use with chrono conversions.
    pub fn tz(&self) -> Tz {
        self.0
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Timezone(Tz::UTC)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Timezone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Tz>()
            .map(Timezone)
            .map_err(|_| Error::Configuration(format!("invalid timezone identifier: {s:?}")))
    }
}
