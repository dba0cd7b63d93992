//! Deferred translation values.

use std::fmt;

use crate::subst::subst;

/// A string-like value that re-resolves its translation every time it is
/// rendered.
///
/// Created by [`lazy_gettext`](crate::lazy_gettext) and
/// [`lazy_ngettext`](crate::lazy_ngettext), typically at definition time
/// when no request is active. Nothing is resolved at construction and
/// nothing is memoized afterwards: every [`Display`] rendering, [`html`]
/// call, or [`format`] call looks the translation up against whatever
/// locale and default domain are active at that moment.
///
/// [`html`]: LazyString::html
/// [`format`]: LazyString::format
#[derive(Clone, Debug)]
pub struct LazyString {
    inner: Inner,
}

#[derive(Clone, Debug)]
enum Inner {
    Text(String),
    Singular {
        message: String,
    },
    Plural {
        singular: String,
        plural: String,
        num: u64,
    },
}

impl LazyString {
    /// A lazy value carrying already-resolved text.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            inner: Inner::Text(value.into()),
        }
    }

    pub(crate) fn deferred(message: impl Into<String>) -> Self {
        Self {
            inner: Inner::Singular {
                message: message.into(),
            },
        }
    }

    pub(crate) fn deferred_plural(
        singular: impl Into<String>,
        plural: impl Into<String>,
        num: u64,
    ) -> Self {
        Self {
            inner: Inner::Plural {
                singular: singular.into(),
                plural: plural.into(),
                num,
            },
        }
    }

    fn resolve(&self) -> String {
        match &self.inner {
            Inner::Text(text) => text.clone(),
            Inner::Singular { message } => crate::gettext(message),
            Inner::Plural {
                singular,
                plural,
                num,
            } => crate::ngettext(singular, plural, *num),
        }
    }

    /// Old-style formatting: resolve, then substitute `%(name)s`
    /// placeholders from `vars`.
    pub fn format(&self, vars: &[(&str, &str)]) -> String {
        subst(&self.resolve(), vars)
    }

    /// Markup hook. Identical to the `Display` output: the resolved
    /// translation is emitted verbatim, never escaped a second time.
    pub fn html(&self) -> String {
        self.resolve()
    }
}

impl fmt::Display for LazyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}

impl From<&str> for LazyString {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl PartialEq<str> for LazyString {
    fn eq(&self, other: &str) -> bool {
        self.resolve() == other
    }
}

impl PartialEq<&str> for LazyString {
    fn eq(&self, other: &&str) -> bool {
        self.resolve() == *other
    }
}
