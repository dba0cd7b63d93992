#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![deny(unreachable_pub)]

//! tolk binds gettext-style message catalogs to the per-request context of
//! an asynchronous web application.
//!
//! A [`Tolk`] instance owns the configuration, the selector callbacks, and
//! the default translation [`Domain`] for one application. The framework
//! binding (for axum, the `tolk_axum` crate) wraps every request in a
//! request scope; inside that scope the free functions in this crate
//! ([`gettext`], [`ngettext`], [`get_locale`], [`force_locale`], the
//! formatting helpers) need no handle argument, because they resolve the
//! owning instance through the scope. Several applications can coexist in
//! one process, each with fully isolated caches and state.
//!
//! The active locale and timezone are resolved once per request, in
//! priority order: a scoped override, the registered selector, then the
//! configured default. Catalogs are loaded lazily per `(locale, domain)`
//! pair and cached for the lifetime of the domain; a locale without
//! catalogs falls back to the null catalog and every message passes
//! through unchanged, so untranslated applications keep working.
//!
//! # Example
//!
//! ```
//! use tolk::{gettext, Tolk, TolkConfig};
//!
//! let tolk = Tolk::new(TolkConfig {
//!     default_locale: "de_DE".into(),
//!     ..TolkConfig::default()
//! });
//!
//! // Web frameworks enter the scope through a middleware layer; tests use
//! // the synchronous form.
//! tolk.enter(|| {
//!     assert_eq!(tolk::get_locale().unwrap().to_string(), "de_DE");
//!     // No catalogs on disk here, so lookups pass through.
//!     assert_eq!(gettext("Hello"), "Hello");
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;

mod catalog;
mod config;
mod context;
mod datefmt;
mod domain;
mod error;
mod lazy;
mod locale;
mod subst;

pub use crate::catalog::{CatalogLoader, MoLoader, Translations};
pub use crate::config::{TolkConfig, DIRECTORY_SEPARATOR};
pub use crate::context::LocaleOverride;
pub use crate::datefmt::{
    format_date, format_datetime, format_time, format_timedelta, to_user_timezone, DateFormats,
};
pub use crate::domain::Domain;
pub use crate::error::{Error, Result};
pub use crate::lazy::LazyString;
pub use crate::locale::{Locale, Timezone};

/// Callback choosing the locale for the current request; `None` falls
/// through to the configured default.
pub type LocaleSelector = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// Callback choosing the timezone for the current request.
pub type TimezoneSelector = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// The extension facade: one instance per application.
///
/// Cheap to clone; clones share all state. Constructed either with its
/// configuration up front ([`Tolk::new`]) or default-constructed and
/// configured later ([`Tolk::init`]), matching applications that build
/// their extensions before their config store is ready.
#[derive(Clone)]
pub struct Tolk {
    inner: Arc<TolkInner>,
}

struct TolkInner {
    config: RwLock<TolkConfig>,
    locale_selector: RwLock<Option<LocaleSelector>>,
    timezone_selector: RwLock<Option<TimezoneSelector>>,
    default_domain: RwLock<Domain>,
    date_formats: RwLock<DateFormats>,
}

impl Tolk {
    /// A facade bound to `config`.
    pub fn new(config: TolkConfig) -> Self {
        let default_domain = Domain::new(config.default_domain.clone());
        Self {
            inner: Arc::new(TolkInner {
                config: RwLock::new(config),
                locale_selector: RwLock::new(None),
                timezone_selector: RwLock::new(None),
                default_domain: RwLock::new(default_domain),
                date_formats: RwLock::new(DateFormats::default()),
            }),
        }
    }

    /// Late initialization: replace the configuration and rebuild the
    /// default domain (with a fresh cache) under the configured name.
    /// Registered selectors survive.
    pub fn init(&self, config: TolkConfig) {
        *self.inner.default_domain.write() = Domain::new(config.default_domain.clone());
        *self.inner.config.write() = config;
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> TolkConfig {
        self.inner.config.read().clone()
    }

    /// Mutate the configuration in place. Takes effect on the next
    /// resolution; already memoized request state needs [`refresh`].
    pub fn update_config(&self, f: impl FnOnce(&mut TolkConfig)) {
        f(&mut self.inner.config.write());
    }

    /// Register the locale selector, replacing any previous one.
    pub fn locale_selector(
        &self,
        selector: impl Fn() -> Option<String> + Send + Sync + 'static,
    ) {
        *self.inner.locale_selector.write() = Some(Box::new(selector));
    }

    /// Register the timezone selector, replacing any previous one.
    pub fn timezone_selector(
        &self,
        selector: impl Fn() -> Option<String> + Send + Sync + 'static,
    ) {
        *self.inner.timezone_selector.write() = Some(Box::new(selector));
    }

    /// The domain currently backing the free translation functions.
    pub fn default_domain(&self) -> Domain {
        self.inner.default_domain.read().clone()
    }

    pub(crate) fn set_default_domain(&self, domain: Domain) {
        *self.inner.default_domain.write() = domain;
    }

    /// Override one date-format table entry (see [`DateFormats`]).
    pub fn set_date_format(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.date_formats.write().set(key, value);
    }

    pub(crate) fn date_formats(&self) -> DateFormats {
        self.inner.date_formats.read().clone()
    }

    pub(crate) fn run_locale_selector(&self) -> Option<String> {
        self.inner
            .locale_selector
            .read()
            .as_ref()
            .and_then(|selector| selector())
    }

    pub(crate) fn run_timezone_selector(&self) -> Option<String> {
        self.inner
            .timezone_selector
            .read()
            .as_ref()
            .and_then(|selector| selector())
    }

    /// Every locale for which at least one configured directory carries a
    /// catalog, one entry per (directory, locale) hit, without loading any
    /// of them.
    pub fn list_translations(&self) -> Vec<Locale> {
        self.default_domain()
            .available_locales(&self.config().directories())
    }

    /// Run `future` inside a fresh request scope owned by this facade.
    /// Framework bindings wrap each request handler in this.
    pub fn scope<F: Future>(&self, future: F) -> impl Future<Output = F::Output> {
        context::scope(self.clone(), future)
    }

    /// Synchronous scope entry, mainly for tests.
    pub fn enter<R>(&self, f: impl FnOnce() -> R) -> R {
        context::enter(self.clone(), f)
    }
}

impl Default for Tolk {
    fn default() -> Self {
        Self::new(TolkConfig::default())
    }
}

/// The locale active for the current request.
///
/// Outside a request scope this degrades to the built-in default (`en`)
/// rather than failing; inside a scope a malformed configured or selected
/// identifier is an [`Error::Configuration`].
pub fn get_locale() -> Result<Locale> {
    context::get_locale()
}

/// The timezone active for the current request. Degrades to UTC outside a
/// request scope.
pub fn get_timezone() -> Result<Timezone> {
    context::get_timezone()
}

/// Drop the memoized locale/timezone for the current request, forcing
/// re-selection on next access. An active [`force_locale`] override is
/// preserved. A no-op outside a request scope.
pub fn refresh() {
    context::refresh();
}

/// Push a scoped locale override; the returned guard restores the previous
/// state when dropped. Fails outside a request scope.
pub fn force_locale(locale: &str) -> Result<LocaleOverride> {
    context::force_locale(locale)
}

/// The default domain's translations for the active locale, or the null
/// catalog outside a request scope.
pub fn get_translations() -> Arc<Translations> {
    match current_default_domain() {
        Some(domain) => domain.translations(),
        None => Arc::new(Translations::null()),
    }
}

fn current_default_domain() -> Option<Domain> {
    context::with_scope(|scope| scope.tolk().default_domain())
}

/// Translate `message` against the active locale and default domain. No
/// substitution is performed, so literal placeholders survive.
pub fn gettext(message: &str) -> String {
    match current_default_domain() {
        Some(domain) => domain.gettext(message),
        None => message.to_owned(),
    }
}

/// Translate `message`, then substitute `%(name)s` placeholders from
/// `vars`.
pub fn gettext_with(message: &str, vars: &[(&str, &str)]) -> String {
    match current_default_domain() {
        Some(domain) => domain.gettext_with(message, vars),
        None => subst::subst(message, vars),
    }
}

/// Translate with plural selection per the catalog's plural rule, then
/// substitute `%(num)s`.
pub fn ngettext(singular: &str, plural: &str, num: u64) -> String {
    ngettext_with(singular, plural, num, &[])
}

/// Translate with plural selection, then substitute `%(num)s` plus `vars`.
pub fn ngettext_with(singular: &str, plural: &str, num: u64, vars: &[(&str, &str)]) -> String {
    match current_default_domain() {
        Some(domain) => domain.ngettext_with(singular, plural, num, vars),
        None => {
            let num_value = num.to_string();
            let text = if num == 1 { singular } else { plural };
            let mut all: Vec<(&str, &str)> = Vec::with_capacity(vars.len() + 1);
            all.push(("num", num_value.as_str()));
            all.extend_from_slice(vars);
            subst::subst(text, &all)
        }
    }
}

/// A deferred [`gettext`]: resolution happens at rendering time, against
/// the locale and domain active then.
pub fn lazy_gettext(message: &str) -> LazyString {
    LazyString::deferred(message)
}

/// A deferred [`ngettext`].
pub fn lazy_ngettext(singular: &str, plural: &str, num: u64) -> LazyString {
    LazyString::deferred_plural(singular, plural, num)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_functions_degrade_outside_scope() {
        assert_eq!(gettext("Test %s"), "Test %s");
        assert_eq!(gettext_with("Test %(name)s", &[("name", "test")]), "Test test");
        assert_eq!(ngettext("%(num)s Apple", "%(num)s Apples", 3), "3 Apples");
        assert!(get_translations().is_null());
    }

    #[test]
    fn reregistering_a_selector_replaces_it() {
        let tolk = Tolk::default();
        tolk.locale_selector(|| Some("de_DE".into()));
        tolk.locale_selector(|| Some("fr_FR".into()));
        tolk.enter(|| {
            assert_eq!(get_locale().unwrap().to_string(), "fr_FR");
        });
    }

    #[test]
    fn init_replaces_config_and_domain() {
        let tolk = Tolk::default();
        assert_eq!(tolk.default_domain().name(), "messages");
        tolk.init(TolkConfig {
            default_domain: "myapp".into(),
            default_locale: "de_DE".into(),
            ..TolkConfig::default()
        });
        assert_eq!(tolk.default_domain().name(), "myapp");
        tolk.enter(|| {
            assert_eq!(get_locale().unwrap().to_string(), "de_DE");
        });
    }

    #[test]
    fn facades_do_not_share_state() {
        let a = Tolk::new(TolkConfig {
            default_locale: "de_DE".into(),
            ..TolkConfig::default()
        });
        let b = Tolk::default();
        a.enter(|| assert_eq!(get_locale().unwrap().to_string(), "de_DE"));
        b.enter(|| assert_eq!(get_locale().unwrap().to_string(), "en"));
    }
}
