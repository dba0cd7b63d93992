//! Translation domains and their catalog caches.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use log::warn;
use parking_lot::{Mutex, RwLock};

use crate::catalog::{CatalogLoader, MoLoader, Translations};
use crate::context;
use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::subst::subst;

type CacheKey = (String, String);

/// A named translation domain.
///
/// A domain owns an ordered directory list and the catalog cache keyed by
/// `(locale, domain name)`. Handles are cheap to clone and share both; the
/// cache lives as long as the domain, so requests of the same application
/// share loaded catalogs while separate applications (separate domain
/// instances) never see each other's entries.
///
/// A domain built with [`Domain::new`] has no directory list of its own and
/// uses the configured directories of whichever application's request scope
/// is active when it is queried.
#[derive(Clone)]
pub struct Domain {
    inner: Arc<DomainInner>,
}

struct DomainInner {
    name: String,
    directories: Option<Vec<PathBuf>>,
    loader: RwLock<Arc<dyn CatalogLoader>>,
    cache: Mutex<HashMap<CacheKey, Arc<Translations>>>,
}

impl Domain {
    /// A domain deferring to the active application's configured
    /// directories.
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), None)
    }

    /// A domain with an explicit directory list, usable outside any request
    /// scope.
    pub fn with_directories(name: impl Into<String>, directories: Vec<PathBuf>) -> Self {
        Self::build(name.into(), Some(directories))
    }

    fn build(name: String, directories: Option<Vec<PathBuf>>) -> Self {
        Self {
            inner: Arc::new(DomainInner {
                name,
                directories,
                loader: RwLock::new(Arc::new(MoLoader)),
                cache: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The domain name, used as the catalog file stem.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Replace the catalog loader. Tests use this to count or fake loads;
    /// already cached catalogs are unaffected.
    pub fn set_loader(&self, loader: Arc<dyn CatalogLoader>) {
        *self.inner.loader.write() = loader;
    }

    /// Install this domain as the active application's default, rerouting
    /// the free translation functions to it. Last write wins.
    pub fn as_default(&self) -> Result<()> {
        context::with_scope(|scope| scope.tolk().set_default_domain(self.clone()))
            .ok_or(Error::NoRequestContext)
    }

    fn directories(&self) -> Vec<PathBuf> {
        if let Some(directories) = &self.inner.directories {
            return directories.clone();
        }
        context::with_scope(|scope| scope.tolk().config().directories()).unwrap_or_default()
    }

    /// Translations for the locale active in the current request scope.
    ///
    /// Outside a scope a directory-less domain returns the null catalog
    /// without touching the cache; resolution failures degrade the same
    /// way.
    pub fn translations(&self) -> Arc<Translations> {
        if self.inner.directories.is_none() && !context::in_scope() {
            return Arc::new(Translations::null());
        }
        match context::get_locale() {
            Ok(locale) => self.translations_for(&locale),
            Err(err) => {
                warn!("cannot resolve locale for domain {:?}: {err}", self.name());
                Arc::new(Translations::null())
            }
        }
    }

    /// Translations for an explicit locale, loading and caching on first
    /// use. Repeated calls return the same shared value; when no directory
    /// has a catalog the null value is cached, so misses stay cheap.
    pub fn translations_for(&self, locale: &Locale) -> Arc<Translations> {
        let key = (locale.to_string(), self.inner.name.clone());
        if let Some(hit) = self.inner.cache.lock().get(&key).cloned() {
            return hit;
        }
        let loaded = Arc::new(self.load_from(&self.directories(), locale));
        self.inner.cache.lock().entry(key).or_insert(loaded).clone()
    }

    /// Like [`Domain::translations`], but performs a cache-missing load on
    /// the blocking pool so concurrently scheduled requests keep running
    /// while this one waits on disk.
    pub async fn translations_async(&self) -> Arc<Translations> {
        if self.inner.directories.is_none() && !context::in_scope() {
            return Arc::new(Translations::null());
        }
        let locale = match context::get_locale() {
            Ok(locale) => locale,
            Err(err) => {
                warn!("cannot resolve locale for domain {:?}: {err}", self.name());
                return Arc::new(Translations::null());
            }
        };
        let key = (locale.to_string(), self.inner.name.clone());
        if let Some(hit) = self.inner.cache.lock().get(&key).cloned() {
            return hit;
        }
        let this = self.clone();
        let directories = self.directories();
        let loaded = tokio::task::spawn_blocking(move || this.load_from(&directories, &locale))
            .await
            .unwrap_or_else(|err| {
                warn!("catalog load task failed: {err}");
                Translations::null()
            });
        let loaded = Arc::new(loaded);
        self.inner.cache.lock().entry(key).or_insert(loaded).clone()
    }

    fn load_from(&self, directories: &[PathBuf], locale: &Locale) -> Translations {
        let loader = self.inner.loader.read().clone();
        let mut catalogs = Vec::new();
        for dir in directories {
            match loader.load(dir, locale, &self.inner.name) {
                Ok(Some(catalog)) => catalogs.push(catalog),
                Ok(None) => {}
                Err(err) => warn!(
                    "skipping translation directory {}: {err}",
                    dir.display()
                ),
            }
        }
        Translations::from_catalogs(catalogs)
    }

    /// Locales with a catalog in any of `directories`, one entry per
    /// (directory, locale) hit, without loading anything.
    pub fn available_locales(&self, directories: &[PathBuf]) -> Vec<Locale> {
        let loader = self.inner.loader.read().clone();
        directories
            .iter()
            .flat_map(|dir| loader.available(dir))
            .collect()
    }

    /// Translate `message` against the active locale; no substitution, so
    /// literal placeholders survive.
    pub fn gettext(&self, message: &str) -> String {
        self.translations().gettext(message).to_owned()
    }

    /// Translate `message`, then substitute `%(name)s` placeholders from
    /// `vars`.
    pub fn gettext_with(&self, message: &str, vars: &[(&str, &str)]) -> String {
        subst(self.translations().gettext(message), vars)
    }

    /// Translate with plural selection and substitute `%(num)s`.
    pub fn ngettext(&self, singular: &str, plural: &str, num: u64) -> String {
        self.ngettext_with(singular, plural, num, &[])
    }

    /// Translate with plural selection and substitute `%(num)s` plus
    /// `vars`.
    pub fn ngettext_with(
        &self,
        singular: &str,
        plural: &str,
        num: u64,
        vars: &[(&str, &str)],
    ) -> String {
        let translations = self.translations();
        let text = translations.ngettext(singular, plural, num);
        let num_value = num.to_string();
        let mut all: Vec<(&str, &str)> = Vec::with_capacity(vars.len() + 1);
        all.push(("num", num_value.as_str()));
        all.extend_from_slice(vars);
        subst(text, &all)
    }

    /// Keys currently held by the catalog cache, sorted. Exposed so tests
    /// can observe which `(locale, domain)` pairs have been loaded.
    pub fn cache_keys(&self) -> Vec<(String, String)> {
        let mut keys: Vec<_> = self.inner.cache.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}
