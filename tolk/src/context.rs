//! Task-local request state: resolver memoization and the override stack.
//!
//! One [`RequestScope`] lives in task-local storage for the duration of a
//! request. Everything in it is single-task by construction, so interior
//! mutability is plain `RefCell`; the shared application state it points at
//! does its own locking.

use std::cell::RefCell;
use std::future::Future;

use log::debug;

use crate::error::{Error, Result};
use crate::locale::{Locale, Timezone};
use crate::Tolk;

tokio::task_local! {
    static SCOPE: RequestScope;
}

/// Per-request resolution state.
///
/// Resolution order for both locale and timezone: top of the override
/// stack, then the registered selector, then the configured default. The
/// selector/default outcome is memoized until [`refresh`] clears it; an
/// override is never memoized and never cleared by `refresh`.
pub(crate) struct RequestScope {
    tolk: Tolk,
    locale: RefCell<Option<Locale>>,
    timezone: RefCell<Option<Timezone>>,
    overrides: RefCell<Vec<Locale>>,
}

impl RequestScope {
    fn new(tolk: Tolk) -> Self {
        Self {
            tolk,
            locale: RefCell::new(None),
            timezone: RefCell::new(None),
            overrides: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn tolk(&self) -> &Tolk {
        &self.tolk
    }

    fn resolve_locale(&self) -> Result<Locale> {
        if let Some(forced) = self.overrides.borrow().last() {
            return Ok(forced.clone());
        }
        if let Some(memo) = self.locale.borrow().as_ref() {
            return Ok(memo.clone());
        }
        let resolved = self.select_locale()?;
        *self.locale.borrow_mut() = Some(resolved.clone());
        Ok(resolved)
    }

    fn select_locale(&self) -> Result<Locale> {
        if let Some(selected) = self.tolk.run_locale_selector() {
            return selected.parse();
        }
        self.tolk.config().default_locale.parse()
    }

    fn resolve_timezone(&self) -> Result<Timezone> {
        if let Some(memo) = self.timezone.borrow().as_ref() {
            return Ok(*memo);
        }
        let resolved = self.select_timezone()?;
        *self.timezone.borrow_mut() = Some(resolved);
        Ok(resolved)
    }

    fn select_timezone(&self) -> Result<Timezone> {
        if let Some(selected) = self.tolk.run_timezone_selector() {
            return selected.parse();
        }
        self.tolk.config().default_timezone.parse()
    }

    fn refresh(&self) {
        self.locale.borrow_mut().take();
        self.timezone.borrow_mut().take();
    }
}

pub(crate) fn scope<F: Future>(tolk: Tolk, future: F) -> impl Future<Output = F::Output> {
    SCOPE.scope(RequestScope::new(tolk), future)
}

pub(crate) fn enter<R>(tolk: Tolk, f: impl FnOnce() -> R) -> R {
    SCOPE.sync_scope(RequestScope::new(tolk), f)
}

pub(crate) fn with_scope<R>(f: impl FnOnce(&RequestScope) -> R) -> Option<R> {
    SCOPE.try_with(|scope| f(scope)).ok()
}

pub(crate) fn in_scope() -> bool {
    SCOPE.try_with(|_| ()).is_ok()
}

pub(crate) fn get_locale() -> Result<Locale> {
    with_scope(RequestScope::resolve_locale).unwrap_or_else(|| Ok(Locale::default()))
}

pub(crate) fn get_timezone() -> Result<Timezone> {
    with_scope(RequestScope::resolve_timezone).unwrap_or_else(|| Ok(Timezone::default()))
}

pub(crate) fn refresh() {
    if with_scope(RequestScope::refresh).is_none() {
        debug!("refresh() called outside a request scope");
    }
}

/// RAII guard for a scoped locale override.
///
/// Dropping the guard pops exactly one override, restoring whatever was
/// active before: the prior override for nested scopes, otherwise the
/// selector/default resolution. Must be dropped in the scope it was
/// created in.
#[must_use = "the override ends when this guard is dropped"]
pub struct LocaleOverride {
    _private: (),
}

impl Drop for LocaleOverride {
    fn drop(&mut self) {
        let _ = SCOPE.try_with(|scope| {
            scope.overrides.borrow_mut().pop();
        });
    }
}

pub(crate) fn force_locale(locale: &str) -> Result<LocaleOverride> {
    let locale: Locale = locale.parse()?;
    SCOPE
        .try_with(|scope| scope.overrides.borrow_mut().push(locale.clone()))
        .map_err(|_| Error::NoRequestContext)?;
    Ok(LocaleOverride { _private: () })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TolkConfig;

    fn german_app() -> Tolk {
        Tolk::new(TolkConfig {
            default_locale: "de_DE".into(),
            ..TolkConfig::default()
        })
    }

    #[test]
    fn resolves_config_default() {
        german_app().enter(|| {
            assert_eq!(get_locale().unwrap().to_string(), "de_DE");
            assert_eq!(get_timezone().unwrap().name(), "UTC");
        });
    }

    #[test]
    fn selector_wins_over_config() {
        let tolk = german_app();
        tolk.locale_selector(|| Some("en_US".into()));
        tolk.enter(|| {
            assert_eq!(get_locale().unwrap().to_string(), "en_US");
        });
    }

    #[test]
    fn selector_returning_none_falls_through() {
        let tolk = german_app();
        tolk.locale_selector(|| None);
        tolk.enter(|| {
            assert_eq!(get_locale().unwrap().to_string(), "de_DE");
        });
    }

    #[test]
    fn invalid_selector_result_is_a_configuration_error() {
        let tolk = german_app();
        tolk.locale_selector(|| Some("!!".into()));
        tolk.enter(|| {
            assert!(matches!(get_locale(), Err(Error::Configuration(_))));
        });
    }

    #[test]
    fn resolution_is_memoized_until_refresh() {
        let tolk = german_app();
        tolk.enter(|| {
            assert_eq!(get_locale().unwrap().to_string(), "de_DE");
            tolk.update_config(|config| config.default_locale = "en_US".into());
            // memoized value still active
            assert_eq!(get_locale().unwrap().to_string(), "de_DE");
            refresh();
            assert_eq!(get_locale().unwrap().to_string(), "en_US");
        });
    }

    #[test]
    fn force_locale_restores_previous_state() {
        let tolk = german_app();
        tolk.enter(|| {
            assert_eq!(get_locale().unwrap().to_string(), "de_DE");
            {
                let _guard = force_locale("en_US").unwrap();
                assert_eq!(get_locale().unwrap().to_string(), "en_US");
            }
            assert_eq!(get_locale().unwrap().to_string(), "de_DE");
        });
    }

    #[test]
    fn force_locale_nests() {
        german_app().enter(|| {
            let _outer = force_locale("en_US").unwrap();
            {
                let _inner = force_locale("fr_FR").unwrap();
                assert_eq!(get_locale().unwrap().to_string(), "fr_FR");
            }
            assert_eq!(get_locale().unwrap().to_string(), "en_US");
        });
    }

    #[test]
    fn refresh_keeps_the_active_override() {
        let tolk = german_app();
        tolk.enter(|| {
            let guard = force_locale("en_US").unwrap();
            assert_eq!(get_locale().unwrap().to_string(), "en_US");
            refresh();
            assert_eq!(get_locale().unwrap().to_string(), "en_US");
            drop(guard);
            assert_eq!(get_locale().unwrap().to_string(), "de_DE");
        });
    }

    #[test]
    fn force_locale_outside_scope_fails() {
        assert!(matches!(
            force_locale("en_US"),
            Err(Error::NoRequestContext)
        ));
    }

    #[test]
    fn force_locale_rejects_garbage() {
        german_app().enter(|| {
            assert!(matches!(
                force_locale("not a locale"),
                Err(Error::Configuration(_))
            ));
        });
    }

    #[test]
    fn no_scope_degrades_to_builtin_defaults() {
        assert_eq!(get_locale().unwrap().to_string(), "en");
        assert_eq!(get_timezone().unwrap().name(), "UTC");
    }
}
