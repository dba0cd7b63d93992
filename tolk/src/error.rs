use std::io;

/// Convenience alias for operations that may fail with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// tolk error type
///
/// Missing catalogs are deliberately *not* represented here: a locale or
/// domain without translations degrades to the null catalog and lookups
/// pass the input through unchanged.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A configured or selected locale/timezone identifier could not be
    /// parsed. Raised at resolution time, since configuration may change
    /// between requests.
    #[error("invalid configuration value: {0}")]
    Configuration(String),

    /// An operation that mutates request state (such as a scoped locale
    /// override) was invoked outside a request scope.
    #[error("no request context is active")]
    NoRequestContext,

    /// A catalog file exists but could not be parsed.
    #[error("malformed catalog: {0}")]
    Catalog(#[from] gettext::Error),

    /// Filesystem error while reading a translation directory.
    #[error(transparent)]
    Io(#[from] io::Error),
}
