#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![deny(unreachable_pub)]

//! Axum integration for [`tolk`].
//!
//! [`TolkLayer`] wraps every request in a request scope owned by one
//! [`Tolk`] instance, so handlers and anything they call can use the free
//! functions (`tolk::gettext`, `tolk::get_locale`, …) without threading a
//! handle through. Attach one layer per application:
//!
//! ```ignore
//! let tolk = Tolk::new(config);
//! let app = Router::new()
//!     .route("/", get(handler))
//!     .layer(TolkLayer::new(&tolk));
//! ```

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use axum_core::extract::FromRequestParts;
use http::request::Parts;
use http::Request;
use tolk::{Locale, Tolk};
use tower::{Layer, Service};

/// Layer establishing a [`tolk`] request scope around every request.
#[derive(Clone)]
pub struct TolkLayer {
    tolk: Tolk,
}

impl TolkLayer {
    pub fn new(tolk: &Tolk) -> Self {
        Self { tolk: tolk.clone() }
    }
}

impl<S> Layer<S> for TolkLayer {
    type Service = TolkService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TolkService {
            tolk: self.tolk.clone(),
            inner,
        }
    }
}

/// Middleware produced by [`TolkLayer`].
#[derive(Clone)]
pub struct TolkService<S> {
    tolk: Tolk,
    inner: S,
}

impl<S, B> Service<Request<B>> for TolkService<S>
where
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), S::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        // Take the service that was driven to readiness, leave a clone.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let tolk = self.tolk.clone();
        Box::pin(async move { tolk.scope(inner.call(req)).await })
    }
}

/// Extractor yielding the locale resolved for the current request.
///
/// Never rejects; without an active scope (no [`TolkLayer`] installed) or
/// with unresolvable configuration it falls back to the default locale.
#[derive(Debug, Clone)]
pub struct RequestLocale(pub Locale);

#[async_trait]
impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(tolk::get_locale().unwrap_or_default()))
    }
}
