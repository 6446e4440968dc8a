//! Middleware layer.
//!
//! Middleware intercepts a request on its way to a route handler and is the
//! right place for cross-cutting concerns: tracing, authentication-header
//! inspection, request-id injection. Error handlers do the same for failures.
//!
//! Closures become middleware through [`from_fn`] and error handlers through
//! [`from_error_fn`]:
//!
//! ```rust
//! use switchyard::{Error, Router, StatusCode, middleware};
//!
//! let app = Router::new()
//!     .middleware(middleware::from_fn(|req, res, next| Box::pin(async move {
//!         if req.header("authorization").is_none() {
//!             res.status(StatusCode::UNAUTHORIZED).text("missing credentials");
//!             return; // dropping `next` stops the chain
//!         }
//!         next.run(req, res).await
//!     })))
//!     .middleware_at("/error", middleware::from_fn(|req, res, next| {
//!         next.fail(Error::new("Test error"), req, res)
//!     }))
//!     .on_error(middleware::from_error_fn(|err, _req, res, _next| Box::pin(async move {
//!         tracing::error!("request failed: {err}");
//!         res.status(StatusCode::INTERNAL_SERVER_ERROR).text("Something went wrong!");
//!     })));
//! ```
//!
//! Built in:
//! - [`Trace`]: per-request span with method and path, status and latency on completion
//! - [`LogErrors`]: logs the error server-side, then passes it on
//! - [`ServeDir`]: `GET` requests answered from files under a directory

mod serve_dir;
mod trace;

pub use serve_dir::ServeDir;
pub use trace::{LogErrors, Trace};

use crate::chain::{ErrorNext, Next};
use crate::error::Error;
use crate::handler::{BoxFuture, ErrorHandler, Middleware};
use crate::request::Request;
use crate::response::Response;

/// Adapts a closure into a [`Middleware`].
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response, Next<'a>) -> BoxFuture<'a> + Send + Sync + 'static,
{
    FromFn(f)
}

/// Adapts a closure into an [`ErrorHandler`].
pub fn from_error_fn<F>(f: F) -> FromErrorFn<F>
where
    F: for<'a> Fn(Error, &'a mut Request, &'a mut Response, ErrorNext<'a>) -> BoxFuture<'a>
        + Send
        + Sync
        + 'static,
{
    FromErrorFn(f)
}

/// Middleware built by [`from_fn`].
pub struct FromFn<F>(F);

impl<F> Middleware for FromFn<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response, Next<'a>) -> BoxFuture<'a> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response, next: Next<'a>) -> BoxFuture<'a> {
        (self.0)(req, res, next)
    }
}

/// Error handler built by [`from_error_fn`].
pub struct FromErrorFn<F>(F);

impl<F> ErrorHandler for FromErrorFn<F>
where
    F: for<'a> Fn(Error, &'a mut Request, &'a mut Response, ErrorNext<'a>) -> BoxFuture<'a>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        err: Error,
        req: &'a mut Request,
        res: &'a mut Response,
        next: ErrorNext<'a>,
    ) -> BoxFuture<'a> {
        (self.0)(err, req, res, next)
    }
}
