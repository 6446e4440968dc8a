//! The three capabilities a router stores: route handlers, middleware and
//! error handlers.
//!
//! # How async handlers are stored
//!
//! A router holds handlers of *different* concrete types in one `Vec`, so each
//! capability is a trait used as a trait object (`Arc<dyn Handler>`,
//! `Box<dyn Middleware>`, `Arc<dyn ErrorHandler>`). Every call returns a
//! [`BoxFuture`] borrowing the request and response for the duration of the
//! call:
//!
//! ```text
//! |req, res| Box::pin(async move { … })      ← user writes this
//!        ↓ router.get("/", …)
//! Arc::new(closure)  as  Arc<dyn Handler>     ← blanket impl below
//!        ↓
//! handler.call(&mut req, &mut res)            ← one vtable dispatch
//! ```
//!
//! Closures must spell out `Box::pin(async move { … })` because the future
//! borrows its arguments: `for<'a> Fn(&'a mut Request, …) -> BoxFuture<'a, _>`
//! is the only shape stable Rust can name for that.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::chain::{ErrorNext, Next};
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

/// A heap-allocated, type-erased future borrowing for `'a`.
///
/// `Send` lets the server move a request's dispatch across tokio worker threads.
pub type BoxFuture<'a, T = ()> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A route handler shared across concurrent requests.
pub(crate) type BoxedHandler = Arc<dyn Handler>;

// ── Route handlers ────────────────────────────────────────────────────────────

/// The terminal stage of a dispatch. It receives no continuation: it writes
/// the response itself, or returns `Err` to enter the router's error chain.
///
/// Implemented for every closure of the right shape, so
/// [`Router::get`](crate::Router::get) and friends accept closures directly.
/// Implement it on your own type and register with
/// [`Router::route`](crate::Router::route) when a handler carries state.
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, Result<(), Error>>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, Result<(), Error>>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, Result<(), Error>> {
        self(req, res)
    }
}

// ── Middleware ────────────────────────────────────────────────────────────────

/// A stage of the middleware chain.
///
/// Continue with [`Next::run`], divert into the error chain with
/// [`Next::fail`], or drop `next` to stop dispatch here. Closures are adapted
/// with [`middleware::from_fn`](crate::middleware::from_fn).
pub trait Middleware: Send + Sync + 'static {
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response, next: Next<'a>) -> BoxFuture<'a>;
}

// ── Error handlers ────────────────────────────────────────────────────────────

/// A stage of the error chain.
///
/// Write a response to recover, or pass the error (or a new one) on with
/// [`ErrorNext::fail`]. Closures are adapted with
/// [`middleware::from_error_fn`](crate::middleware::from_error_fn).
pub trait ErrorHandler: Send + Sync + 'static {
    fn call<'a>(
        &'a self,
        err: Error,
        req: &'a mut Request,
        res: &'a mut Response,
        next: ErrorNext<'a>,
    ) -> BoxFuture<'a>;
}
