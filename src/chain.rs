//! Continuations for the middleware chain and the error chain.
//!
//! A [`Next`] is the rest of one router's middleware chain for one request,
//! ending in route lookup. An [`ErrorNext`] is the rest of that router's error
//! chain, ending in the default 500. Both are consumed when invoked, so a
//! stage can continue at most once, and once [`Next::fail`] has been called
//! nothing can resume the normal chain.

use std::sync::Arc;

use http::StatusCode;
use tracing::{debug, trace};

use crate::error::Error;
use crate::handler::{BoxFuture, ErrorHandler};
use crate::request::Request;
use crate::response::{ContentType, Response};
use crate::router::{MiddlewareEntry, Router};

pub(crate) const NOT_FOUND_BODY: &str = "Not Found";
pub(crate) const INTERNAL_ERROR_BODY: &str = r#"{"error":"Internal Server Error"}"#;

// ── Middleware chain ──────────────────────────────────────────────────────────

/// The continuation handed to a [`Middleware`](crate::Middleware).
pub struct Next<'a> {
    router: &'a Router,
    path: &'a str,
    rest: &'a [&'a MiddlewareEntry],
}

impl<'a> Next<'a> {
    pub(crate) fn new(router: &'a Router, path: &'a str, rest: &'a [&'a MiddlewareEntry]) -> Self {
        Self { router, path, rest }
    }

    /// The path as seen by the current router, with any mount prefixes stripped.
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Runs the next applicable middleware, or route lookup if none remain.
    ///
    /// Resolves once everything downstream has finished, so a middleware can
    /// act on the response afterwards.
    pub fn run<'b>(self, req: &'b mut Request, res: &'b mut Response) -> BoxFuture<'b>
    where
        'a: 'b,
    {
        match self.rest.split_first() {
            Some((entry, rest)) => {
                let next = Next { router: self.router, path: self.path, rest };
                entry.middleware.call(req, res, next)
            }
            None => self.router.dispatch_route(self.path, req, res),
        }
    }

    /// Abandons the rest of the chain and enters this router's error chain.
    pub fn fail<'b>(self, err: Error, req: &'b mut Request, res: &'b mut Response) -> BoxFuture<'b>
    where
        'a: 'b,
    {
        debug!(path = self.path, skipped = self.rest.len(), error = %err, "middleware failed");
        self.router.handle_error(err, req, res)
    }
}

// ── Error chain ───────────────────────────────────────────────────────────────

/// The continuation handed to an [`ErrorHandler`].
pub struct ErrorNext<'a> {
    rest: &'a [Arc<dyn ErrorHandler>],
}

impl<'a> ErrorNext<'a> {
    pub(crate) fn new(rest: &'a [Arc<dyn ErrorHandler>]) -> Self {
        Self { rest }
    }

    /// Passes `err` to the next error handler, or writes the default 500 when
    /// the chain is exhausted.
    pub fn fail<'b>(self, err: Error, req: &'b mut Request, res: &'b mut Response) -> BoxFuture<'b>
    where
        'a: 'b,
    {
        match self.rest.split_first() {
            Some((handler, rest)) => handler.call(err, req, res, ErrorNext { rest }),
            None => {
                internal_error(&err, res);
                Box::pin(std::future::ready(()))
            }
        }
    }

    /// Ends the error chain without an error. No response is written on the
    /// handler's behalf; if it has not written one, nothing will.
    pub fn resolve(self, res: &Response) {
        if !res.is_sent() {
            debug!(remaining = self.rest.len(), "error chain resolved without a response");
        } else {
            trace!("error chain resolved");
        }
    }
}

// ── Engine fallbacks ──────────────────────────────────────────────────────────

pub(crate) fn not_found(res: &mut Response) {
    res.status(StatusCode::NOT_FOUND).text(NOT_FOUND_BODY);
}

pub(crate) fn internal_error(err: &Error, res: &mut Response) {
    debug!(error = %err, "unhandled error, responding 500");
    res.status(StatusCode::INTERNAL_SERVER_ERROR)
        .bytes(ContentType::Json, INTERNAL_ERROR_BODY);
}
