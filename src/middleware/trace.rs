//! Request tracing and error logging.

use std::time::{Duration, Instant};

use tracing::{Instrument, error, info, info_span};

use crate::chain::{ErrorNext, Next};
use crate::error::Error;
use crate::handler::{BoxFuture, ErrorHandler, Middleware};
use crate::request::Request;
use crate::response::Response;

/// Opens a `request` span carrying method and path, runs the rest of the
/// chain inside it, then logs status and latency.
///
/// Register it first so the span covers every later middleware of the same
/// router, the route handler and the error chain. Requests claimed by a
/// mounted router skip the parent's middleware, so register `Trace` on the
/// router that owns the routes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Middleware for Trace {
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response, next: Next<'a>) -> BoxFuture<'a> {
        let span = info_span!("request", method = %req.method(), path = %req.path());

        Box::pin(
            async move {
                let start = Instant::now();
                next.run(req, res).await;
                let latency_us = micros(start.elapsed());

                if res.is_sent() {
                    info!(status = res.status_code().as_u16(), latency_us, "request completed");
                } else {
                    info!(latency_us, "request stopped without a response");
                }
            }
            .instrument(span),
        )
    }
}

/// Whole microseconds, saturating at `u64::MAX`.
fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

/// Logs each error with the request it failed, then hands it to the next
/// error handler (or the default 500). Error detail stays in the logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogErrors;

impl ErrorHandler for LogErrors {
    fn call<'a>(
        &'a self,
        err: Error,
        req: &'a mut Request,
        res: &'a mut Response,
        next: ErrorNext<'a>,
    ) -> BoxFuture<'a> {
        error!(method = %req.method(), path = %req.path(), ip = %req.ip(), "request failed: {err}");
        next.fail(err, req, res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_saturates_instead_of_wrapping() {
        assert_eq!(micros(Duration::from_millis(3)), 3_000);
        assert_eq!(micros(Duration::MAX), u64::MAX);
    }
}
