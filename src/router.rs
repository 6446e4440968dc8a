//! Request router: route table, middleware chain, mounted routers and error
//! chain.
//!
//! Everything is a linear scan in registration order and the first match
//! wins, for mounts and routes alike. Build the tree once at startup; it is
//! read-only while serving and shared across requests behind an `Arc`.
//!
//! Dispatch for one router, given the path it sees:
//!
//! ```text
//! mounts  ──prefix match──▶  child.dispatch(path minus prefix)   (first wins, stop)
//!    │ none
//!    ▼
//! middleware whose prefix matches, in order ──Next::run──▶ … ──▶ route lookup
//!    │ Next::fail / handler Err                                    │ no route
//!    ▼                                                             ▼
//! error chain ──ErrorNext::fail──▶ … ──▶ 500                      404
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::chain::{self, ErrorNext, Next};
use crate::error::Error;
use crate::handler::{BoxFuture, BoxedHandler, ErrorHandler, Handler, Middleware};
use crate::method::Method;
use crate::middleware::ServeDir;
use crate::path::{Params, Pattern};
use crate::request::Request;
use crate::response::Response;

struct Route {
    method: Method,
    pattern: Pattern,
    handler: BoxedHandler,
}

pub(crate) struct MiddlewareEntry {
    prefix: Option<String>,
    pub(crate) middleware: Box<dyn Middleware>,
}

impl MiddlewareEntry {
    fn applies_to(&self, path: &str) -> bool {
        self.prefix.as_deref().is_none_or(|prefix| path.starts_with(prefix))
    }
}

struct Mount {
    prefix: String,
    router: Router,
}

/// The application router.
///
/// Each registration call consumes and returns `self` so registrations chain
/// naturally:
///
/// ```rust
/// use switchyard::{Router, middleware};
///
/// let api = Router::new()
///     .middleware(middleware::Trace)
///     .get("/users", |_req, res| Box::pin(async move {
///         res.json(&serde_json::json!({ "users": ["Alice", "Bob", "Charlie"] }))
///     }))
///     .get("/users/:id", |req, res| Box::pin(async move {
///         let id = req.param("id").unwrap_or_default().to_owned();
///         res.json(&serde_json::json!({ "user": { "id": id, "name": format!("User {id}") } }))
///     }))
///     .on_error(middleware::LogErrors);
///
/// let app = Router::new().nest_at("/api", api);
/// ```
pub struct Router {
    routes: Vec<Route>,
    middleware: Vec<MiddlewareEntry>,
    mounts: Vec<Mount>,
    error_handlers: Vec<Arc<dyn ErrorHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            middleware: Vec::new(),
            mounts: Vec::new(),
            error_handlers: Vec::new(),
        }
    }

    // ── Routes ────────────────────────────────────────────────────────────────

    /// Register a closure for a method + pattern pair.
    ///
    /// Patterns are `/`-separated; a `:name` segment captures the matching
    /// request segment, available as `req.param("name")`.
    pub fn on<F>(self, method: Method, pattern: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, Result<(), Error>>
            + Send
            + Sync
            + 'static,
    {
        self.route(method, pattern, handler)
    }

    /// Register any [`Handler`] implementation for a method + pattern pair.
    pub fn route(mut self, method: Method, pattern: &str, handler: impl Handler) -> Self {
        self.routes.push(Route {
            method,
            pattern: Pattern::parse(pattern),
            handler: Arc::new(handler),
        });
        self
    }

    pub fn get<F>(self, pattern: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, Result<(), Error>>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Get, pattern, handler)
    }

    pub fn post<F>(self, pattern: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, Result<(), Error>>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Post, pattern, handler)
    }

    pub fn put<F>(self, pattern: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, Result<(), Error>>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Put, pattern, handler)
    }

    pub fn delete<F>(self, pattern: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, Result<(), Error>>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Delete, pattern, handler)
    }

    pub fn patch<F>(self, pattern: &str, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, Result<(), Error>>
            + Send
            + Sync
            + 'static,
    {
        self.route(Method::Patch, pattern, handler)
    }

    // ── Middleware, mounts, error handlers ────────────────────────────────────

    /// Middleware that runs for every path this router dispatches.
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(MiddlewareEntry { prefix: None, middleware: Box::new(middleware) });
        self
    }

    /// Middleware that runs when the path starts with `prefix`.
    ///
    /// This is a plain string prefix test: `/admin` also covers `/administer`.
    pub fn middleware_at(mut self, prefix: &str, middleware: impl Middleware) -> Self {
        self.middleware.push(MiddlewareEntry {
            prefix: Some(prefix.to_owned()),
            middleware: Box::new(middleware),
        });
        self
    }

    /// Serve files under `root` for `GET` requests whose path starts with
    /// `prefix` (`/static/app.js` → `root/app.js`). Requests without a
    /// matching file continue to the rest of the chain.
    pub fn serve_dir(self, prefix: &str, root: impl Into<PathBuf>) -> Self {
        self.middleware_at(prefix, ServeDir::new(root).with_prefix(prefix))
    }

    /// Mount `router` with no prefix: it claims every request that reaches
    /// this router, ahead of this router's own middleware and routes.
    pub fn nest(self, router: Router) -> Self {
        self.nest_at("", router)
    }

    /// Mount `router` under `prefix`. Matching requests are dispatched by the
    /// child with the prefix removed (`/api/users` → `/users`, `/api` → `/`).
    ///
    /// Like [`middleware_at`](Router::middleware_at) this is a plain prefix
    /// test, so `/api` also claims `/apiv2/users` (as `v2/users`).
    ///
    /// A claimed request never reaches this router's own middleware, routes or
    /// error handlers; register those on the child as well if it needs them.
    pub fn nest_at(mut self, prefix: &str, router: Router) -> Self {
        self.mounts.push(Mount { prefix: prefix.to_owned(), router });
        self
    }

    /// Append an error handler to this router's error chain.
    ///
    /// Only failures raised by this router's own middleware and routes get
    /// here. Requests claimed by a mounted router fail into the child's chain
    /// (or its default 500), never the parent's.
    pub fn on_error(mut self, handler: impl ErrorHandler) -> Self {
        self.error_handlers.push(Arc::new(handler));
        self
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    /// Dispatch one request.
    ///
    /// Resolves when the chain has finished: a response was written, a
    /// middleware stopped without continuing, or an error handler resolved.
    /// `req.path()` is never modified; mounted routers see a stripped copy.
    pub async fn handle(&self, req: &mut Request, res: &mut Response) {
        let path = req.path().to_owned();
        self.dispatch(&path, req, res).await
    }

    fn dispatch<'a>(&'a self, path: &'a str, req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a> {
        for mount in &self.mounts {
            if let Some(rest) = path.strip_prefix(mount.prefix.as_str()) {
                let rest = if rest.is_empty() { "/" } else { rest };
                trace!(prefix = %mount.prefix, path, rest, "entering mounted router");
                return mount.router.dispatch(rest, req, res);
            }
        }

        let chain: Vec<&MiddlewareEntry> = self
            .middleware
            .iter()
            .filter(|entry| entry.applies_to(path))
            .collect();

        Box::pin(async move { Next::new(self, path, &chain).run(req, res).await })
    }

    /// Final stage of the middleware chain: route lookup and the handler call.
    pub(crate) fn dispatch_route<'a>(
        &'a self,
        path: &'a str,
        req: &'a mut Request,
        res: &'a mut Response,
    ) -> BoxFuture<'a> {
        let Some((route, params)) = self.lookup(req.method(), path) else {
            debug!(method = %req.method(), path, "no route matched");
            chain::not_found(res);
            return Box::pin(std::future::ready(()));
        };

        trace!(method = %route.method, pattern = route.pattern.as_str(), path, "route matched");
        req.params = params;

        Box::pin(async move {
            if let Err(err) = route.handler.call(req, res).await {
                debug!(pattern = route.pattern.as_str(), error = %err, "route handler failed");
                self.handle_error(err, req, res).await;
            }
        })
    }

    /// Enter this router's error chain. A router without error handlers
    /// answers with the default 500 itself; errors never reach the parent.
    pub(crate) fn handle_error<'a>(&'a self, err: Error, req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a> {
        ErrorNext::new(&self.error_handlers).fail(err, req, res)
    }

    fn lookup(&self, method: &str, path: &str) -> Option<(&Route, Params)> {
        self.routes
            .iter()
            .filter(|route| route.method.matches(method))
            .find_map(|route| route.pattern.matches(path).map(|params| (route, params)))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Label(&'static str);

    impl Handler for Label {
        fn call<'a>(&'a self, _req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, Result<(), Error>> {
            Box::pin(async move {
                res.text(self.0);
                Ok(())
            })
        }
    }

    #[test]
    fn lookup_is_first_match_in_registration_order() {
        let router = Router::new()
            .route(Method::Get, "/users/:id", Label("param"))
            .route(Method::Get, "/users/me", Label("literal"))
            .route(Method::Post, "/users/me", Label("post"));

        let (route, params) = router.lookup("GET", "/users/me").unwrap();
        assert_eq!(route.pattern.as_str(), "/users/:id");
        assert_eq!(params["id"], "me");

        let (route, _) = router.lookup("POST", "/users/me").unwrap();
        assert_eq!(route.method, Method::Post);

        assert!(router.lookup("DELETE", "/users/me").is_none());
        assert!(router.lookup("GET", "/users").is_none());
    }

    #[test]
    fn middleware_prefix_is_a_plain_string_prefix() {
        struct Noop;
        impl Middleware for Noop {
            fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response, next: Next<'a>) -> BoxFuture<'a> {
                next.run(req, res)
            }
        }

        let global = MiddlewareEntry { prefix: None, middleware: Box::new(Noop) };
        let scoped = MiddlewareEntry { prefix: Some("/admin".to_owned()), middleware: Box::new(Noop) };

        assert!(global.applies_to("/anything"));
        assert!(scoped.applies_to("/admin"));
        assert!(scoped.applies_to("/admin/users"));
        assert!(scoped.applies_to("/administer"));
        assert!(!scoped.applies_to("/users"));
    }
}
