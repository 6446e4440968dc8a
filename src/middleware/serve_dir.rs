//! Static files from a directory.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::chain::Next;
use crate::handler::{BoxFuture, Middleware};
use crate::request::Request;
use crate::response::Response;

/// Serves `GET` requests from files under a root directory.
///
/// The path the current router sees is mapped onto `root`. A path ending in
/// `/`, or one that names a directory, serves that directory's `index.html`.
/// Anything that is not a readable file (missing files, other methods, `..`
/// segments) continues down the chain, so routes registered after it still
/// answer.
///
/// `middleware_at` does not strip its prefix, so give the same prefix to
/// [`with_prefix`](ServeDir::with_prefix), or use
/// [`Router::serve_dir`](crate::Router::serve_dir) which does both:
///
/// ```rust
/// use switchyard::{Router, middleware::ServeDir};
///
/// let app = Router::new()
///     .middleware_at("/static", ServeDir::new("./public").with_prefix("/static"));
/// ```
#[derive(Clone, Debug)]
pub struct ServeDir {
    root: PathBuf,
    prefix: String,
}

impl ServeDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), prefix: String::new() }
    }

    /// Strip `prefix` from the path before mapping it onto the root.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_owned();
        self
    }

    /// Maps a router-relative path onto the root, rejecting anything that
    /// could leave it.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = path.strip_prefix(self.prefix.as_str())?;

        let mut file = self.root.clone();
        for component in Path::new(relative.trim_start_matches('/')).components() {
            match component {
                Component::Normal(segment) => file.push(segment),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if relative.is_empty() || relative.ends_with('/') {
            file.push("index.html");
        }
        Some(file)
    }

    /// The file to send for `path`, if there is one.
    async fn locate(&self, path: &str) -> Option<PathBuf> {
        let mut file = self.resolve(path)?;
        let mut meta = tokio::fs::metadata(&file).await.ok()?;
        if meta.is_dir() {
            file.push("index.html");
            meta = tokio::fs::metadata(&file).await.ok()?;
        }
        meta.is_file().then_some(file)
    }
}

impl Middleware for ServeDir {
    fn call<'a>(&'a self, req: &'a mut Request, res: &'a mut Response, next: Next<'a>) -> BoxFuture<'a> {
        Box::pin(async move {
            if req.method() != "GET" {
                return next.run(req, res).await;
            }
            let Some(file) = self.locate(next.path()).await else {
                return next.run(req, res).await;
            };

            match res.file(&file).await {
                Ok(()) => debug!(file = %file.display(), "served static file"),
                Err(err) => {
                    warn!(file = %file.display(), "static file unreadable: {err}");
                    next.run(req, res).await
                }
            }
        })
    }
}
