//! # switchyard
//!
//! A minimal HTTP request-dispatch engine. Given a request, it decides which
//! middleware run, in what order, which single route handler answers, and
//! where control goes when something fails.
//!
//! ## The model
//!
//! - **Routes**: `(method, pattern, handler)`, first registration-order match
//!   wins. Patterns are `/`-separated with `:name` captures; no wildcards.
//! - **Middleware**: run in registration order, each continuing explicitly
//!   through [`Next`]. Not continuing stops the request right there.
//! - **Mounted routers**: a child [`Router`] under a path prefix sees the path
//!   with the prefix stripped. The first matching mount claims the request.
//! - **Error chain**: [`Next::fail`] or a handler returning `Err` enters the
//!   current router's error handlers; unhandled errors become a fixed 500.
//!
//! The engine writes exactly two responses of its own: `404 Not Found` when no
//! route matches and `500 {"error":"Internal Server Error"}` when an error
//! goes unhandled.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use switchyard::{Router, Server, middleware};
//!
//! #[tokio::main]
//! async fn main() {
//!     // A mounted router runs its own middleware and error chain, so tracing
//!     // and error logging are registered where the routes live.
//!     let api = Router::new()
//!         .middleware(middleware::Trace)
//!         .get("/users/:id", |req, res| Box::pin(async move {
//!             let id = req.param("id").unwrap_or_default().to_owned();
//!             res.json(&serde_json::json!({ "user": { "id": id, "name": format!("User {id}") } }))
//!         }))
//!         .on_error(middleware::LogErrors);
//!
//!     let app = Router::new().nest_at("/api", api);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//! ```

mod chain;
mod error;
mod handler;
mod method;
mod path;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;

pub use chain::{ErrorNext, Next};
pub use error::Error;
pub use handler::{BoxFuture, ErrorHandler, Handler, Middleware};
pub use http::StatusCode;
pub use method::Method;
pub use path::{Params, Pattern, match_path};
pub use request::Request;
pub use response::{ContentType, Response};
pub use router::Router;
pub use server::Server;
