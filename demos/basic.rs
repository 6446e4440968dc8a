//! switchyard example: global middleware, a mounted API router, static
//! files, a failing route and application error handling.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3002/api/users
//!   curl http://localhost:3002/api/users/42
//!   curl -X POST http://localhost:3002/api/users \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"alice"}'
//!   curl -i http://localhost:3002/redirect
//!   curl -i http://localhost:3002/error
//!   curl -i http://localhost:3002/static/   (serves ./public/index.html if present)

use serde_json::json;
use switchyard::{BoxFuture, Error, ErrorNext, Request, Response, Router, Server, StatusCode, middleware};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Mounted routers run only their own middleware and error handlers, so
    // the API gets tracing and error handling of its own.
    let api = Router::new()
        .middleware(middleware::Trace)
        .middleware(middleware::from_fn(|req, res, next| {
            tracing::debug!("api middleware");
            next.run(req, res)
        }))
        .get("/users", |_req, res| Box::pin(async move {
            res.json(&json!({ "users": ["Alice", "Bob", "Charlie"] }))
        }))
        .get("/users/:id", |req, res| Box::pin(async move {
            let id = req.param("id").unwrap_or_default().to_owned();
            res.json(&json!({ "user": { "id": id, "name": format!("User {id}") } }))
        }))
        .post("/users", |req, res| Box::pin(async move {
            let body: serde_json::Value = req.json()?;
            res.status(StatusCode::CREATED).json(&json!({ "message": "User created", "data": body }))
        }))
        .put("/users/:id", |req, res| Box::pin(async move {
            let id = req.param("id").unwrap_or_default().to_owned();
            let body: serde_json::Value = req.json()?;
            res.json(&json!({ "message": format!("User {id} updated"), "data": body }))
        }))
        .delete("/users/:id", |_req, res| Box::pin(async move {
            res.status(StatusCode::NO_CONTENT).end();
            Ok(())
        }))
        .on_error(middleware::LogErrors)
        .on_error(middleware::from_error_fn(something_went_wrong));

    let app = Router::new()
        .middleware(middleware::Trace)
        .on_error(middleware::LogErrors)
        .on_error(middleware::from_error_fn(something_went_wrong))
        .nest_at("/api", api)
        .serve_dir("/static", "./public")
        .get("/redirect", |_req, res| Box::pin(async move {
            res.redirect("/api/users");
            Ok(())
        }))
        .middleware_at("/error", middleware::from_fn(|req, res, next| {
            next.fail(Error::new("Test error"), req, res)
        }));

    if let Err(e) = Server::bind("0.0.0.0:3002").serve(app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

fn something_went_wrong<'a>(
    _err: Error,
    _req: &'a mut Request,
    res: &'a mut Response,
    _next: ErrorNext<'a>,
) -> BoxFuture<'a> {
    Box::pin(async move {
        res.status(StatusCode::INTERNAL_SERVER_ERROR)
            .json(&json!({ "error": "Something went wrong!" }))
            .ok();
    })
}
