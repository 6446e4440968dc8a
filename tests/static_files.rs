//! Static file serving through `Router::serve_dir` and `middleware::ServeDir`.

use std::fs;
use std::path::PathBuf;

use switchyard::{Request, Response, Router, StatusCode, middleware};

/// A scratch directory that is removed when dropped.
struct Site(PathBuf);

impl Site {
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("switchyard-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("index.html"), "<h1>home</h1>").unwrap();
        fs::write(root.join("app.js"), "console.log('hi');").unwrap();
        fs::write(root.join("docs/index.html"), "<h1>docs</h1>").unwrap();
        Self(root)
    }
}

impl Drop for Site {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

async fn send(router: &Router, method: &str, uri: &str) -> Response {
    let mut req = Request::new(method, uri);
    let mut res = Response::new();
    router.handle(&mut req, &mut res).await;
    res
}

fn body(res: &Response) -> &str {
    std::str::from_utf8(res.body()).unwrap()
}

fn fallback() -> Router {
    Router::new().get("/static/:name", |_req, res| Box::pin(async move {
        res.text("route");
        Ok(())
    }))
}

#[tokio::test]
async fn serves_file_with_content_type_from_extension() {
    let site = Site::new("content-type");
    let app = Router::new().serve_dir("/static", &site.0);

    let res = send(&app, "GET", "/static/app.js").await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.header("content-type"), Some("application/javascript"));
    assert_eq!(body(&res), "console.log('hi');");
}

#[tokio::test]
async fn directory_paths_serve_index_html() {
    let site = Site::new("index");
    let app = Router::new().serve_dir("/static", &site.0);

    assert_eq!(body(&send(&app, "GET", "/static/").await), "<h1>home</h1>");
    assert_eq!(body(&send(&app, "GET", "/static").await), "<h1>home</h1>");
    assert_eq!(body(&send(&app, "GET", "/static/docs/").await), "<h1>docs</h1>");

    let res = send(&app, "GET", "/static/docs").await;
    assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
    assert_eq!(body(&res), "<h1>docs</h1>");
}

#[tokio::test]
async fn missing_file_continues_to_routes() {
    let site = Site::new("missing");
    let app = fallback().serve_dir("/static", &site.0);

    assert_eq!(body(&send(&app, "GET", "/static/nope.css").await), "route");
    assert_eq!(send(&app, "GET", "/static/nope/deeper").await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_get_requests_continue() {
    let site = Site::new("method");
    let app = Router::new()
        .serve_dir("/static", &site.0)
        .post("/static/app.js", |_req, res| Box::pin(async move {
            res.status(StatusCode::CREATED).end();
            Ok(())
        }));

    assert_eq!(send(&app, "POST", "/static/app.js").await.status_code(), StatusCode::CREATED);
    assert_eq!(send(&app, "HEAD", "/static/app.js").await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn parent_segments_never_leave_the_root() {
    let site = Site::new("traversal");
    let public = site.0.join("docs");
    let app = Router::new().serve_dir("/static", &public);

    let res = send(&app, "GET", "/static/../index.html").await;

    assert_eq!(res.status_code(), StatusCode::NOT_FOUND, "falls through instead of reading outside the root");
    assert_eq!(body(&res), "Not Found");
}

#[tokio::test]
async fn serve_dir_inside_a_mounted_router_sees_stripped_path() {
    let site = Site::new("mounted");
    let assets = Router::new().middleware(middleware::ServeDir::new(&site.0));
    let app = Router::new().nest_at("/assets", assets);

    let res = send(&app, "GET", "/assets/app.js").await;

    assert_eq!(res.header("content-type"), Some("application/javascript"));
    assert_eq!(send(&app, "GET", "/assets/gone.js").await.status_code(), StatusCode::NOT_FOUND);
}
