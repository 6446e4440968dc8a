//! Outgoing HTTP response.
//!
//! Unlike a value returned from a handler, a [`Response`] here is a slot that
//! middleware and handlers write into while the request is being dispatched.
//! It is sent at most once: the first terminating call (`send`, `text`,
//! `json`, `bytes`, `end`, `redirect`) fixes status, headers and body, and
//! anything written afterwards is dropped with a warning.

use std::path::Path;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use tracing::{error, warn};

use crate::error::Error;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for use with [`Response::bytes`].
pub enum ContentType {
    Css,          // text/css
    Csv,          // text/csv
    EventStream,  // text/event-stream  (SSE)
    FormData,     // application/x-www-form-urlencoded
    Gif,          // image/gif
    Html,         // text/html; charset=utf-8
    Jpeg,         // image/jpeg
    JavaScript,   // application/javascript
    Json,         // application/json
    OctetStream,  // application/octet-stream
    Png,          // image/png
    Svg,          // image/svg+xml
    Text,         // text/plain; charset=utf-8
    Xml,          // application/xml
}

impl ContentType {
    /// Picks a content type from a file extension (case-insensitive).
    /// Unknown or missing extensions are `OctetStream`.
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        match ext.to_ascii_lowercase().as_str() {
            "css"          => Self::Css,
            "csv"          => Self::Csv,
            "gif"          => Self::Gif,
            "htm" | "html" => Self::Html,
            "jpg" | "jpeg" => Self::Jpeg,
            "js" | "mjs"   => Self::JavaScript,
            "json"         => Self::Json,
            "png"          => Self::Png,
            "svg"          => Self::Svg,
            "txt"          => Self::Text,
            "xml"          => Self::Xml,
            _              => Self::OctetStream,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Css         => "text/css",
            Self::Csv         => "text/csv",
            Self::EventStream => "text/event-stream",
            Self::FormData    => "application/x-www-form-urlencoded",
            Self::Gif         => "image/gif",
            Self::Html        => "text/html; charset=utf-8",
            Self::Jpeg        => "image/jpeg",
            Self::JavaScript  => "application/javascript",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Png         => "image/png",
            Self::Svg         => "image/svg+xml",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Xml         => "application/xml",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response, written in place by middleware and handlers.
///
/// ```rust
/// use switchyard::{Response, StatusCode};
///
/// let mut res = Response::new();
/// res.status(StatusCode::CREATED)
///    .set("location", "/users/42")
///    .json(&serde_json::json!({ "id": 42 }))
///    .unwrap();
///
/// assert!(res.is_sent());
/// assert_eq!(res.body(), br#"{"id":42}"#);
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Bytes,
    sent: bool,
}

impl Response {
    /// An unsent `200 OK` with no headers and no body.
    pub fn new() -> Self {
        Self { status: StatusCode::OK, headers: Vec::new(), body: Bytes::new(), sent: false }
    }

    /// Sets the status for the eventual send.
    pub fn status(&mut self, code: StatusCode) -> &mut Self {
        if self.guard("status") {
            self.status = code;
        }
        self
    }

    /// Sets a header, replacing any existing value of the same name.
    pub fn set(&mut self, name: &str, value: &str) -> &mut Self {
        if self.guard("header") {
            self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            self.headers.push((name.to_owned(), value.to_owned()));
        }
        self
    }

    /// Sends `body` as-is with whatever headers have been set.
    pub fn send(&mut self, body: impl Into<Bytes>) {
        if self.guard("body") {
            self.body = body.into();
            self.sent = true;
        }
    }

    /// Sends a `text/plain; charset=utf-8` body.
    pub fn text(&mut self, body: impl Into<String>) {
        self.bytes(ContentType::Text, body.into())
    }

    /// Serializes `value` and sends it as `application/json`.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        let body = serde_json::to_vec(value)?;
        self.bytes(ContentType::Json, body);
        Ok(())
    }

    /// Sends `body` with the given content type.
    pub fn bytes(&mut self, content_type: ContentType, body: impl Into<Bytes>) {
        self.set("content-type", content_type.as_str()).send(body)
    }

    /// Sends with no body (e.g. after `status(StatusCode::NO_CONTENT)`).
    pub fn end(&mut self) {
        self.send(Bytes::new())
    }

    /// Reads the file at `path` and sends it, with the content type picked
    /// from its extension.
    ///
    /// A read failure returns [`Error::Io`] and leaves the response unsent.
    pub async fn file(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await?;
        self.bytes(ContentType::from_path(path), contents);
        Ok(())
    }

    /// `302 Found` pointing at `location`.
    pub fn redirect(&mut self, location: &str) {
        self.status(StatusCode::FOUND).set("location", location).end()
    }

    pub fn is_sent(&self) -> bool { self.sent }
    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder.body(Full::new(self.body)).unwrap_or_else(|e| {
            error!("invalid response header: {e}");
            let mut res = http::Response::new(Full::new(Bytes::new()));
            *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            res
        })
    }

    fn guard(&self, what: &str) -> bool {
        if self.sent {
            warn!(what, status = self.status.as_u16(), "response already sent, write ignored");
        }
        !self.sent
    }
}

impl Default for Response {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_response_is_unsent_ok() {
        let res = Response::new();
        assert!(!res.is_sent());
        assert_eq!(res.status_code(), StatusCode::OK);
        assert!(res.body().is_empty());
    }

    #[test]
    fn text_sets_content_type() {
        let mut res = Response::new();
        res.status(StatusCode::NOT_FOUND).text("Not Found");
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(res.header("Content-Type"), Some("text/plain; charset=utf-8"));
        assert_eq!(res.body(), b"Not Found");
    }

    #[test]
    fn first_send_wins() {
        let mut res = Response::new();
        res.status(StatusCode::CREATED).send("first");
        res.status(StatusCode::INTERNAL_SERVER_ERROR).send("second");
        assert_eq!(res.status_code(), StatusCode::CREATED);
        assert_eq!(res.body(), b"first");
    }

    #[test]
    fn set_replaces_header() {
        let mut res = Response::new();
        res.set("X-Id", "1").set("x-id", "2").end();
        assert_eq!(res.headers().len(), 1);
        assert_eq!(res.header("x-id"), Some("2"));
    }

    #[test]
    fn redirect_is_302_with_location() {
        let mut res = Response::new();
        res.redirect("/api/users");
        assert_eq!(res.status_code(), StatusCode::FOUND);
        assert_eq!(res.header("location"), Some("/api/users"));
        assert!(res.is_sent());
    }

    #[test]
    fn converts_into_http_response() {
        let mut res = Response::new();
        res.status(StatusCode::ACCEPTED).json(&serde_json::json!({ "ok": true })).unwrap();
        let http = res.into_http();
        assert_eq!(http.status(), StatusCode::ACCEPTED);
        assert_eq!(http.headers()["content-type"], "application/json");
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(ContentType::from_path(Path::new("site/index.HTML")).as_str(), "text/html; charset=utf-8");
        assert_eq!(ContentType::from_path(Path::new("app.js")).as_str(), "application/javascript");
        assert_eq!(ContentType::from_path(Path::new("logo.svg")).as_str(), "image/svg+xml");
        assert_eq!(ContentType::from_path(Path::new("photo.jpeg")).as_str(), "image/jpeg");
        assert_eq!(ContentType::from_path(Path::new("archive.tar.gz")).as_str(), "application/octet-stream");
        assert_eq!(ContentType::from_path(Path::new("Makefile")).as_str(), "application/octet-stream");
    }

    #[tokio::test]
    async fn file_sends_contents_with_content_type() {
        let dir = std::env::temp_dir().join(format!("switchyard-response-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("style.css");
        std::fs::write(&path, "body { margin: 0 }").unwrap();

        let mut res = Response::new();
        res.file(&path).await.unwrap();

        assert!(res.is_sent());
        assert_eq!(res.header("content-type"), Some("text/css"));
        assert_eq!(res.body(), b"body { margin: 0 }");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_io_error_and_leaves_response_unsent() {
        let mut res = Response::new();
        let err = res.file("/definitely/not/here.txt").await.unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert!(!res.is_sent());
    }
}
