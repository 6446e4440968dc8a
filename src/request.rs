//! Incoming HTTP request type.

use std::net::SocketAddr;

use bytes::Bytes;
use http::Extensions;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Error;
use crate::path::Params;

/// An incoming HTTP request.
///
/// The dispatch engine reads only [`method`](Request::method) and
/// [`path`](Request::path), and writes [`params`](Request::params) when a
/// route matches. Everything else is for handlers and middleware. Use
/// [`extensions_mut`](Request::extensions_mut) to hand typed values from a
/// middleware to whatever runs after it.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: Params,
    pub(crate) remote_addr: Option<SocketAddr>,
    pub(crate) extensions: Extensions,
}

impl Request {
    /// Builds a request from a method and a request-target such as
    /// `/search?q=rust`. The path is kept exactly as given (no decoding);
    /// an empty path becomes `/`.
    pub fn new(method: impl Into<String>, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, parse_pairs(query.as_bytes())),
            None => (uri, Vec::new()),
        };
        let path = if path.is_empty() { "/" } else { path };

        Self {
            method: method.into(),
            path: path.to_owned(),
            query,
            headers: Vec::new(),
            body: Bytes::new(),
            params: Params::new(),
            remote_addr: None,
            extensions: Extensions::new(),
        }
    }

    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes, remote_addr: SocketAddr) -> Self {
        let target = parts
            .uri
            .path_and_query()
            .map_or("/", |pq| pq.as_str());

        let mut req = Self::new(parts.method.as_str(), target);
        req.headers = parts
            .headers
            .iter()
            .map(|(name, value)| {
                let value = match value.to_str() {
                    Ok(v) => v.to_owned(),
                    Err(_) => {
                        debug!(header = %name, "non-UTF-8 header value, decoded lossily");
                        String::from_utf8_lossy(value.as_bytes()).into_owned()
                    }
                };
                (name.as_str().to_owned(), value)
            })
            .collect();
        req.body = body;
        req.remote_addr = Some(remote_addr);
        req.extensions = parts.extensions;
        req
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    pub fn method(&self) -> &str { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn params(&self) -> &Params { &self.params }
    pub fn extensions(&self) -> &Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the first query-string value for `key`, percent-decoded.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Client address: the socket peer, else the first `x-forwarded-for`
    /// entry, else loopback.
    pub fn ip(&self) -> String {
        if let Some(addr) = self.remote_addr {
            return addr.ip().to_string();
        }
        self.header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("127.0.0.1")
            .to_owned()
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decodes an `application/x-www-form-urlencoded` body.
    pub fn form(&self) -> Vec<(String, String)> {
        parse_pairs(&self.body)
    }
}

fn parse_pairs(input: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_path_and_query() {
        let req = Request::new("GET", "/search?q=rust+lang&page=2&q=again");
        assert_eq!(req.path(), "/search");
        assert_eq!(req.query("q"), Some("rust lang"));
        assert_eq!(req.query("page"), Some("2"));
        assert_eq!(req.query("missing"), None);
        assert_eq!(req.query_pairs().len(), 3);
    }

    #[test]
    fn path_is_not_decoded() {
        let req = Request::new("GET", "/files/a%20b");
        assert_eq!(req.path(), "/files/a%20b");
    }

    #[test]
    fn empty_target_becomes_root() {
        assert_eq!(Request::new("GET", "").path(), "/");
        assert_eq!(Request::new("GET", "?x=1").path(), "/");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new("GET", "/").with_header("Content-Type", "text/plain");
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn ip_prefers_socket_then_forwarded_header() {
        let req = Request::new("GET", "/").with_header("x-forwarded-for", " 10.0.0.7 , 10.0.0.1");
        assert_eq!(req.ip(), "10.0.0.7");

        let req = req.with_remote_addr("192.168.1.5:4000".parse().unwrap());
        assert_eq!(req.ip(), "192.168.1.5");

        assert_eq!(Request::new("GET", "/").ip(), "127.0.0.1");
    }

    #[test]
    fn builds_from_http_parts() {
        let (parts, ()) = http::Request::builder()
            .method("PATCH")
            .uri("http://example.com/users/7?fields=name")
            .header("X-Request-Id", "abc")
            .body(())
            .unwrap()
            .into_parts();

        let req = Request::from_parts(parts, Bytes::from_static(b"{}"), "10.1.1.1:5555".parse().unwrap());

        assert_eq!(req.method(), "PATCH");
        assert_eq!(req.path(), "/users/7");
        assert_eq!(req.query("fields"), Some("name"));
        assert_eq!(req.header("x-request-id"), Some("abc"));
        assert_eq!(req.body(), b"{}");
        assert_eq!(req.ip(), "10.1.1.1");
        assert!(req.params().is_empty());
    }

    #[test]
    fn non_utf8_header_values_are_kept_lossily() {
        let (parts, ()) = http::Request::builder()
            .uri("/")
            .header("x-name", http::HeaderValue::from_bytes(b"caf\xe9").unwrap())
            .header("x-plain", "ok")
            .body(())
            .unwrap()
            .into_parts();

        let req = Request::from_parts(parts, Bytes::new(), "10.1.1.1:5555".parse().unwrap());

        assert_eq!(req.header("x-name"), Some("caf\u{FFFD}"));
        assert_eq!(req.header("x-plain"), Some("ok"));
        assert_eq!(req.headers().len(), 2);
    }

    #[test]
    fn decodes_json_and_form_bodies() {
        #[derive(serde::Deserialize)]
        struct NewUser {
            name: String,
        }

        let req = Request::new("POST", "/users").with_body(r#"{"name":"alice"}"#);
        let user: NewUser = req.json().unwrap();
        assert_eq!(user.name, "alice");

        let req = Request::new("POST", "/users").with_body("name=bob&role=admin%21");
        assert_eq!(
            req.form(),
            vec![("name".to_owned(), "bob".to_owned()), ("role".to_owned(), "admin!".to_owned())]
        );

        let req = Request::new("POST", "/users").with_body("not json");
        assert!(matches!(req.json::<NewUser>(), Err(Error::Json(_))));
    }
}
