//! Route patterns and segment-wise path matching.
//!
//! A pattern is split on `/` once, at registration. A request path matches
//! when it has exactly as many segments and every literal segment is equal.
//! `:name` segments capture the raw request segment (no percent-decoding).
//!
//! ```text
//! pattern  ""  "users"  ":id"
//! path     ""  "users"  "42"     → { id: "42" }
//! path     ""  "users"           → no match (segment count)
//! ```

use std::collections::HashMap;

/// Named path parameters extracted by a successful match.
pub type Params = HashMap<String, String>;

const PARAM_MARKER: char = ':';

#[derive(Clone, Debug, Eq, PartialEq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed route pattern such as `/users/:id/posts`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .map(|seg| match seg.strip_prefix(PARAM_MARKER) {
                Some(name) => Segment::Param(name.to_owned()),
                None => Segment::Literal(seg.to_owned()),
            })
            .collect();
        Self { raw: pattern.to_owned(), segments }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Matches `path` against this pattern, returning the captured parameters.
    pub fn matches(&self, path: &str) -> Option<Params> {
        if path.split('/').count() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(path.split('/')) {
            match segment {
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_owned());
                }
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
            }
        }
        Some(params)
    }
}

/// One-shot convenience over [`Pattern::parse`] + [`Pattern::matches`].
pub fn match_path(pattern: &str, path: &str) -> Option<Params> {
    Pattern::parse(pattern).matches(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_matches_exactly() {
        assert_eq!(match_path("/users", "/users"), Some(Params::new()));
        assert_eq!(match_path("/", "/"), Some(Params::new()));
        assert!(match_path("/users", "/Users").is_none());
        assert!(match_path("/users", "/posts").is_none());
    }

    #[test]
    fn params_bind_raw_segments() {
        let params = match_path("/users/:id/posts/:post", "/users/42/posts/a%20b").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params["id"], "42");
        assert_eq!(params["post"], "a%20b");
    }

    #[test]
    fn segment_count_mismatch_never_matches() {
        assert!(match_path("/users/:id", "/users").is_none());
        assert!(match_path("/users/:id", "/users/1/extra").is_none());
    }

    #[test]
    fn trailing_slash_is_significant() {
        assert!(match_path("/users", "/users/").is_none());
        // `/users/` has an empty final segment, which a parameter will capture.
        let params = match_path("/users/:id", "/users/").unwrap();
        assert_eq!(params["id"], "");
    }

    #[test]
    fn repeated_name_keeps_last_segment() {
        let params = match_path("/:a/:a", "/x/y").unwrap();
        assert_eq!(params["a"], "y");
    }

    #[test]
    fn parsed_pattern_is_reusable() {
        let pattern = Pattern::parse("/items/:sku");
        assert_eq!(pattern.as_str(), "/items/:sku");
        assert_eq!(pattern.matches("/items/A1").unwrap()["sku"], "A1");
        assert_eq!(pattern.matches("/items/B2").unwrap()["sku"], "B2");
    }
}
