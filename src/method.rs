//! HTTP method as a typed enum.
//!
//! Routes are registered against a [`Method`]; at dispatch time the route's
//! wire name is compared byte-for-byte with the request's method string.
//! Requests carrying a method outside this set simply match no route.

use std::fmt;

/// An RFC 9110 method a route can be registered for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Delete  => "DELETE",
            Self::Get     => "GET",
            Self::Head    => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch   => "PATCH",
            Self::Post    => "POST",
            Self::Put     => "PUT",
            Self::Trace   => "TRACE",
        }
    }

    /// Exact, case-sensitive comparison against a request method (RFC 9110 §9.1).
    pub(crate) fn matches(self, method: &str) -> bool {
        self.as_str() == method
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
