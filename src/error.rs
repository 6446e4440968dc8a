//! Unified error type.

use std::error::Error as StdError;
use std::fmt;
use std::net::AddrParseError;

/// The error type returned by switchyard's fallible operations.
///
/// Two families of failure share this type. Infrastructure failures (binding a
/// port, accepting a connection, a malformed bind address) come back from
/// [`Server::serve`](crate::Server::serve). Application failures are what a
/// route handler returns as `Err` or what a middleware hands to
/// [`Next::fail`](crate::Next::fail); those are routed into the router's error
/// chain and never reach the client verbatim.
#[derive(Debug)]
pub enum Error {
    /// Listener or connection I/O failed.
    Io(std::io::Error),
    /// The bind address is not a valid `host:port`.
    Addr(AddrParseError),
    /// JSON encoding of a response or decoding of a request body failed.
    Json(serde_json::Error),
    /// An error raised by application code.
    App(Box<dyn StdError + Send + Sync + 'static>),
}

impl Error {
    /// Wraps any application error, or a plain message.
    ///
    /// ```rust
    /// use switchyard::Error;
    ///
    /// let err = Error::new("Test error");
    /// assert_eq!(err.to_string(), "Test error");
    /// ```
    pub fn new(err: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self::App(err.into())
    }

    /// Returns the application error as `T`, if that is what it holds.
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        match self {
            Self::App(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e)   => write!(f, "io: {e}"),
            Self::Addr(e) => write!(f, "invalid address: {e}"),
            Self::Json(e) => write!(f, "json: {e}"),
            Self::App(e)  => write!(f, "{e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(e)   => Some(e),
            Self::Addr(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::App(e)  => Some(e.as_ref()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<AddrParseError> for Error {
    fn from(e: AddrParseError) -> Self {
        Self::Addr(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Self::new(msg)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Self::new(msg)
    }
}
