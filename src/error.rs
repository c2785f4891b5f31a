use hyper::{Method, StatusCode};
use std::path::PathBuf;
use thiserror::Error;

/// The boxed error type every route handler and middleware error is converted into.
///
/// Handlers may return any error type `E` with `E: Into<RouteError>`. The original error can be
/// recovered in an error handler by downcasting the source of [`Error::Handler`].
pub type RouteError = Box<dyn std::error::Error + Send + Sync>;

/// The error type used by this crate.
///
/// A request that simply matches no router or route is not an error: it is reported as
/// [`Outcome::Unmatched`](./enum.Outcome.html) and answered with `404 Not Found`.
#[derive(Debug, Error)]
pub enum Error {
    /// A route or router prefix could not be parsed at registration time.
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A router or application builder was used incorrectly.
    #[error("{0}")]
    Builder(String),

    /// The request method is not one of GET, POST, PUT or DELETE.
    #[error("unsupported request method: {0}")]
    UnsupportedMethod(Method),

    /// A middleware or route handler returned an error. The remaining chain was aborted.
    #[error("handler failed: {0}")]
    Handler(#[source] RouteError),

    /// The request body couldn't be read, or exceeded the configured limit.
    #[error("couldn't read the request body: {0}")]
    Body(#[source] RouteError),

    /// The request path is not valid percent encoded UTF-8.
    #[error("couldn't percent decode request path: {0}")]
    PathDecode(String),

    /// A value couldn't be serialized to JSON.
    #[error("couldn't serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A file couldn't be read while sending it as the response.
    #[error("couldn't read file {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn builder<M: Into<String>>(message: M) -> Error {
        Error::Builder(message.into())
    }

    pub(crate) fn invalid_pattern<P: Into<String>, R: Into<String>>(pattern: P, reason: R) -> Error {
        Error::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// The status code the default error handler answers this error with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            Error::Body(_) | Error::PathDecode(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Attempts to downcast the error returned by a handler into its concrete type.
    pub fn handler_error<T: std::error::Error + 'static>(&self) -> Option<&T> {
        match self {
            Error::Handler(source) => source.downcast_ref::<T>(),
            _ => None,
        }
    }
}
