//! Error types for sequence pulling and draining.

use std::sync::Arc;

/// The main error type for sync and async sequences.
///
/// Errors are never caught by the combinators; they travel out of whichever
/// pull or terminal operation was draining the chain when they occurred.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A raw source failed to produce its next element
    #[error("Upstream error: {0}")]
    Upstream(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// A caller-supplied function (map, filter, reduce, ...) failed
    #[error("Callback error: {0}")]
    Callback(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// A custom error with a message
    #[error("{0}")]
    Custom(String),
}

// Convenience constructors
impl Error {
    /// Create an upstream error from any error type
    pub fn upstream<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Error::Upstream(Arc::new(error))
    }

    /// Create a callback error from any error type
    pub fn callback<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Error::Callback(Arc::new(error))
    }

    /// Create a custom error with a message
    pub fn custom<S: Into<String>>(message: S) -> Self {
        Error::Custom(message.into())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Error {
    fn from(e: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Error::Callback(Arc::from(e))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Custom(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Custom(s.to_string())
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Helper trait for converting foreign errors into our Error type
pub trait IntoError<T> {
    fn into_upstream_error(self) -> Result<T>;
    fn into_callback_error(self) -> Result<T>;
}

impl<T, E> IntoError<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_upstream_error(self) -> Result<T> {
        self.map_err(Error::upstream)
    }

    fn into_callback_error(self) -> Result<T> {
        self.map_err(Error::callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = Error::upstream(io);
        assert_eq!(err.to_string(), "Upstream error: disk gone");
        assert!(err.source().is_some());

        let err = Error::custom("plain");
        assert_eq!(err.to_string(), "plain");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_into_error() {
        let parsed: std::result::Result<i32, _> = "x".parse::<i32>();
        let err = parsed.into_callback_error().unwrap_err();
        assert!(matches!(err, Error::Callback(_)));
    }
}
