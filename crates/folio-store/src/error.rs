//! Error types for the document store boundary

use std::path::PathBuf;

/// Errors raised by a [`DocumentStore`](crate::DocumentStore) implementation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached or refused the call
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// IO error on a file-backed store
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored bytes are not a valid document tree
    #[error("malformed store data: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl StoreError {
    /// Create an unavailable error from any message
    #[inline]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Create IO error for path
    #[inline]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether retrying the same call may succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_display() {
        let err = StoreError::unavailable("connection reset");
        assert_eq!(err.to_string(), "store unavailable: connection reset");
        assert!(err.is_transient());
    }

    #[test]
    fn malformed_is_not_transient() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::Malformed(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn io_error_keeps_path() {
        let err = StoreError::io_error(
            "/tmp/folio.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/folio.json"));
    }
}
