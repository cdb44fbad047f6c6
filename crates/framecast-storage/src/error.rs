//! Storage error taxonomy.
//!
//! Every failure mode a caller might act on gets its own variant. Transient
//! network classes (`Timeout`, `ConnectionRefused`, `NetworkUnreachable`)
//! are candidates for caller-side retry; auth failures must never be retried.

use std::error::Error as _;
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Local file not found: {0}")]
    FileNotFound(String),

    #[error("Authentication failed: check WebDAV credentials")]
    AuthenticationFailed,

    #[error("Destination folder not found on the store")]
    FolderNotFound,

    #[error("Request timed out")]
    Timeout,

    #[error("Connection refused by the store")]
    ConnectionRefused,

    #[error("Network unreachable")]
    NetworkUnreachable,

    #[error("Unauthorized (401)")]
    Unauthorized,

    #[error("Forbidden (403)")]
    Forbidden,

    #[error("Insufficient storage on the remote store (507)")]
    InsufficientStorage,

    #[error("Store returned error status {0}")]
    ServerError(u16),

    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Unknown storage error: {0}")]
    Unknown(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Map a non-2xx upload status to the taxonomy.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => StorageError::Unauthorized,
            403 => StorageError::Forbidden,
            404 => StorageError::FolderNotFound,
            507 => StorageError::InsufficientStorage,
            s if (500..600).contains(&s) => StorageError::ServerError(s),
            s => StorageError::Unknown(format!("unexpected status {}", s)),
        }
    }

    /// Map a reqwest transport error to the taxonomy.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return StorageError::Timeout;
        }
        if err.is_connect() {
            // Distinguish refused from unreachable when the io error is visible.
            let mut source: Option<&(dyn std::error::Error + 'static)> = err.source();
            while let Some(inner) = source {
                if let Some(io_err) = inner.downcast_ref::<io::Error>() {
                    return match io_err.kind() {
                        io::ErrorKind::ConnectionRefused => StorageError::ConnectionRefused,
                        io::ErrorKind::NetworkUnreachable | io::ErrorKind::HostUnreachable => {
                            StorageError::NetworkUnreachable
                        }
                        _ => StorageError::ConnectionRefused,
                    };
                }
                source = inner.source();
            }
            return StorageError::ConnectionRefused;
        }
        StorageError::Unknown(err.to_string())
    }

    /// Whether a caller-side retry could plausibly succeed. Auth failures are
    /// explicitly non-retryable so callers do not burn the probe budget.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StorageError::Timeout
                | StorageError::ConnectionRefused
                | StorageError::NetworkUnreachable
                | StorageError::ServerError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_the_taxonomy() {
        assert!(matches!(StorageError::from_status(401), StorageError::Unauthorized));
        assert!(matches!(StorageError::from_status(403), StorageError::Forbidden));
        assert!(matches!(StorageError::from_status(404), StorageError::FolderNotFound));
        assert!(matches!(
            StorageError::from_status(507),
            StorageError::InsufficientStorage
        ));
        assert!(matches!(
            StorageError::from_status(503),
            StorageError::ServerError(503)
        ));
        assert!(matches!(StorageError::from_status(418), StorageError::Unknown(_)));
    }

    #[test]
    fn auth_failures_are_not_transient() {
        assert!(!StorageError::Unauthorized.is_transient());
        assert!(!StorageError::AuthenticationFailed.is_transient());
        assert!(StorageError::Timeout.is_transient());
        assert!(StorageError::ServerError(500).is_transient());
    }
}
