//! Error types module
//!
//! The `AppError` enum unifies the failure modes surfaced at the HTTP layer.
//! The storage, transcode, and notification crates have their own typed
//! errors; callers convert into `AppError` at the orchestration seam.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transcode error: {0}")]
    Transcode(String),

    #[error("Push gateway error: {0}")]
    Gateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code this error maps to.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::BadRequest(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Unauthorized(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::Config(_) => 500,
            AppError::Storage(_) => 502,
            AppError::Transcode(_) => 500,
            AppError::Gateway(_) => 502,
            AppError::Internal(_) => 500,
        }
    }

    /// Machine-readable error code for structured responses and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Transcode(_) => "TRANSCODE_ERROR",
            AppError::Gateway(_) => "GATEWAY_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-facing message. Internal variants are not echoed verbatim.
    pub fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => msg.clone(),
            AppError::Config(_) => "Server configuration error".to_string(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::Transcode(_) => "Failed to process video".to_string(),
            AppError::Gateway(_) => "Failed to reach push gateway".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_and_echoes_message() {
        let err = AppError::NotFound("Video clip.mp4 not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.client_message(), "Video clip.mp4 not found");
    }

    #[test]
    fn internal_message_is_not_echoed() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn io_error_converts_to_internal() {
        let err: AppError = io::Error::new(io::ErrorKind::Other, "disk on fire").into();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }
}
