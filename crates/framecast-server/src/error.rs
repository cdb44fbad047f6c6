//! HTTP error response conversion
//!
//! Wrapper around `AppError` so it can implement `IntoResponse` (orphan
//! rules forbid implementing the axum trait for the core type directly).
//! Handlers return `Result<impl IntoResponse, HttpAppError>` and convert
//! domain errors with `.map_err(Into::into)` or `?`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use framecast_core::AppError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::Internal(err.to_string()))
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %app_error, code = app_error.error_code(), "Request failed");
        } else {
            tracing::warn!(error = %app_error, code = app_error.error_code(), "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_echoes_its_message() {
        let response =
            HttpAppError(AppError::BadRequest("Video name is required".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_are_500() {
        let response =
            HttpAppError(AppError::Internal("pool exhausted".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
