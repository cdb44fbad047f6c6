//! Media file serving.
//!
//! Looks in the processed directory first so converted output shadows the
//! raw upload, then falls back to the raw directory for files that never
//! needed conversion.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use tokio::fs;
use tokio_util::io::ReaderStream;

use framecast_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, HttpAppError> {
    // The route captures a single segment, but reject traversal outright.
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(AppError::BadRequest("Invalid file name".to_string()).into());
    }

    let path = resolve(&state, &filename)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", filename)))?;

    let file = fs::File::open(&path).await.map_err(AppError::from)?;
    let len = file.metadata().await.map_err(AppError::from)?.len();

    tracing::debug!(file = %path.display(), bytes = len, "Serving video file");

    let stream = ReaderStream::new(file);
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(header::CONTENT_LENGTH, len)
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

async fn resolve(state: &AppState, filename: &str) -> Option<PathBuf> {
    let processed = state.config.processed_dir().join(filename);
    if fs::try_exists(&processed).await.unwrap_or(false) {
        return Some(processed);
    }
    let raw = state.config.videos_dir.join(filename);
    if fs::try_exists(&raw).await.unwrap_or(false) {
        return Some(raw);
    }
    None
}
