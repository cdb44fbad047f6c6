//! The delivery entry point.
//!
//! Replies `202` with `status: "processing"` before any transcode or push
//! work starts, so client latency is independent of conversion time. The
//! queued work has no way to report back to this caller; its failures are
//! logged by the worker.

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection, extract::State, http::StatusCode, response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use framecast_core::AppError;

use crate::error::HttpAppError;
use crate::jobs::DeliveryJob;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessVideoRequest {
    #[serde(default)]
    pub video_name: Option<String>,
    #[serde(default)]
    pub expo_push_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessVideoResponse {
    pub success: bool,
    pub status: String,
    pub message: String,
    pub video_name: String,
}

pub async fn process_video(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ProcessVideoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    // A missing or unparseable body is treated the same as a body without a
    // video name.
    let request = body.map(|Json(inner)| inner).unwrap_or_default();

    let video_name = request
        .video_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Video name is required".to_string()))?;

    state
        .jobs
        .submit(DeliveryJob {
            object_name: video_name.clone(),
            device_token: request.expo_push_token,
        })
        .map_err(|e| {
            tracing::error!(error = %e, video = %video_name, "Failed to enqueue delivery job");
            AppError::Transcode(e.to_string())
        })?;

    let response = ProcessVideoResponse {
        success: true,
        status: "processing".to_string(),
        message: format!("Processing of {} has started", video_name),
        video_name,
    };
    Ok((StatusCode::ACCEPTED, Json(response)))
}
