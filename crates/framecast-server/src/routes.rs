//! Route table.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{health::health, process_video::process_video, videos::get_video};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/process-video", post(process_video))
        .route("/videos/{filename}", get(get_video))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
