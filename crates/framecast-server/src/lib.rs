//! Delivery orchestrator HTTP server.
//!
//! Accepts "new media" requests, replies before any processing starts, then
//! runs transcode and push notification on a bounded background queue. Also
//! serves the processed media files the notifications point at.

pub mod error;
pub mod handlers;
pub mod jobs;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use routes::build_router;
pub use state::AppState;
