//! Shared configuration, error taxonomy, and domain models for framecast.
//!
//! Every other crate in the workspace depends on this one. It carries no I/O
//! of its own: configuration is read from the environment once at startup,
//! and the models here are plain data passed between the storage, transcode,
//! notification, and playback layers.

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, PlaybackTunables, WebdavConfig};
pub use error::AppError;
pub use models::{MediaAsset, MediaType, TranscodeResult};
