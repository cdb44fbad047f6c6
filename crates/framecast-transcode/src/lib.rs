//! Transcode service
//!
//! Detects legacy containers by filename suffix and shells out to ffmpeg to
//! rewrap them into broadly playable H.264 MP4. The external command's exit
//! status is the sole success signal; non-zero exits are mapped through a
//! small diagnostic table. No retries and no enforced timeout: a wedged
//! transcoder blocks only its own request chain.

pub mod error;
pub mod exit_codes;
pub mod transcoder;

pub use error::TranscodeError;
pub use exit_codes::describe_exit_code;
pub use transcoder::{is_legacy_container, public_url, Transcoder};
