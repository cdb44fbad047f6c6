//! Domain models shared across the delivery pipeline.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Broad media class carried in notification payloads. Receivers use it to
/// pick between an image view and the playback controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }

    /// Parse the lowercase wire form. Anything else is rejected, matching the
    /// receiver's policy of ignoring payloads with an unknown media type.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded media object as the sender sees it. Not persisted anywhere;
/// object names are unique per upload attempt by construction (timestamp
/// prefix) and never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    pub object_name: String,
    pub mime_class: MediaType,
    /// Container format, taken from the filename suffix (e.g. "mov", "mp4").
    pub source_container: String,
    pub storage_url: String,
}

/// Outcome of a transcode pass over one object.
///
/// `final_path` equals `output_path` only when a conversion ran and
/// succeeded; otherwise it equals `input_path`. `public_url` is always
/// derived from the basename of `final_path`, so conversions that relocate
/// or rename the file still produce a fetchable URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeResult {
    pub success: bool,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub final_path: PathBuf,
    pub public_url: String,
    pub needs_conversion: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_round_trips_through_wire_form() {
        assert_eq!(MediaType::parse("image"), Some(MediaType::Image));
        assert_eq!(MediaType::parse("video"), Some(MediaType::Video));
        assert_eq!(MediaType::Video.as_str(), "video");
    }

    #[test]
    fn media_type_rejects_unknown_values() {
        assert_eq!(MediaType::parse("audio"), None);
        assert_eq!(MediaType::parse("Video"), None);
        assert_eq!(MediaType::parse(""), None);
    }

    #[test]
    fn media_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaType::Image).unwrap(), "\"image\"");
    }
}
