//! Receiver-side notification feed.
//!
//! In-memory only; the feed starts empty on every launch. Entries are
//! prepend-ordered (newest first) and deduplicated by media URL, so a
//! re-delivered push for the same object never produces a duplicate row.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use framecast_core::MediaType;

/// One entry in the receiver's media feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaNotification {
    pub id: String,
    pub media_type: MediaType,
    pub url: String,
    pub received_at: DateTime<Utc>,
    /// Set once if the https URL failed and was rewritten to http.
    pub insecure_fallback_applied: bool,
}

/// Newest-first list of media notifications, deduplicated by URL.
#[derive(Debug, Default)]
pub struct NotificationFeed {
    entries: Vec<MediaNotification>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[MediaNotification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a push data payload and store it.
    ///
    /// Payloads without a usable `mediaUrl` and `mediaType` are ignored, as
    /// are payloads whose URL is already present. Returns the stored entry's
    /// id when the payload produced a new row.
    pub fn ingest(&mut self, data: &Value) -> Option<String> {
        let url = data.get("mediaUrl").and_then(Value::as_str)?;
        let media_type =
            MediaType::parse(data.get("mediaType").and_then(Value::as_str)?)?;

        if self.entries.iter().any(|entry| entry.url == url) {
            tracing::debug!(url = %url, "Dropping duplicate media notification");
            return None;
        }

        let received_at = data
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|parsed| parsed.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        let entry = MediaNotification {
            id: Uuid::new_v4().to_string(),
            media_type,
            url: url.to_string(),
            received_at,
            insecure_fallback_applied: false,
        };
        let id = entry.id.clone();
        tracing::info!(url = %url, media_type = %media_type.as_str(), "Media notification received");
        self.entries.insert(0, entry);
        Some(id)
    }

    /// Rewrite an image entry's URL from https to http after a failed https
    /// load. Applies at most once per entry and never touches videos.
    pub fn apply_insecure_fallback(&mut self, id: &str) -> Option<&str> {
        let entry = self.entries.iter_mut().find(|entry| entry.id == id)?;
        if entry.media_type != MediaType::Image
            || entry.insecure_fallback_applied
            || !entry.url.starts_with("https://")
        {
            return None;
        }
        entry.url = format!("http://{}", &entry.url["https://".len()..]);
        entry.insecure_fallback_applied = true;
        tracing::warn!(url = %entry.url, "Falling back to plain http for image");
        Some(entry.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn video_payload(url: &str) -> Value {
        json!({
            "mediaUrl": url,
            "mediaType": "video",
            "timestamp": "2026-08-30T12:00:00Z"
        })
    }

    #[test]
    fn ingest_prepends_newest_first() {
        let mut feed = NotificationFeed::new();
        feed.ingest(&video_payload("http://host/a.mp4")).unwrap();
        feed.ingest(&video_payload("http://host/b.mp4")).unwrap();

        let urls: Vec<&str> = feed.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["http://host/b.mp4", "http://host/a.mp4"]);
    }

    #[test]
    fn duplicate_urls_are_dropped_silently() {
        let mut feed = NotificationFeed::new();
        assert!(feed.ingest(&video_payload("http://host/a.mp4")).is_some());
        assert!(feed.ingest(&video_payload("http://host/a.mp4")).is_none());
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn malformed_payloads_are_ignored() {
        let mut feed = NotificationFeed::new();
        assert!(feed.ingest(&json!({"mediaType": "video"})).is_none());
        assert!(feed.ingest(&json!({"mediaUrl": "http://host/a.mp4"})).is_none());
        assert!(feed
            .ingest(&json!({"mediaUrl": "http://host/a.mp4", "mediaType": "pdf"}))
            .is_none());
        assert!(feed.is_empty());
    }

    #[test]
    fn payload_timestamp_is_parsed_when_present() {
        let mut feed = NotificationFeed::new();
        feed.ingest(&video_payload("http://host/a.mp4")).unwrap();
        assert_eq!(
            feed.entries()[0].received_at.to_rfc3339(),
            "2026-08-30T12:00:00+00:00"
        );
    }

    #[test]
    fn image_https_failure_falls_back_to_http_once() {
        let mut feed = NotificationFeed::new();
        let id = feed
            .ingest(&json!({
                "mediaUrl": "https://host/pic.jpg",
                "mediaType": "image"
            }))
            .unwrap();

        assert_eq!(
            feed.apply_insecure_fallback(&id),
            Some("http://host/pic.jpg")
        );
        // Second attempt is a no-op.
        assert_eq!(feed.apply_insecure_fallback(&id), None);
    }

    #[test]
    fn fallback_never_touches_videos() {
        let mut feed = NotificationFeed::new();
        let id = feed.ingest(&video_payload("https://host/a.mp4")).unwrap();
        assert_eq!(feed.apply_insecure_fallback(&id), None);
        assert_eq!(feed.entries()[0].url, "https://host/a.mp4");
    }
}
