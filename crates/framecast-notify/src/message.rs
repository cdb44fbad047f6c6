//! Push message payloads and gateway response interpretation.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use framecast_core::MediaType;

/// Wire payload sent to the push gateway.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub to: String,
    pub sound: String,
    pub title: String,
    pub body: String,
    pub priority: String,
    /// Zero means deliver-now-or-never; omitted for normal messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub data: PushData,
}

/// Data payload the receiver's push listener consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    /// ISO 8601 creation time.
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Presentation options for a media notification.
#[derive(Debug, Clone)]
pub struct MediaNotificationOptions {
    pub title: String,
    pub body: String,
    pub sound: String,
    pub priority: String,
    pub extra: Map<String, Value>,
}

impl Default for MediaNotificationOptions {
    fn default() -> Self {
        Self {
            title: "New media".to_string(),
            body: "Tap to view".to_string(),
            sound: "default".to_string(),
            priority: "high".to_string(),
            extra: Map::new(),
        }
    }
}

impl PushMessage {
    /// Message announcing a new media item at `media_url`.
    pub fn media(
        token: &str,
        media_url: &str,
        media_type: MediaType,
        opts: MediaNotificationOptions,
    ) -> Self {
        Self {
            to: token.to_string(),
            sound: opts.sound,
            title: opts.title,
            body: opts.body,
            priority: opts.priority,
            ttl: None,
            data: PushData {
                media_url: Some(media_url.to_string()),
                media_type: Some(media_type),
                timestamp: Utc::now().to_rfc3339(),
                extra: opts.extra,
            },
        }
    }

    /// Maximum-urgency message intended to wake a dormant receiver: highest
    /// priority, zero TTL, sticky/full-screen delivery hints. None of the
    /// hints is guaranteed to have an effect on any platform.
    pub fn urgent(token: &str, title: &str, body: &str) -> Self {
        let mut extra = Map::new();
        extra.insert("sticky".to_string(), Value::Bool(true));
        extra.insert("fullScreen".to_string(), Value::Bool(true));
        extra.insert("wake".to_string(), Value::Bool(true));

        Self {
            to: token.to_string(),
            sound: "default".to_string(),
            title: title.to_string(),
            body: body.to_string(),
            priority: "high".to_string(),
            ttl: Some(0),
            data: PushData {
                media_url: None,
                media_type: None,
                timestamp: Utc::now().to_rfc3339(),
                extra,
            },
        }
    }
}

/// Interpret a gateway response body.
///
/// The gateway can accept the HTTP call yet reject individual messages
/// (malformed token, unregistered device, payload too large). Returns
/// `Err(reason)` when any per-recipient error entry is present.
pub fn gateway_accepted(body: &Value) -> Result<(), String> {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            return Err(format!("gateway reported request errors: {}", Value::Array(errors.clone())));
        }
    }

    match body.get("data") {
        Some(Value::Array(entries)) => {
            for entry in entries {
                check_entry(entry)?;
            }
            Ok(())
        }
        Some(entry @ Value::Object(_)) => check_entry(entry),
        _ => Ok(()),
    }
}

fn check_entry(entry: &Value) -> Result<(), String> {
    if entry.get("status").and_then(Value::as_str) == Some("error") {
        let message = entry
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unspecified gateway error");
        let detail = entry
            .pointer("/details/error")
            .and_then(Value::as_str)
            .unwrap_or("");
        return Err(if detail.is_empty() {
            message.to_string()
        } else {
            format!("{} ({})", message, detail)
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn media_message_carries_url_type_and_timestamp() {
        let msg = PushMessage::media(
            "ExponentPushToken[abc]",
            "https://media.example.com/clip.mp4",
            MediaType::Video,
            MediaNotificationOptions::default(),
        );
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["to"], "ExponentPushToken[abc]");
        assert_eq!(value["data"]["mediaUrl"], "https://media.example.com/clip.mp4");
        assert_eq!(value["data"]["mediaType"], "video");
        assert!(value["data"]["timestamp"].as_str().unwrap().contains('T'));
        assert!(value.get("ttl").is_none());
    }

    #[test]
    fn urgent_message_sets_wake_hints_and_zero_ttl() {
        let msg = PushMessage::urgent("tok", "Wake up", "Incoming call");
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["priority"], "high");
        assert_eq!(value["ttl"], 0);
        assert_eq!(value["data"]["sticky"], true);
        assert_eq!(value["data"]["fullScreen"], true);
        assert!(value["data"].get("mediaUrl").is_none());
    }

    #[test]
    fn ok_responses_are_accepted() {
        assert!(gateway_accepted(&json!({"data": {"status": "ok", "id": "x"}})).is_ok());
        assert!(gateway_accepted(&json!({"data": [{"status": "ok"}, {"status": "ok"}]})).is_ok());
        assert!(gateway_accepted(&json!({})).is_ok());
    }

    #[test]
    fn per_recipient_errors_are_rejected() {
        let body = json!({
            "data": {
                "status": "error",
                "message": "\"tok\" is not a registered push notification recipient",
                "details": {"error": "DeviceNotRegistered"}
            }
        });
        let reason = gateway_accepted(&body).unwrap_err();
        assert!(reason.contains("DeviceNotRegistered"));
    }

    #[test]
    fn error_entry_in_batch_is_rejected() {
        let body = json!({"data": [{"status": "ok"}, {"status": "error", "message": "too large"}]});
        assert!(gateway_accepted(&body).is_err());
    }

    #[test]
    fn top_level_errors_are_rejected() {
        let body = json!({"errors": [{"code": "API_ERROR", "message": "bad payload"}]});
        assert!(gateway_accepted(&body).is_err());
    }
}
