//! Shared helpers for the sender CLI.

use std::path::Path;

use framecast_core::{MediaAsset, MediaType};
use framecast_storage::StorageError;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Object name for an upload: unix-timestamp prefix plus the local basename.
/// The prefix keeps names unique per attempt, which the server relies on to
/// avoid two conversions writing the same output path.
pub fn destination_name(unix_secs: i64, file: &Path) -> Option<String> {
    let base = file.file_name()?.to_str()?;
    Some(format!("{}_{}", unix_secs, base))
}

/// Classify a local file for the delivery payload. Video containers get the
/// playback controller on the receiver; everything else renders as an image.
pub fn classify(file: &Path) -> MediaType {
    match file.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("mov") || ext.eq_ignore_ascii_case("mp4") => {
            MediaType::Video
        }
        _ => MediaType::Image,
    }
}

/// Describe a completed upload as the asset record printed to the user.
pub fn describe_upload(file: &Path, object_name: &str, storage_url: &str) -> MediaAsset {
    MediaAsset {
        object_name: object_name.to_string(),
        mime_class: classify(file),
        source_container: file
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase(),
        storage_url: storage_url.to_string(),
    }
}

/// One consolidated human-readable explanation of an upload failure, naming
/// the most likely causes instead of dumping a transport trace.
pub fn upload_failure_message(err: &StorageError) -> String {
    let causes = match err {
        StorageError::AuthenticationFailed
        | StorageError::Unauthorized
        | StorageError::Forbidden => {
            "check WEBDAV_USERNAME and WEBDAV_PASSWORD, and that the account may write to the upload folder"
        }
        StorageError::FolderNotFound => {
            "check WEBDAV_UPLOAD_PATH; the folder does not exist on the store"
        }
        StorageError::Timeout
        | StorageError::ConnectionRefused
        | StorageError::NetworkUnreachable => {
            "check your network connection and that WEBDAV_HOST is correct and reachable"
        }
        StorageError::InsufficientStorage => "the remote store is out of space",
        StorageError::FileNotFound(_) => "check the local file path",
        _ => "check WEBDAV_HOST, your credentials, and your network connection",
    };
    format!("Upload failed: {}. Most likely: {}.", err, causes)
}

/// Consolidated explanation for a failed call to the delivery server.
pub fn delivery_failure_message(detail: &str) -> String {
    format!(
        "Could not start delivery: {}. Most likely: the server URL is wrong or the \
         server is down; if a push was requested, also verify the device token.",
        detail
    )
}
