//! Human-readable diagnostics for known transcoder exit codes.
//!
//! ffmpeg's exit codes are not documented as a stable interface, but a few
//! show up often enough in production logs to be worth naming.

/// Describe a transcoder exit status for diagnostics.
pub fn describe_exit_code(code: Option<i32>) -> String {
    match code {
        Some(1) => "generic error: bad arguments or unreadable input".to_string(),
        Some(8) => "invalid data found when processing input".to_string(),
        Some(69) => "input stream unavailable".to_string(),
        Some(137) => {
            "killed by the system (SIGKILL), likely due to memory constraints".to_string()
        }
        Some(139) => "transcoder crashed with a segmentation fault".to_string(),
        Some(255) => "transcoder aborted".to_string(),
        Some(other) => format!("unrecognized exit code {}", other),
        None => "terminated by signal before exiting".to_string(),
    }
}
