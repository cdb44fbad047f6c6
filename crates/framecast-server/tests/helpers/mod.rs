//! Test helpers: build AppState and router for integration tests.
//!
//! The app runs against a temp media directory and an unreachable push
//! gateway, so no external services are needed. The transcoder is `true`
//! (exits 0 without producing output, enough for endpoint tests), `false`
//! (always fails, for notification-suppression tests), or a stub shell
//! script that writes the output file named by its last argument, for
//! end-to-end delivery tests.

use axum_test::TestServer;
use tempfile::TempDir;

use framecast_core::Config;
use framecast_server::{build_router, AppState};

pub struct TestApp {
    pub server: TestServer,
    pub videos_dir: std::path::PathBuf,
    pub _temp_dir: TempDir,
}

pub fn setup_test_app() -> TestApp {
    build_test_app(|_| "true".to_string(), None)
}

/// App whose "ffmpeg" writes `converted bytes` to the output path it is
/// given, standing in for a successful conversion.
#[allow(dead_code)]
pub fn setup_test_app_with_stub_transcoder() -> TestApp {
    build_test_app(stub_transcoder_script, None)
}

/// Stub-transcoder app pointed at a real (mock) push gateway URL.
#[allow(dead_code)]
pub fn setup_test_app_with_stub_transcoder_and_gateway(gateway_url: &str) -> TestApp {
    build_test_app(stub_transcoder_script, Some(gateway_url))
}

/// App whose "ffmpeg" always exits non-zero, pointed at a mock gateway.
#[allow(dead_code)]
pub fn setup_test_app_with_failing_transcoder_and_gateway(gateway_url: &str) -> TestApp {
    build_test_app(|_| "false".to_string(), Some(gateway_url))
}

fn stub_transcoder_script(temp: &std::path::Path) -> String {
    let script = temp.join("fake-transcoder.sh");
    std::fs::write(
        &script,
        "#!/bin/sh\nfor last; do :; done\nprintf 'converted bytes' > \"$last\"\n",
    )
    .expect("write stub transcoder");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("chmod stub transcoder");
    }
    script.display().to_string()
}

fn build_test_app(
    ffmpeg: impl FnOnce(&std::path::Path) -> String,
    gateway_url: Option<&str>,
) -> TestApp {
    let temp_dir = TempDir::new().expect("create temp dir");
    let videos_dir = temp_dir.path().join("videos");
    std::fs::create_dir_all(&videos_dir).expect("create videos dir");

    let mut config = Config::for_videos_dir(&videos_dir);
    config.ffmpeg_path = ffmpeg(temp_dir.path());
    config.push_gateway_url = gateway_url
        .map(str::to_string)
        .unwrap_or_else(|| "http://127.0.0.1:1/push".to_string());
    config.notify_timeout_secs = 1;

    let state = AppState::new(config).expect("build app state");
    let server = TestServer::new(build_router(state)).expect("start test server");

    TestApp {
        server,
        videos_dir,
        _temp_dir: temp_dir,
    }
}

pub fn write_raw(app: &TestApp, name: &str, bytes: &[u8]) {
    std::fs::write(app.videos_dir.join(name), bytes).expect("write raw file");
}

#[allow(dead_code)]
pub fn write_processed(app: &TestApp, name: &str, bytes: &[u8]) {
    let processed = app.videos_dir.join("processed");
    std::fs::create_dir_all(&processed).expect("create processed dir");
    std::fs::write(processed.join(name), bytes).expect("write processed file");
}
