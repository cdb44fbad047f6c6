//! Legacy-container detection and ffmpeg invocation.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::fs;
use tokio::process::Command;

use framecast_core::TranscodeResult;

use crate::error::TranscodeError;
use crate::exit_codes::describe_exit_code;

/// Containers that are not guaranteed to play in all target clients and
/// therefore need conversion. Case-insensitive suffix check.
pub fn is_legacy_container(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("mov"))
        .unwrap_or(false)
}

/// Derive the public URL for a processed file: base URL plus the basename of
/// the final path. Using the basename (never the full path or the original
/// request name) keeps the URL fetchable when conversion relocates or
/// renames the file.
pub fn public_url(base_url: &str, final_path: &Path) -> Result<String, TranscodeError> {
    let name = final_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| TranscodeError::InvalidName(final_path.display().to_string()))?;
    Ok(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(name)
    ))
}

/// Transcode service over a single media directory.
#[derive(Clone)]
pub struct Transcoder {
    ffmpeg_path: String,
    videos_dir: PathBuf,
    /// Base URL processed files are served from (`{SERVER_URL}/videos`).
    url_base: String,
}

impl Transcoder {
    pub fn new(ffmpeg_path: String, videos_dir: PathBuf, server_url: &str) -> Self {
        Self {
            ffmpeg_path,
            videos_dir,
            url_base: format!("{}/videos", server_url.trim_end_matches('/')),
        }
    }

    fn processed_dir(&self) -> PathBuf {
        self.videos_dir.join("processed")
    }

    /// Process one uploaded object: convert legacy containers, pass through
    /// everything else, and compute the public URL either way.
    #[tracing::instrument(skip(self))]
    pub async fn process_media(&self, object_name: &str) -> Result<TranscodeResult, TranscodeError> {
        let input_path = self.videos_dir.join(object_name);
        if !fs::try_exists(&input_path).await.unwrap_or(false) {
            return Err(TranscodeError::SourceNotFound(object_name.to_string()));
        }

        if !is_legacy_container(object_name) {
            tracing::info!(object = %object_name, "Container already playable, no conversion needed");
            let url = public_url(&self.url_base, &input_path)?;
            return Ok(TranscodeResult {
                success: true,
                output_path: input_path.clone(),
                final_path: input_path.clone(),
                input_path,
                public_url: url,
                needs_conversion: false,
            });
        }

        let stem = Path::new(object_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| TranscodeError::InvalidName(object_name.to_string()))?;
        let output_path = self.processed_dir().join(format!("{}.mp4", stem));

        // A watch-and-convert script may have beaten us to it. Reuse output
        // that is newer than the input instead of converting twice.
        if output_is_fresh(&input_path, &output_path).await {
            tracing::info!(
                object = %object_name,
                output = %output_path.display(),
                "Converted output already exists, skipping conversion"
            );
            let url = public_url(&self.url_base, &output_path)?;
            return Ok(TranscodeResult {
                success: true,
                input_path,
                final_path: output_path.clone(),
                output_path,
                public_url: url,
                needs_conversion: true,
            });
        }

        fs::create_dir_all(self.processed_dir()).await?;

        tracing::info!(
            object = %object_name,
            input = %input_path.display(),
            output = %output_path.display(),
            "Starting conversion"
        );

        let output = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(&input_path)
            .args([
                "-vf",
                "scale=-2:720,format=yuv420p",
                "-c:v",
                "libx264",
                "-crf",
                "23",
                "-preset",
                "medium",
                "-color_primaries",
                "bt709",
                "-color_trc",
                "bt709",
                "-colorspace",
                "bt709",
                "-c:a",
                "copy",
                "-movflags",
                "+faststart",
            ])
            .arg(&output_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let code = output.status.code();
            let diagnostic = describe_exit_code(code);
            tracing::error!(
                object = %object_name,
                exit_code = ?code,
                diagnostic = %diagnostic,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "Conversion failed"
            );
            return Err(TranscodeError::ConversionFailed { code, diagnostic });
        }

        tracing::info!(object = %object_name, output = %output_path.display(), "Conversion finished");

        let url = public_url(&self.url_base, &output_path)?;
        Ok(TranscodeResult {
            success: true,
            input_path,
            final_path: output_path.clone(),
            output_path,
            public_url: url,
            needs_conversion: true,
        })
    }
}

/// True when `output` exists and is at least as new as `input`.
async fn output_is_fresh(input: &Path, output: &Path) -> bool {
    let (input_meta, output_meta) = match (fs::metadata(input).await, fs::metadata(output).await) {
        (Ok(i), Ok(o)) => (i, o),
        _ => return false,
    };
    match (input_meta.modified(), output_meta.modified()) {
        (Ok(i), Ok(o)) => o >= i,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn transcoder_with(ffmpeg: &str, dir: &TempDir) -> Transcoder {
        Transcoder::new(
            ffmpeg.to_string(),
            dir.path().to_path_buf(),
            "http://localhost:3000",
        )
    }

    #[test]
    fn legacy_suffix_check_is_case_insensitive() {
        assert!(is_legacy_container("a.mov"));
        assert!(is_legacy_container("A.MOV"));
        assert!(is_legacy_container("clip.Mov"));
        assert!(!is_legacy_container("a.mp4"));
        assert!(!is_legacy_container("mov"));
        assert!(!is_legacy_container("archive.mov.zip"));
    }

    #[test]
    fn public_url_uses_basename_regardless_of_depth() {
        let base = "http://localhost:3000/videos";
        assert_eq!(
            public_url(base, Path::new("clip.mp4")).unwrap(),
            "http://localhost:3000/videos/clip.mp4"
        );
        assert_eq!(
            public_url(base, Path::new("/data/videos/processed/clip.mp4")).unwrap(),
            "http://localhost:3000/videos/clip.mp4"
        );
        assert_eq!(
            public_url(base, Path::new("a/b/c/d/clip.mp4")).unwrap(),
            "http://localhost:3000/videos/clip.mp4"
        );
    }

    #[tokio::test]
    async fn missing_source_is_a_typed_error() {
        let dir = TempDir::new().unwrap();
        let transcoder = transcoder_with("true", &dir);
        let err = transcoder.process_media("absent.mov").await.unwrap_err();
        assert!(matches!(err, TranscodeError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn playable_container_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), b"data").unwrap();

        let transcoder = transcoder_with("false", &dir);
        let result = transcoder.process_media("clip.mp4").await.unwrap();

        assert!(result.success);
        assert!(!result.needs_conversion);
        assert_eq!(result.final_path, result.input_path);
        assert!(result.public_url.ends_with("/videos/clip.mp4"));
    }

    #[tokio::test]
    async fn legacy_container_is_converted_and_relocated() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("clip.mov"), b"data").unwrap();

        // `true` exits 0 while ignoring the ffmpeg arguments, standing in for
        // a successful conversion.
        let transcoder = transcoder_with("true", &dir);
        let result = transcoder.process_media("clip.mov").await.unwrap();

        assert!(result.success);
        assert!(result.needs_conversion);
        assert_eq!(result.final_path, result.output_path);
        assert_eq!(
            result.output_path,
            dir.path().join("processed").join("clip.mp4")
        );
        assert!(result.public_url.ends_with("/videos/clip.mp4"));
    }

    #[tokio::test]
    async fn failed_conversion_surfaces_exit_code() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("clip.mov"), b"data").unwrap();

        let transcoder = transcoder_with("false", &dir);
        let err = transcoder.process_media("clip.mov").await.unwrap_err();

        match err {
            TranscodeError::ConversionFailed { code, diagnostic } => {
                assert_eq!(code, Some(1));
                assert!(!diagnostic.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn existing_fresh_output_is_reused() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("clip.mov"), b"data").unwrap();
        std::fs::create_dir_all(dir.path().join("processed")).unwrap();
        std::fs::write(dir.path().join("processed/clip.mp4"), b"converted").unwrap();

        // `false` would fail if the conversion actually ran.
        let transcoder = transcoder_with("false", &dir);
        let result = transcoder.process_media("clip.mov").await.unwrap();

        assert!(result.success);
        assert!(result.public_url.ends_with("/videos/clip.mp4"));
    }
}
