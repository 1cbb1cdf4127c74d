//! Video submission to the external detection engine.
//!
//! Handoff protocol: the upload is written to a per-request slot, the engine
//! is run with the slot path as its only positional argument, and its
//! stdout is scanned for a line carrying [`OUTPUT_MARKER`] followed by the
//! path of the processed video.

use std::fs;
use std::path::{Path, PathBuf};

use pd_core::RequestId;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, EngineConfig};
use crate::error::{AppError, AppResult};
use crate::process::run_with_timeout;

pub const OUTPUT_MARKER: &str = "Processed video saved at:";
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// A video as received from the caller.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl VideoUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }

    /// Extension of the original file name, if it is a plain alphanumeric one.
    fn extension(&self) -> Option<&str> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
    }
}

/// The engine's output, ready to be streamed back as an attachment.
#[derive(Debug, Clone)]
pub struct ProcessedVideo {
    pub request_id: RequestId,
    pub file_name: String,
    pub content_type: &'static str,
    pub content_disposition: String,
    pub bytes: Vec<u8>,
}

impl ProcessedVideo {
    pub fn save_to(&self, dir: &Path) -> AppResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Upload file owned by one request; removed when the request is done.
struct UploadSlot {
    path: PathBuf,
}

impl UploadSlot {
    fn create(dir: &Path, request_id: RequestId, upload: &VideoUpload) -> AppResult<Self> {
        fs::create_dir_all(dir)?;
        let name = match upload.extension() {
            Some(ext) => format!("{request_id}.{ext}"),
            None => request_id.to_string(),
        };
        // The engine may run in another working directory.
        let slot = Self {
            path: std::path::absolute(dir.join(name))?,
        };
        fs::write(&slot.path, &upload.bytes)?;
        Ok(slot)
    }
}

impl Drop for UploadSlot {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %err, "could not remove upload slot");
        }
    }
}

/// Find the processed-video path announced on the engine's stdout.
pub fn extract_output_path(stdout: &str) -> Option<&str> {
    stdout
        .lines()
        .find_map(|line| line.split_once(OUTPUT_MARKER))
        .map(|(_, rest)| rest.trim())
        .filter(|p| !p.is_empty())
}

#[derive(Debug, Clone)]
pub struct DetectionGateway {
    uploads_dir: PathBuf,
    engine: EngineConfig,
}

impl DetectionGateway {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            uploads_dir: config.uploads_dir.clone(),
            engine: config.engine.clone(),
        }
    }

    /// Run one video through the engine and return the processed video.
    ///
    /// Blocks until the engine exits or the configured timeout elapses.
    pub fn submit_video(&self, upload: Option<VideoUpload>) -> AppResult<ProcessedVideo> {
        let upload = upload.ok_or(AppError::NoVideo)?;
        if upload.bytes.is_empty() {
            return Err(AppError::EmptyUpload {
                file_name: upload.file_name,
            });
        }

        let request_id = RequestId::new();
        let slot = UploadSlot::create(&self.uploads_dir, request_id, &upload)?;
        info!(
            %request_id,
            input = %slot.path.display(),
            bytes = upload.bytes.len(),
            "submitting video to detection engine"
        );

        let program = self.engine.command.program.as_str();
        let mut cmd = self.engine.command.command();
        cmd.arg(&slot.path);
        let output = run_with_timeout(cmd, program, self.engine.timeout())?;

        let stderr = output.stderr.trim();
        if !stderr.is_empty() {
            warn!(%request_id, stderr, "detection engine wrote to stderr");
        }

        if !output.status.success() {
            return Err(AppError::Processing {
                message: format!("detection engine exited with {}", output.status),
            });
        }

        let reported = extract_output_path(&output.stdout).ok_or_else(|| AppError::Processing {
            message: "engine output did not name a processed video".to_string(),
        })?;
        let video_path = self.engine.command.resolve(Path::new(reported));
        if !video_path.is_file() {
            return Err(AppError::Processing {
                message: format!("Processed video not found: {}", video_path.display()),
            });
        }

        let bytes = fs::read(&video_path)?;
        let file_name = video_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("{request_id}.mp4"));

        info!(%request_id, output = %video_path.display(), bytes = bytes.len(), "processed video ready");
        Ok(ProcessedVideo {
            request_id,
            content_type: VIDEO_CONTENT_TYPE,
            content_disposition: format!("attachment; filename=\"{file_name}\""),
            file_name,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_line_yields_trailing_path() {
        let stdout = "loading model\nProcessed video saved at: /tmp/out/1_pothole_detected.mp4\n";
        assert_eq!(
            extract_output_path(stdout),
            Some("/tmp/out/1_pothole_detected.mp4")
        );
    }

    #[test]
    fn marker_may_follow_other_text() {
        let stdout = "[engine] Processed video saved at:   out.mp4  \r\n";
        assert_eq!(extract_output_path(stdout), Some("out.mp4"));
    }

    #[test]
    fn missing_or_empty_marker_yields_none() {
        assert_eq!(extract_output_path("Error opening video.\n"), None);
        assert_eq!(extract_output_path("Processed video saved at:\n"), None);
    }

    #[test]
    fn upload_slot_is_absolute_and_removed_on_drop() {
        let tmp = tempfile::tempdir_in(".").unwrap();
        let relative = Path::new(".").join(tmp.path().file_name().unwrap());
        let upload = VideoUpload::new("road.mp4", b"frames".to_vec());

        let slot = UploadSlot::create(&relative, RequestId::new(), &upload).unwrap();
        assert!(slot.path.is_absolute());
        assert_eq!(fs::read(&slot.path).unwrap(), b"frames");

        let path = slot.path.clone();
        drop(slot);
        assert!(!path.exists());
    }

    #[test]
    fn extension_is_kept_only_when_plain() {
        assert_eq!(VideoUpload::new("road.MP4", vec![1]).extension(), Some("MP4"));
        assert_eq!(VideoUpload::new("road", vec![1]).extension(), None);
        assert_eq!(VideoUpload::new("road.m p4", vec![1]).extension(), None);
    }
}
