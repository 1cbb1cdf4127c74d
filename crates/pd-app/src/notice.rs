//! One human-readable message per outcome, for whatever front end shows it.

use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&AppError> for Notice {
    fn from(err: &AppError) -> Self {
        let message = match err {
            AppError::ReportNotFound(name) => {
                format!("Failed to load report data: report not found ({name}).")
            }
            AppError::ReportParse(detail) => format!("Failed to load report data: {detail}."),
            AppError::Reports(_) => "Failed to fetch reports.".to_string(),
            AppError::EmptyReport(_) => "No data available to generate the report.".to_string(),
            AppError::NoVideo => "Please select a video to submit.".to_string(),
            AppError::EmptyUpload { file_name } => {
                format!("The selected video '{file_name}' is empty.")
            }
            AppError::EngineTimedOut { secs } => {
                format!("Video processing timed out after {secs} seconds.")
            }
            AppError::EngineLaunch { .. } | AppError::Processing { .. } => {
                "An error occurred while processing the video.".to_string()
            }
            AppError::LiveLaunch { .. } => "Failed to start live detection.".to_string(),
            AppError::Upstream(_) => "Failed to fetch dashboard data!".to_string(),
            other => other.to_string(),
        };
        Notice::error(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_failures_share_one_message() {
        let a = Notice::from(&AppError::Processing {
            message: "no marker".to_string(),
        });
        let b = Notice::from(&AppError::EngineLaunch {
            program: "py".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert_eq!(a, b);
        assert_eq!(a.level, NoticeLevel::Error);
    }

    #[test]
    fn upload_error_asks_for_a_video() {
        let n = Notice::from(&AppError::NoVideo);
        assert_eq!(n.message, "Please select a video to submit.");
    }
}
