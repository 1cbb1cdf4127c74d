//! Error types for the pd-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives every front end one error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("Malformed report: {0}")]
    ReportParse(String),

    #[error("Reports error: {0}")]
    Reports(String),

    #[error("No data available to generate the report: {0}")]
    EmptyReport(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("No video file provided")]
    NoVideo,

    #[error("Uploaded video is empty: {file_name}")]
    EmptyUpload { file_name: String },

    #[error("Failed to launch detection engine '{program}'")]
    EngineLaunch {
        program: String,
        source: std::io::Error,
    },

    #[error("Detection engine timed out after {secs}s")]
    EngineTimedOut { secs: u64 },

    #[error("Video processing failed: {message}")]
    Processing { message: String },

    #[error("Failed to start live detection '{program}'")]
    LiveLaunch {
        program: String,
        source: std::io::Error,
    },

    #[error("Dashboard summary unavailable: {0}")]
    Upstream(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// The caller sent nothing usable; the engine was never started.
    pub fn is_upload_error(&self) -> bool {
        matches!(self, AppError::NoVideo | AppError::EmptyUpload { .. })
    }

    pub fn is_processing_error(&self) -> bool {
        matches!(
            self,
            AppError::EngineLaunch { .. }
                | AppError::EngineTimedOut { .. }
                | AppError::Processing { .. }
        )
    }
}

/// Result type for pd-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<pd_reports::ReportsError> for AppError {
    fn from(err: pd_reports::ReportsError) -> Self {
        use pd_reports::ReportsError;
        match err {
            ReportsError::NotFound { name } => AppError::ReportNotFound(name),
            e @ ReportsError::Parse { .. } => AppError::ReportParse(e.to_string()),
            e => AppError::Reports(e.to_string()),
        }
    }
}

impl From<pd_render::RenderError> for AppError {
    fn from(err: pd_render::RenderError) -> Self {
        match err {
            pd_render::RenderError::EmptyReport { name } => AppError::EmptyReport(name),
            e => AppError::Render(e.to_string()),
        }
    }
}
