//! Shared application service layer for the pothole desk.
//!
//! This crate provides the operations behind every front end: report
//! listing, loading and export, the dashboard summary, video submission to
//! the detection engine and the live detection launcher.

pub mod config;
pub mod dashboard;
pub mod detection;
pub mod error;
pub mod live;
pub mod notice;
pub mod process;
pub mod report_service;

// Re-export key types for convenience
pub use config::{AppConfig, CommandSpec, CostConfig, DashboardConfig, EngineConfig};
pub use dashboard::{
    ChartSlice, CostRow, DashboardSummary, JsonSummarySource, ProportionChart,
    StoreSummarySource, SummaryDefaults, SummarySource, UpstreamSummary, cost_table,
    fetch_summary, proportion_chart, source_for,
};
pub use detection::{
    DetectionGateway, OUTPUT_MARKER, ProcessedVideo, VIDEO_CONTENT_TYPE, VideoUpload,
    extract_output_path,
};
pub use error::{AppError, AppResult};
pub use live::{LiveDetectionAck, start_live_detection};
pub use notice::{Notice, NoticeLevel};
pub use report_service::ReportService;
