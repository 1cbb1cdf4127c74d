//! Live detection launcher.
//!
//! The live script is started and immediately let go: there is no health
//! check and no channel back from it. Success means the process was
//! spawned, nothing more.

use serde::Serialize;
use tracing::info;

use crate::config::CommandSpec;
use crate::error::AppResult;
use crate::process::spawn_detached;

pub const LIVE_STARTED_MESSAGE: &str = "Live pothole detection started successfully!";

#[derive(Debug, Clone, Serialize)]
pub struct LiveDetectionAck {
    pub pid: u32,
    pub started_at: String,
    pub message: String,
}

pub fn start_live_detection(live: &CommandSpec) -> AppResult<LiveDetectionAck> {
    let pid = spawn_detached(live.command(), &live.program)?;
    info!(pid, script = %live.script.display(), "live detection launched");

    Ok(LiveDetectionAck {
        pid,
        started_at: chrono::Utc::now().to_rfc3339(),
        message: LIVE_STARTED_MESSAGE.to_string(),
    })
}
