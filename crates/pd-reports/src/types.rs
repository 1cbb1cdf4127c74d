//! Report data types.

use pd_core::{Volume, m3};
use serde::{Deserialize, Serialize};

/// One measured pothole, as read from a report row.
///
/// Numeric fields that failed to parse hold NaN so that a partially broken
/// report still renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotholeRecord {
    pub id: String,
    /// Cubic meters.
    pub volume: f64,
    /// Meters.
    pub depth: f64,
    pub timestamp: String,
}

impl PotholeRecord {
    pub fn volume(&self) -> Volume {
        m3(self.volume)
    }

    pub fn has_valid_volume(&self) -> bool {
        self.volume.is_finite()
    }
}

/// Summed volume of one report file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeTotal {
    pub file_name: String,
    pub total_volume: f64,
}

/// Per-report figures gathered by a store scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportStats {
    pub name: String,
    pub record_count: usize,
    pub total_volume: f64,
}

impl From<&ReportStats> for VolumeTotal {
    fn from(stats: &ReportStats) -> Self {
        Self {
            file_name: stats.name.clone(),
            total_volume: stats.total_volume,
        }
    }
}
