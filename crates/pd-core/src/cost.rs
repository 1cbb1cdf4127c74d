//! Repair cost model.
//!
//! One formula serves every view: each material is priced per cubic meter
//! of pothole volume, and the total is the sum of both materials.

use crate::units::{Volume, in_m3};

/// Material costs for filling one volume.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostBreakdown {
    pub cement_cost: f64,
    pub concrete_cost: f64,
    pub total_cost: f64,
}

/// Anything that can price a pothole volume.
pub trait CostModel {
    fn cost(&self, volume: Volume) -> CostBreakdown;
}

/// Fixed per-cubic-meter rates, in the configured currency.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostRates {
    pub cement_per_m3: f64,
    pub concrete_per_m3: f64,
}

impl CostRates {
    pub const DEFAULT_CEMENT_PER_M3: f64 = 5.0;
    pub const DEFAULT_CONCRETE_PER_M3: f64 = 10.0;

    pub fn new(cement_per_m3: f64, concrete_per_m3: f64) -> Self {
        Self {
            cement_per_m3,
            concrete_per_m3,
        }
    }

    pub fn compute_cost(&self, volume: Volume) -> CostBreakdown {
        let v = in_m3(volume);
        CostBreakdown {
            cement_cost: self.cement_per_m3 * v,
            concrete_cost: self.concrete_per_m3 * v,
            total_cost: (self.cement_per_m3 + self.concrete_per_m3) * v,
        }
    }
}

impl Default for CostRates {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CEMENT_PER_M3, Self::DEFAULT_CONCRETE_PER_M3)
    }
}

impl CostModel for CostRates {
    fn cost(&self, volume: Volume) -> CostBreakdown {
        self.compute_cost(volume)
    }
}
