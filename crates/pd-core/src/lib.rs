//! pd-core: stable foundation for the pothole desk.
//!
//! Contains:
//! - units (uom SI volume/length + constructors)
//! - numeric (fixed-precision display)
//! - ids (per-request ids, validated report names)
//! - cost (the single repair cost model)
//! - error (shared error types)

pub mod cost;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use cost::{CostBreakdown, CostModel, CostRates};
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
