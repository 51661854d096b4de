//! Dashboard data model
//!
//! Records shared by the simulator, the table view model, exports and the API,
//! plus the fixed seed collections the dashboard starts from.

pub mod seed;
mod types;

pub use types::{CampaignRecord, CampaignStatus, ChartPoint, Metric, Trend};
