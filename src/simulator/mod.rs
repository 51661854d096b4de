//! Live Metric Simulation
//!
//! Synthetic real-time updates for the dashboard, with no external data
//! source.
//!
//! ## Architecture
//!
//! - **MetricSimulator**: Pure perturbation of metric cards and chart series
//! - **LiveTicker**: Owned periodic timer that notifies subscribers
//! - **UnitMarker**: Parses and re-renders formatted metric values
//!
//! The ticker only says *when*; the owner of the dashboard state decides
//! what to perturb on each tick and swaps the new snapshot in.

mod perturb;
mod ticker;
mod units;

pub use perturb::{
    MetricSimulator, CHANGE_VARIATION, DEFAULT_WINDOW, METRIC_VARIATION, SERIES_VARIATION,
};
pub use ticker::{LiveTicker, Tick, DEFAULT_TICK_INTERVAL};
pub use units::{group_thousands, round_half_up, UnitMarker};
