//! Metric and series perturbation
//!
//! Pure transformations: each call takes the current snapshot plus a source
//! of randomness and returns a new snapshot. Inputs are never mutated.

use chrono::{Local, NaiveTime};
use rand::Rng;

use super::units::UnitMarker;
use crate::data::{ChartPoint, Metric};

/// Relative jitter applied to a metric value (±5%)
pub const METRIC_VARIATION: f64 = 0.05;

/// Absolute jitter applied to a metric's change, in percentage points
pub const CHANGE_VARIATION: f64 = 1.0;

/// Relative jitter applied to each new series point (±10%)
pub const SERIES_VARIATION: f64 = 0.10;

/// Number of points a live series keeps
pub const DEFAULT_WINDOW: usize = 16;

/// Produces perturbed copies of metric and chart data
///
/// When disabled every operation is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSimulator {
    enabled: bool,
    window: usize,
}

impl MetricSimulator {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            window: DEFAULT_WINDOW,
        }
    }

    /// Builder: set the sliding window size (at least one point)
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Apply a random variation to a metric card
    ///
    /// The value is re-rendered with the unit marker it came in with; the
    /// change drifts by up to one percentage point. Values that cannot be
    /// parsed are carried over untouched.
    pub fn perturb_metric<R: Rng + ?Sized>(&self, metric: &Metric, rng: &mut R) -> Metric {
        if !self.enabled {
            return metric.clone();
        }

        let unit = UnitMarker::detect(&metric.value);
        let Some(base) = unit.parse(&metric.value) else {
            tracing::debug!(title = %metric.title, value = %metric.value, "Unparseable metric value");
            return metric.clone();
        };

        let variation = rng.gen_range(-METRIC_VARIATION..=METRIC_VARIATION);
        let drift = rng.gen_range(-CHANGE_VARIATION..=CHANGE_VARIATION);

        Metric {
            value: unit.render(base * (1.0 + variation)),
            change: metric.change + drift,
            ..metric.clone()
        }
    }

    /// Append a new point labeled with the current local time
    pub fn perturb_series<R: Rng + ?Sized>(&self, points: &[ChartPoint], rng: &mut R) -> Vec<ChartPoint> {
        self.perturb_series_at(points, Local::now().time(), rng)
    }

    /// Append a new point labeled with `now` (`HH:MM`) and keep the most
    /// recent `window` points
    ///
    /// The new value is the previous last value scaled by up to ±10% and
    /// rounded. An empty series has nothing to extrapolate from and is
    /// returned as is.
    pub fn perturb_series_at<R: Rng + ?Sized>(
        &self,
        points: &[ChartPoint],
        now: NaiveTime,
        rng: &mut R,
    ) -> Vec<ChartPoint> {
        if !self.enabled {
            return points.to_vec();
        }

        let Some(last) = points.last() else {
            return Vec::new();
        };

        let variation = rng.gen_range(-SERIES_VARIATION..=SERIES_VARIATION);
        let value = (last.value * (1.0 + variation)).round();

        let mut next = Vec::with_capacity(points.len() + 1);
        next.extend_from_slice(points);
        next.push(ChartPoint::new(now.format("%H:%M").to_string(), value));

        let excess = next.len().saturating_sub(self.window);
        next.drain(..excess);
        next
    }
}
