//! Core data types for the Insights dashboard
//!
//! This module defines the records every other layer passes around:
//! - `Metric`: A headline metric card (formatted value + change)
//! - `ChartPoint`: One labeled point of a chart series
//! - `CampaignRecord`: One row of the campaign performance table
//! - `Trend` and `CampaignStatus`: Classification enums

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::icons::IconKey;

/// A headline metric shown as a dashboard card
///
/// `value` is already formatted for display and carries its unit marker
/// (`$342,567`, `23.4%`, `24.5K`, `1,847`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metric {
    /// Card title, also used as the metric's identifier
    pub title: String,
    /// Formatted display value
    pub value: String,
    /// Signed percentage delta versus the previous period
    pub change: f64,
    /// Direction arrow shown on the card
    pub trend: Trend,
    /// Symbolic icon reference
    pub icon: IconKey,
}

impl Metric {
    /// Create a new metric card
    pub fn new(
        title: impl Into<String>,
        value: impl Into<String>,
        change: f64,
        trend: Trend,
        icon: IconKey,
    ) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            change,
            trend,
            icon,
        }
    }
}

/// Direction of a metric's change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Icon used next to the change percentage
    pub fn icon(&self) -> IconKey {
        match self {
            Trend::Up => IconKey::TrendingUp,
            Trend::Down => IconKey::TrendingDown,
        }
    }
}

/// A single point of a chart series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    /// Category or time-of-day label
    pub label: String,
    /// Numeric magnitude
    pub value: f64,
    /// Calendar date for historical points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl ChartPoint {
    /// Create a point without a date
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            date: None,
        }
    }

    /// Builder: attach a calendar date
    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// One marketing campaign's performance figures
///
/// Records are immutable for the lifetime of a session; views only
/// reorder and slice them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignRecord {
    /// Unique identifier
    pub id: String,
    /// Campaign name
    pub campaign: String,
    pub impressions: u64,
    pub clicks: u64,
    /// Click-through rate in percent
    pub ctr: f64,
    pub conversions: u64,
    /// Revenue in dollars
    pub revenue: f64,
    pub status: CampaignStatus,
}

/// Lifecycle status of a campaign
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Paused,
    Ended,
}

impl CampaignStatus {
    /// Lowercase name as shown in the table badge and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Ended => "ended",
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
