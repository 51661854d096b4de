//! Seed data
//!
//! Fixed collections the dashboard starts from. Metric cards and the revenue
//! series are later perturbed by the live simulation; everything else stays
//! as seeded for the whole session.

use chrono::NaiveDate;

use super::types::{CampaignRecord, CampaignStatus, ChartPoint, Metric, Trend};
use crate::icons::IconKey;

/// Headline metric cards
pub fn metrics() -> Vec<Metric> {
    vec![
        Metric::new("Total Revenue", "$342,567", 12.5, Trend::Up, IconKey::DollarSign),
        Metric::new("Active Users", "24,583", 8.2, Trend::Up, IconKey::Users),
        Metric::new("Conversions", "1,847", -2.1, Trend::Down, IconKey::Target),
        Metric::new("Growth Rate", "23.4%", 5.7, Trend::Up, IconKey::TrendingUp),
    ]
}

/// Daily revenue for January, one point every other day (16 points)
pub fn revenue_series() -> Vec<ChartPoint> {
    const VALUES: [f64; 16] = [
        12500.0, 13200.0, 11800.0, 14500.0, 13800.0, 15200.0, 14100.0, 16300.0, 15800.0,
        17200.0, 16500.0, 18100.0, 17800.0, 19500.0, 18900.0, 20300.0,
    ];

    VALUES
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let day = 1 + 2 * i as u32;
            let point = ChartPoint::new(format!("Jan {}", day), *value);
            match NaiveDate::from_ymd_opt(2024, 1, day) {
                Some(date) => point.dated(date),
                None => point,
            }
        })
        .collect()
}

/// Weekly user engagement
pub fn engagement_series() -> Vec<ChartPoint> {
    [
        ("Mon", 2400.0),
        ("Tue", 1398.0),
        ("Wed", 9800.0),
        ("Thu", 3908.0),
        ("Fri", 4800.0),
        ("Sat", 3800.0),
        ("Sun", 4300.0),
    ]
    .into_iter()
    .map(|(label, value)| ChartPoint::new(label, value))
    .collect()
}

/// Conversion funnel stages
pub fn conversion_funnel() -> Vec<ChartPoint> {
    [
        ("Impressions", 156000.0),
        ("Clicks", 12400.0),
        ("Visits", 8900.0),
        ("Sign-ups", 2100.0),
        ("Purchases", 450.0),
    ]
    .into_iter()
    .map(|(label, value)| ChartPoint::new(label, value))
    .collect()
}

/// Traffic source shares in percent
pub fn traffic_sources() -> Vec<ChartPoint> {
    [
        ("Organic Search", 45.0),
        ("Paid Search", 28.0),
        ("Social Media", 15.0),
        ("Direct", 8.0),
        ("Email", 4.0),
    ]
    .into_iter()
    .map(|(label, value)| ChartPoint::new(label, value))
    .collect()
}

/// Campaign performance table rows
pub fn campaigns() -> Vec<CampaignRecord> {
    vec![
        campaign("1", "Summer Sale 2024", 245000, 12400, 5.06, 890, 45670.0, CampaignStatus::Active),
        campaign("2", "Brand Awareness Q1", 189000, 8900, 4.71, 567, 32100.0, CampaignStatus::Active),
        campaign("3", "Holiday Special", 312000, 18700, 5.99, 1240, 78900.0, CampaignStatus::Ended),
        campaign("4", "Product Launch", 156000, 9300, 5.96, 456, 28400.0, CampaignStatus::Paused),
        campaign("5", "Retargeting Campaign", 89000, 7800, 8.76, 678, 41200.0, CampaignStatus::Active),
        campaign("6", "Mobile App Install", 198000, 11200, 5.66, 789, 35600.0, CampaignStatus::Active),
    ]
}

#[allow(clippy::too_many_arguments)]
fn campaign(
    id: &str,
    name: &str,
    impressions: u64,
    clicks: u64,
    ctr: f64,
    conversions: u64,
    revenue: f64,
    status: CampaignStatus,
) -> CampaignRecord {
    CampaignRecord {
        id: id.to_string(),
        campaign: name.to_string(),
        impressions,
        clicks,
        ctr,
        conversions,
        revenue,
        status,
    }
}
