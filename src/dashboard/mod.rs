//! Dashboard State
//!
//! Single owner of everything the dashboard renders: metric cards, chart
//! series, the campaign table state and the live-update switch. All
//! mutations replace state wholesale under one writer lock and are
//! announced on a broadcast channel.
//!
//! Theme and notifications live in their own scoped stores, each with an
//! accessor and a subscription.

mod notifications;
mod theme;

pub use notifications::{
    badge_label, default_notifications, Notification, NotificationCenter, NotificationKind,
    NotificationSummary,
};
pub use theme::{Appearance, ParseThemeError, Theme, ThemeStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, Weak};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::data::{seed, CampaignRecord, ChartPoint, Metric};
use crate::simulator::{LiveTicker, MetricSimulator, Tick, DEFAULT_TICK_INTERVAL, DEFAULT_WINDOW};
use crate::table::{PageView, SortField, TableViewState, DEFAULT_PAGE_SIZE};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Dashboard errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },

    #[error("Unknown chart: {0}")]
    UnknownChart(String),
}

/// Tunables for a dashboard instance
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    /// Period between live updates
    pub tick_interval: Duration,
    /// Points kept in the live revenue series
    pub window_size: usize,
    /// Campaign rows per page
    pub page_size: usize,
    /// Initial theme
    pub theme: Theme,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            window_size: DEFAULT_WINDOW,
            page_size: DEFAULT_PAGE_SIZE,
            theme: Theme::default(),
        }
    }
}

/// Chart series served by the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Revenue,
    Engagement,
    Funnel,
    Traffic,
}

impl FromStr for ChartKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue" => Ok(ChartKind::Revenue),
            "engagement" => Ok(ChartKind::Engagement),
            "funnel" => Ok(ChartKind::Funnel),
            "traffic" => Ok(ChartKind::Traffic),
            _ => Err(DashboardError::UnknownChart(s.to_string())),
        }
    }
}

/// Point-in-time copy of the rendered state
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSnapshot {
    pub metrics: Vec<Metric>,
    pub revenue: Vec<ChartPoint>,
    pub engagement: Vec<ChartPoint>,
    pub funnel: Vec<ChartPoint>,
    pub traffic: Vec<ChartPoint>,
    pub live: bool,
    pub last_update: Option<DateTime<Utc>>,
}

/// State change announcements
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// A tick replaced the metric cards and the revenue series
    Updated {
        metrics: Vec<Metric>,
        revenue: Vec<ChartPoint>,
        at: DateTime<Utc>,
    },
    /// Live updates were switched on or off
    LiveChanged { enabled: bool },
    /// Sort or page changed
    TableChanged {
        state: TableViewState,
        page: PageView,
    },
}

struct ChartState {
    metrics: Vec<Metric>,
    revenue: Vec<ChartPoint>,
    engagement: Vec<ChartPoint>,
    funnel: Vec<ChartPoint>,
    traffic: Vec<ChartPoint>,
    live: bool,
    last_update: Option<DateTime<Utc>>,
}

/// Ticker plus the task that applies its ticks
struct LiveControl {
    ticker: LiveTicker,
    consumer: Option<JoinHandle<()>>,
}

/// The dashboard state owner
pub struct Dashboard {
    charts: RwLock<ChartState>,
    campaigns: Vec<CampaignRecord>,
    table: RwLock<TableViewState>,
    live: Mutex<LiveControl>,
    window_size: usize,
    events: broadcast::Sender<DashboardEvent>,
    theme: ThemeStore,
    notifications: NotificationCenter,
}

impl Dashboard {
    /// Create a dashboard over the seed data
    pub fn new(settings: DashboardSettings) -> Self {
        Self::with_campaigns(settings, seed::campaigns())
    }

    /// Create a dashboard over a custom campaign list
    pub fn with_campaigns(settings: DashboardSettings, campaigns: Vec<CampaignRecord>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let mut table = TableViewState::new(settings.page_size);
        table.clamp_page(campaigns.len());

        Self {
            charts: RwLock::new(ChartState {
                metrics: seed::metrics(),
                revenue: seed::revenue_series(),
                engagement: seed::engagement_series(),
                funnel: seed::conversion_funnel(),
                traffic: seed::traffic_sources(),
                live: false,
                last_update: None,
            }),
            campaigns,
            table: RwLock::new(table),
            live: Mutex::new(LiveControl {
                ticker: LiveTicker::new(settings.tick_interval),
                consumer: None,
            }),
            window_size: settings.window_size.max(1),
            events,
            theme: ThemeStore::new(settings.theme),
            notifications: NotificationCenter::default(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    // ---- Live updates ----

    pub async fn is_live(&self) -> bool {
        self.charts.read().await.live
    }

    /// Time of the last applied tick
    pub async fn last_update(&self) -> Option<DateTime<Utc>> {
        self.charts.read().await.last_update
    }

    pub async fn tick_interval(&self) -> Duration {
        self.live.lock().await.ticker.period()
    }

    /// Switch live updates on or off
    ///
    /// Returns false if already in the requested state. Switching off
    /// cancels the timer before returning.
    pub async fn set_live(self: &Arc<Self>, enabled: bool) -> bool {
        let mut control = self.live.lock().await;
        self.switch_live(&mut control, enabled).await
    }

    /// Flip live updates; returns the new state
    pub async fn toggle_live(self: &Arc<Self>) -> bool {
        let mut control = self.live.lock().await;
        let enabled = !self.charts.read().await.live;
        self.switch_live(&mut control, enabled).await;
        enabled
    }

    async fn switch_live(self: &Arc<Self>, control: &mut LiveControl, enabled: bool) -> bool {
        {
            let mut charts = self.charts.write().await;
            if charts.live == enabled {
                return false;
            }
            charts.live = enabled;
        }

        if enabled {
            let ticks = control.ticker.subscribe();
            control.consumer = Some(spawn_tick_consumer(Arc::downgrade(self), ticks));
            control.ticker.start();
        } else {
            control.ticker.stop();
            if let Some(consumer) = control.consumer.take() {
                consumer.abort();
            }
        }

        tracing::info!(enabled, "Live updates switched");
        let _ = self.events.send(DashboardEvent::LiveChanged { enabled });
        true
    }

    /// Apply one tick: perturb the metric cards and the revenue series
    ///
    /// A tick arriving after live updates were switched off is discarded
    /// and false is returned.
    pub async fn apply_tick(&self, tick: Tick) -> bool {
        let event = {
            let mut charts = self.charts.write().await;
            if !charts.live {
                tracing::debug!(sequence = tick.sequence, "Discarding tick, live updates are off");
                return false;
            }

            let simulator = MetricSimulator::new(true).with_window(self.window_size);
            let mut rng = rand::thread_rng();

            charts.metrics = charts
                .metrics
                .iter()
                .map(|m| simulator.perturb_metric(m, &mut rng))
                .collect();
            charts.revenue = simulator.perturb_series(&charts.revenue, &mut rng);
            charts.last_update = Some(tick.at);

            DashboardEvent::Updated {
                metrics: charts.metrics.clone(),
                revenue: charts.revenue.clone(),
                at: tick.at,
            }
        };

        tracing::debug!(sequence = tick.sequence, "Applied live update");
        let _ = self.events.send(event);
        true
    }

    /// Stop the live timer if it is running
    pub async fn shutdown(self: &Arc<Self>) {
        self.set_live(false).await;
    }

    // ---- Charts and metrics ----

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let charts = self.charts.read().await;
        DashboardSnapshot {
            metrics: charts.metrics.clone(),
            revenue: charts.revenue.clone(),
            engagement: charts.engagement.clone(),
            funnel: charts.funnel.clone(),
            traffic: charts.traffic.clone(),
            live: charts.live,
            last_update: charts.last_update,
        }
    }

    pub async fn metrics(&self) -> Vec<Metric> {
        self.charts.read().await.metrics.clone()
    }

    pub async fn chart(&self, kind: ChartKind) -> Vec<ChartPoint> {
        let charts = self.charts.read().await;
        match kind {
            ChartKind::Revenue => charts.revenue.clone(),
            ChartKind::Engagement => charts.engagement.clone(),
            ChartKind::Funnel => charts.funnel.clone(),
            ChartKind::Traffic => charts.traffic.clone(),
        }
    }

    // ---- Campaign table ----

    /// All campaign records in their original order
    pub fn campaigns(&self) -> &[CampaignRecord] {
        &self.campaigns
    }

    pub async fn table_state(&self) -> TableViewState {
        *self.table.read().await
    }

    pub async fn campaigns_page(&self) -> PageView {
        self.table.read().await.page_view(&self.campaigns)
    }

    /// Click a sort header
    pub async fn sort_campaigns(&self, field: SortField) -> PageView {
        let mut table = self.table.write().await;
        table.set_sort(field);

        tracing::debug!(
            field = %table.sort_field,
            direction = ?table.sort_direction,
            page = table.current_page,
            "Campaign sort changed"
        );
        let page = table.page_view(&self.campaigns);
        let _ = self.events.send(DashboardEvent::TableChanged {
            state: *table,
            page: page.clone(),
        });
        page
    }

    /// Navigate to a page; pages outside `1..=total_pages` are rejected
    pub async fn go_to_page(&self, page: usize) -> Result<PageView, DashboardError> {
        let mut table = self.table.write().await;
        if !table.is_valid_page(page, self.campaigns.len()) {
            return Err(DashboardError::PageOutOfRange {
                page,
                total_pages: table.total_pages(self.campaigns.len()),
            });
        }
        table.set_page(page);

        let view = table.page_view(&self.campaigns);
        let _ = self.events.send(DashboardEvent::TableChanged {
            state: *table,
            page: view.clone(),
        });
        Ok(view)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DashboardSettings::default())
    }
}

fn spawn_tick_consumer(
    dashboard: Weak<Dashboard>,
    mut ticks: broadcast::Receiver<Tick>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match ticks.recv().await {
                Ok(tick) => {
                    let Some(dashboard) = dashboard.upgrade() else {
                        break;
                    };
                    dashboard.apply_tick(tick).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Live updates fell behind the ticker");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SortDirection;

    fn dashboard() -> Arc<Dashboard> {
        Arc::new(Dashboard::default())
    }

    #[tokio::test]
    async fn test_initial_snapshot_matches_seed() {
        let dashboard = dashboard();
        let snapshot = dashboard.snapshot().await;

        assert_eq!(snapshot.metrics, seed::metrics());
        assert_eq!(snapshot.revenue, seed::revenue_series());
        assert!(!snapshot.live);
        assert!(snapshot.last_update.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_tick_updates_metrics_and_revenue() {
        let dashboard = dashboard();
        let mut events = dashboard.subscribe();

        assert!(dashboard.set_live(true).await);
        tokio::time::sleep(Duration::from_millis(5_100)).await;

        let snapshot = dashboard.snapshot().await;
        assert!(snapshot.live);
        assert!(snapshot.last_update.is_some());
        assert_eq!(snapshot.revenue.len(), 16);
        assert_eq!(snapshot.revenue[0].label, "Jan 3");
        assert_eq!(&snapshot.revenue[..15], &seed::revenue_series()[1..]);
        assert_eq!(snapshot.metrics.len(), 4);
        assert!(snapshot.metrics[0].value.starts_with('$'));
        assert!(snapshot.metrics[3].value.ends_with('%'));

        assert!(matches!(
            events.recv().await.unwrap(),
            DashboardEvent::LiveChanged { enabled: true }
        ));
        match events.recv().await.unwrap() {
            DashboardEvent::Updated { revenue, at, .. } => {
                assert_eq!(revenue, snapshot.revenue);
                assert_eq!(Some(at), snapshot.last_update);
            }
            other => panic!("Expected Updated, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_updates_while_disabled() {
        let dashboard = dashboard();
        tokio::time::sleep(Duration::from_secs(60)).await;

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.metrics, seed::metrics());
        assert_eq!(snapshot.revenue, seed::revenue_series());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disable_stops_updates() {
        let dashboard = dashboard();
        dashboard.set_live(true).await;
        tokio::time::sleep(Duration::from_millis(5_100)).await;

        assert!(dashboard.set_live(false).await);
        let frozen = dashboard.snapshot().await;

        tokio::time::sleep(Duration::from_secs(30)).await;
        let later = dashboard.snapshot().await;
        assert_eq!(later.revenue, frozen.revenue);
        assert_eq!(later.metrics, frozen.metrics);
        assert_eq!(later.revenue[0].label, "Jan 3");
        assert!(!later.live);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disable_before_first_tick() {
        let dashboard = dashboard();
        dashboard.set_live(true).await;
        tokio::time::sleep(Duration::from_secs(4)).await;
        dashboard.set_live(false).await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(dashboard.snapshot().await.revenue, seed::revenue_series());
        assert!(dashboard.last_update().await.is_none());
    }

    #[tokio::test]
    async fn test_stale_tick_is_discarded() {
        let dashboard = dashboard();
        let applied = dashboard
            .apply_tick(Tick {
                sequence: 1,
                at: Utc::now(),
            })
            .await;

        assert!(!applied);
        assert_eq!(dashboard.snapshot().await.metrics, seed::metrics());
    }

    #[tokio::test]
    async fn test_set_live_is_idempotent() {
        let dashboard = dashboard();
        assert!(!dashboard.set_live(false).await);
        assert!(dashboard.set_live(true).await);
        assert!(!dashboard.set_live(true).await);
        dashboard.shutdown().await;
        assert!(!dashboard.is_live().await);
    }

    #[tokio::test]
    async fn test_toggle_live() {
        let dashboard = dashboard();
        assert!(dashboard.toggle_live().await);
        assert!(dashboard.is_live().await);
        assert!(!dashboard.toggle_live().await);
        assert!(!dashboard.is_live().await);
    }

    #[tokio::test]
    async fn test_sort_and_page() {
        let dashboard = dashboard();
        let mut events = dashboard.subscribe();

        let page = dashboard.sort_campaigns(SortField::Campaign).await;
        let state = dashboard.table_state().await;
        assert_eq!(state.sort_field, SortField::Campaign);
        assert_eq!(state.sort_direction, SortDirection::Desc);
        assert_eq!(page.rows[0].campaign, "Summer Sale 2024");

        dashboard.sort_campaigns(SortField::Campaign).await;
        assert_eq!(dashboard.table_state().await.sort_direction, SortDirection::Asc);

        let page = dashboard.go_to_page(2).await.unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].campaign, "Summer Sale 2024");

        assert!(matches!(events.recv().await.unwrap(), DashboardEvent::TableChanged { .. }));
    }

    #[tokio::test]
    async fn test_page_out_of_range_rejected() {
        let dashboard = dashboard();
        assert_eq!(
            dashboard.go_to_page(3).await.unwrap_err(),
            DashboardError::PageOutOfRange {
                page: 3,
                total_pages: 2
            }
        );
        assert!(dashboard.go_to_page(0).await.is_err());
        assert_eq!(dashboard.table_state().await.current_page, 1);
    }

    #[tokio::test]
    async fn test_campaigns_keep_original_order() {
        let dashboard = dashboard();
        dashboard.sort_campaigns(SortField::Clicks).await;
        assert_eq!(dashboard.campaigns(), seed::campaigns().as_slice());
    }

    #[tokio::test]
    async fn test_chart_lookup() {
        let dashboard = dashboard();
        assert_eq!(dashboard.chart(ChartKind::Traffic).await, seed::traffic_sources());
        assert_eq!("funnel".parse::<ChartKind>(), Ok(ChartKind::Funnel));
        assert!("pie".parse::<ChartKind>().is_err());
    }
}
