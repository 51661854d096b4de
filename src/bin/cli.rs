//! Insights CLI
//!
//! Command-line client for a running Insights server:
//! - Show metric cards and the campaign table
//! - Sort and page the table
//! - Switch live updates
//! - Export campaign data
//! - Manage theme and notifications

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use insights::api::dto::{
    CampaignsResponse, HealthResponse, LiveResponse, NotificationsChangedResponse,
    NotificationsResponse, ThemeResponse,
};
use insights::data::{CampaignRecord, Metric};
use insights::simulator::group_thousands;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "insights-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line client for the Insights marketing dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LiveAction {
    On,
    Off,
    Toggle,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show server status
    Status,

    /// Show the metric cards
    Metrics,

    /// Show the current campaign page
    Campaigns,

    /// Sort campaigns by a column (same column again flips direction)
    Sort {
        /// campaign, impressions, clicks, ctr, conversions, revenue, status
        field: String,
    },

    /// Go to a campaign page
    Page {
        /// 1-based page number
        page: usize,
    },

    /// Switch live updates
    Live {
        #[arg(value_enum)]
        action: LiveAction,
    },

    /// Export campaign data
    Export {
        /// csv, json or pdf
        format: String,
        /// Output file (default: the server's filename for the format)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or change the theme
    Theme {
        /// light, dark or system
        value: Option<String>,
    },

    /// Show or manage notifications
    Notifications {
        /// Mark every notification read
        #[arg(long, conflicts_with_all = ["clear", "read"])]
        read_all: bool,
        /// Remove every notification
        #[arg(long, conflicts_with = "read")]
        clear: bool,
        /// Mark one notification read
        #[arg(long, value_name = "ID")]
        read: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

struct Client {
    http: reqwest::Client,
    base: String,
}

impl Client {
    fn new(base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let response = self.http.get(self.url(path)).send().await;
        parse(self.connected(response)?).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> anyhow::Result<T> {
        let mut request = self.http.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await;
        parse(self.connected(response)?).await
    }

    fn connected(
        &self,
        response: reqwest::Result<reqwest::Response>,
    ) -> anyhow::Result<reqwest::Response> {
        response.with_context(|| {
            format!(
                "cannot connect to Insights API at {}; make sure the server is running (cargo run --bin insights)",
                self.base
            )
        })
    }
}

/// Decode a success body, or turn the server's error body into an error
async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> anyhow::Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(text);
    bail!("{} ({})", message, status)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new(&cli.api_url);
    let json_output = cli.format == OutputFormat::Json;

    match cli.command {
        Commands::Status => {
            let health: HealthResponse = client.get("/health").await?;
            if json_output {
                return print_json(&health);
            }

            println!("Insights v{}", health.version);
            println!();
            println!("API Status: {}", health.status);
            println!("Live updates: {}", if health.live { "on" } else { "off" });
            println!("Campaigns: {}", health.campaigns);
            println!("WebSocket clients: {}", health.ws_connections);
            println!();
            println!("Uptime: {}", format_duration(health.uptime_seconds));
        }

        Commands::Metrics => {
            let metrics: Vec<Metric> = client.get("/api/v1/metrics").await?;
            if json_output {
                return print_json(&metrics);
            }
            print_metrics(&metrics);
        }

        Commands::Campaigns => {
            let campaigns: CampaignsResponse = client.get("/api/v1/campaigns").await?;
            show_campaigns(&campaigns, json_output)?;
        }

        Commands::Sort { field } => {
            let campaigns: CampaignsResponse = client
                .send(
                    reqwest::Method::POST,
                    "/api/v1/campaigns/sort",
                    Some(json!({ "field": field })),
                )
                .await?;
            show_campaigns(&campaigns, json_output)?;
        }

        Commands::Page { page } => {
            let campaigns: CampaignsResponse = client
                .send(
                    reqwest::Method::PUT,
                    "/api/v1/campaigns/page",
                    Some(json!({ "page": page })),
                )
                .await?;
            show_campaigns(&campaigns, json_output)?;
        }

        Commands::Live { action } => {
            let live: LiveResponse = match action {
                LiveAction::On | LiveAction::Off => {
                    let enabled = matches!(action, LiveAction::On);
                    client
                        .send(
                            reqwest::Method::PUT,
                            "/api/v1/live",
                            Some(json!({ "enabled": enabled })),
                        )
                        .await?
                }
                LiveAction::Toggle => {
                    client
                        .send(reqwest::Method::POST, "/api/v1/live/toggle", None)
                        .await?
                }
            };
            if json_output {
                return print_json(&live);
            }

            println!(
                "Live updates {} (every {}s)",
                if live.enabled { "on" } else { "off" },
                live.interval_ms as f64 / 1000.0
            );
            if let Some(at) = live.last_update {
                println!("Last update: {}", at.format("%H:%M:%S"));
            }
        }

        Commands::Export { format, output } => {
            let response = client
                .http
                .get(client.url(&format!("/api/v1/export/{}", format)))
                .send()
                .await;
            let response = client.connected(response)?;
            if !response.status().is_success() {
                // PDF lands here with the server's notice
                return parse::<serde_json::Value>(response).await.map(|_| ());
            }

            let filename = attachment_filename(&response)
                .unwrap_or_else(|| format!("campaigns-data.{}", format.to_lowercase()));
            let data = response.text().await?;
            let path = output.unwrap_or_else(|| PathBuf::from(filename));

            std::fs::write(&path, &data)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Exported to {:?}", path);
        }

        Commands::Theme { value } => {
            let theme: ThemeResponse = match value {
                Some(value) => {
                    client
                        .send(
                            reqwest::Method::PUT,
                            "/api/v1/theme",
                            Some(json!({ "theme": value })),
                        )
                        .await?
                }
                None => client.get("/api/v1/theme").await?,
            };
            if json_output {
                return print_json(&theme);
            }
            println!("Theme: {}", theme.theme);
        }

        Commands::Notifications {
            read_all,
            clear,
            read,
        } => {
            let changed: Option<NotificationsChangedResponse> = if read_all {
                Some(
                    client
                        .send(reqwest::Method::POST, "/api/v1/notifications/read-all", None)
                        .await?,
                )
            } else if clear {
                Some(
                    client
                        .send(reqwest::Method::DELETE, "/api/v1/notifications", None)
                        .await?,
                )
            } else if let Some(id) = read {
                Some(
                    client
                        .send(
                            reqwest::Method::POST,
                            &format!("/api/v1/notifications/{}/read", id),
                            None,
                        )
                        .await?,
                )
            } else {
                None
            };

            match changed {
                Some(changed) if json_output => return print_json(&changed),
                Some(changed) => {
                    println!(
                        "{} changed, {} unread of {}",
                        changed.affected, changed.summary.unread, changed.summary.total
                    );
                }
                None => {
                    let list: NotificationsResponse = client.get("/api/v1/notifications").await?;
                    if json_output {
                        return print_json(&list);
                    }
                    print_notifications(&list);
                }
            }
        }

        Commands::Config { output } => {
            let config = insights::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn attachment_filename(response: &reqwest::Response) -> Option<String> {
    let disposition = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)?
        .to_str()
        .ok()?;
    let (_, name) = disposition.split_once("filename=")?;
    Some(name.trim_matches('"').to_string())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_metrics(metrics: &[Metric]) {
    for metric in metrics {
        println!(
            "{} {:<18} {:>12}  {} {:+.1}%",
            metric.icon.glyph(),
            metric.title,
            metric.value,
            metric.trend.icon().glyph(),
            metric.change
        );
    }
}

fn show_campaigns(campaigns: &CampaignsResponse, json_output: bool) -> anyhow::Result<()> {
    if json_output {
        return print_json(campaigns);
    }

    let state = &campaigns.state;
    let page = &campaigns.page;

    println!(
        "{:<22} {:>12} {:>8} {:>7} {:>11} {:>12}  {}",
        "Campaign", "Impressions", "Clicks", "CTR", "Conversions", "Revenue", "Status"
    );
    println!("{}", "-".repeat(86));
    for row in &page.rows {
        print_campaign(row);
    }
    println!();
    println!(
        "Showing {} to {} of {} campaigns (page {} of {}, sorted by {} {:?})",
        page.first_index,
        page.last_index,
        page.total_records,
        page.page,
        page.total_pages,
        state.sort_field,
        state.sort_direction
    );
    Ok(())
}

fn print_campaign(row: &CampaignRecord) {
    println!(
        "{:<22} {:>12} {:>8} {:>6.2}% {:>11} {:>12}  {}",
        row.campaign,
        group_thousands(row.impressions as i64),
        group_thousands(row.clicks as i64),
        row.ctr,
        group_thousands(row.conversions as i64),
        format!("${}", group_thousands(row.revenue.round() as i64)),
        row.status
    );
}

fn print_notifications(list: &NotificationsResponse) {
    match &list.badge {
        Some(badge) => println!("Notifications ({} unread)", badge),
        None => println!("Notifications"),
    }
    println!();

    if list.notifications.is_empty() {
        println!("No notifications");
        return;
    }

    for n in &list.notifications {
        let marker = if n.read { " " } else { "*" };
        println!("{} [{}] {} {}  ({})", marker, n.id, n.kind.glyph(), n.title, n.time);
        println!("      {}", n.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(7260), "2h 1m");
        assert_eq!(format_duration(90000), "1d 1h");
    }

    #[test]
    fn test_parse_notifications_flags() {
        let cli = Cli::try_parse_from(["insights-cli", "notifications", "--read", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Notifications { read: Some(id), read_all: false, clear: false } if id == "2"
        ));

        assert!(
            Cli::try_parse_from(["insights-cli", "notifications", "--read-all", "--clear"])
                .is_err()
        );
    }

    #[test]
    fn test_parse_live_action() {
        let cli = Cli::try_parse_from(["insights-cli", "--format", "json", "live", "toggle"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Live { action: LiveAction::Toggle }));
        assert!(cli.format == OutputFormat::Json);

        assert!(Cli::try_parse_from(["insights-cli", "live", "maybe"]).is_err());
    }
}
