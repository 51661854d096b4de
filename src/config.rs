//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dashboard::{DashboardSettings, Theme};
use crate::export::Exporter;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub table: TableConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_ws_connections")]
    pub max_ws_connections: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_ws_connections() -> usize {
    1000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
            max_ws_connections: default_max_ws_connections(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Live simulation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Start with live updates switched on
    #[serde(default)]
    pub live_on_start: bool,
}

fn default_tick_interval() -> u64 {
    5000 // 5 seconds
}

fn default_window_size() -> usize {
    16
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            window_size: default_window_size(),
            live_on_start: false,
        }
    }
}

/// Campaign table configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    5
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Presentation defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Theme,
}

/// Export filename defaults
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_csv_filename")]
    pub csv_filename: String,

    #[serde(default = "default_json_filename")]
    pub json_filename: String,

    #[serde(default = "default_pdf_filename")]
    pub pdf_filename: String,
}

fn default_csv_filename() -> String {
    "campaigns-data.csv".to_string()
}

fn default_json_filename() -> String {
    "campaigns-data.json".to_string()
}

fn default_pdf_filename() -> String {
    "campaigns-report.pdf".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            csv_filename: default_csv_filename(),
            json_filename: default_json_filename(),
            pdf_filename: default_pdf_filename(),
        }
    }
}

impl From<&ExportConfig> for Exporter {
    fn from(config: &ExportConfig) -> Self {
        Exporter {
            csv_filename: config.csv_filename.clone(),
            json_filename: config.json_filename.clone(),
            pdf_filename: config.pdf_filename.clone(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        // Try default config locations
        let config_paths = [
            dirs::config_dir().map(|p| p.join("insights").join("config.toml")),
            Some(PathBuf::from("/etc/insights/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Settings for the dashboard state owner
    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            tick_interval: Duration::from_millis(self.simulation.tick_interval_ms.max(1)),
            window_size: self.simulation.window_size.max(1),
            page_size: self.table.page_size.max(1),
            theme: self.ui.theme,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(host) = lookup("INSIGHTS_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("INSIGHTS_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Simulation overrides
        if let Some(ms) = lookup("INSIGHTS_TICK_INTERVAL_MS") {
            if let Ok(ms) = ms.parse() {
                self.simulation.tick_interval_ms = ms;
            }
        }

        // Table overrides
        if let Some(size) = lookup("INSIGHTS_PAGE_SIZE") {
            if let Ok(size) = size.parse() {
                self.table.page_size = size;
            }
        }

        // UI overrides
        if let Some(theme) = lookup("INSIGHTS_THEME") {
            match theme.parse() {
                Ok(theme) => self.ui.theme = theme,
                Err(e) => tracing::warn!("Ignoring INSIGHTS_THEME: {}", e),
            }
        }

        // Logging overrides
        if let Some(level) = lookup("INSIGHTS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("INSIGHTS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Insights Configuration
#
# Environment variables override these settings:
# - INSIGHTS_API_HOST
# - INSIGHTS_API_PORT
# - INSIGHTS_TICK_INTERVAL_MS
# - INSIGHTS_PAGE_SIZE
# - INSIGHTS_THEME
# - INSIGHTS_LOG_LEVEL
# - INSIGHTS_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins (empty = any origin)
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

# Maximum concurrent WebSocket connections
max_ws_connections = 1000

[simulation]
# Period between live updates (ms)
tick_interval_ms = 5000

# Points kept in the live revenue chart
window_size = 16

# Start with live updates switched on
live_on_start = false

[table]
# Campaign rows per page
page_size = 5

[ui]
# Initial theme: light, dark or system
theme = "system"

[export]
csv_filename = "campaigns-data.csv"
json_filename = "campaigns-data.json"
pdf_filename = "campaigns-report.pdf"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config_file_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.simulation.tick_interval_ms, 5000);
        assert_eq!(config.simulation.window_size, 16);
        assert_eq!(config.table.page_size, 5);
        assert_eq!(config.ui.theme, Theme::System);
        assert_eq!(config.export.csv_filename, "campaigns-data.csv");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[table]\npage_size = 10\n\n[ui]\ntheme = \"dark\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.table.page_size, 10);
        assert_eq!(config.ui.theme, Theme::Dark);
        // Untouched sections keep defaults
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.simulation.tick_interval_ms, 5000);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[table\npage_size = ").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("INSIGHTS_API_PORT", "9000"),
            ("INSIGHTS_TICK_INTERVAL_MS", "250"),
            ("INSIGHTS_PAGE_SIZE", "not-a-number"),
            ("INSIGHTS_THEME", "light"),
            ("INSIGHTS_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.simulation.tick_interval_ms, 250);
        assert_eq!(config.table.page_size, 5);
        assert_eq!(config.ui.theme, Theme::Light);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_dashboard_settings() {
        let mut config = Config::default();
        config.table.page_size = 0;
        let settings = config.dashboard_settings();
        assert_eq!(settings.tick_interval, Duration::from_secs(5));
        assert_eq!(settings.window_size, 16);
        assert_eq!(settings.page_size, 1);
    }

    #[test]
    fn test_exporter_from_config() {
        let config = ExportConfig {
            csv_filename: "out.csv".to_string(),
            ..Default::default()
        };
        let exporter = Exporter::from(&config);
        assert_eq!(exporter.csv_filename, "out.csv");
        assert_eq!(exporter.pdf_filename, "campaigns-report.pdf");
    }
}
