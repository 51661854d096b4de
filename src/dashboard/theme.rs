//! Theme preference
//!
//! Light/dark/system preference held in a scoped store with a change
//! subscription. Not persisted across restarts.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};

/// User-selected theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Concrete appearance after resolving `System`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Light,
    Dark,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark, Theme::System]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    /// Resolve against the client's OS preference
    pub fn resolve(&self, prefers_dark: bool) -> Appearance {
        match self {
            Theme::Light => Appearance::Light,
            Theme::Dark => Appearance::Dark,
            Theme::System if prefers_dark => Appearance::Dark,
            Theme::System => Appearance::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown theme: {0} (expected light, dark or system)")]
pub struct ParseThemeError(pub String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Theme::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| ParseThemeError(s.to_string()))
    }
}

/// Current theme plus change notifications
pub struct ThemeStore {
    current: RwLock<Theme>,
    sender: broadcast::Sender<Theme>,
}

impl ThemeStore {
    pub fn new(initial: Theme) -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            current: RwLock::new(initial),
            sender,
        }
    }

    pub async fn get(&self) -> Theme {
        *self.current.read().await
    }

    /// Change the theme; returns false (and notifies no one) if unchanged
    pub async fn set(&self, theme: Theme) -> bool {
        let mut current = self.current.write().await;
        if *current == theme {
            return false;
        }
        *current = theme;
        drop(current);

        tracing::info!(theme = %theme, "Theme changed");
        let _ = self.sender.send(theme);
        true
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Theme> {
        self.sender.subscribe()
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}
