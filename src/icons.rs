//! Icon keys
//!
//! Closed set of symbolic icons referenced by dashboard data. Names that are
//! not part of the set resolve to [`IconKey::FALLBACK`].

use serde::{Deserialize, Serialize};

/// Symbolic icon reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconKey {
    DollarSign,
    Users,
    Target,
    TrendingUp,
    TrendingDown,
    BarChart3,
    Activity,
}

impl IconKey {
    /// Icon used for unknown names
    pub const FALLBACK: IconKey = IconKey::BarChart3;

    pub fn all() -> &'static [IconKey] {
        &[
            IconKey::DollarSign,
            IconKey::Users,
            IconKey::Target,
            IconKey::TrendingUp,
            IconKey::TrendingDown,
            IconKey::BarChart3,
            IconKey::Activity,
        ]
    }

    /// Resolve a symbolic name, falling back to the chart icon
    pub fn from_name(name: &str) -> IconKey {
        IconKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == name)
            .unwrap_or(IconKey::FALLBACK)
    }

    pub fn name(&self) -> &'static str {
        match self {
            IconKey::DollarSign => "DollarSign",
            IconKey::Users => "Users",
            IconKey::Target => "Target",
            IconKey::TrendingUp => "TrendingUp",
            IconKey::TrendingDown => "TrendingDown",
            IconKey::BarChart3 => "BarChart3",
            IconKey::Activity => "Activity",
        }
    }

    /// Terminal glyph used when rendering cards as text
    pub fn glyph(&self) -> &'static str {
        match self {
            IconKey::DollarSign => "$",
            IconKey::Users => "👥",
            IconKey::Target => "◎",
            IconKey::TrendingUp => "↗",
            IconKey::TrendingDown => "↘",
            IconKey::BarChart3 => "▥",
            IconKey::Activity => "∿",
        }
    }
}

impl From<String> for IconKey {
    fn from(name: String) -> Self {
        IconKey::from_name(&name)
    }
}

impl From<IconKey> for String {
    fn from(key: IconKey) -> Self {
        key.name().to_string()
    }
}

impl std::fmt::Display for IconKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_known() {
        for key in IconKey::all() {
            assert_eq!(IconKey::from_name(key.name()), *key);
        }
    }

    #[test]
    fn test_from_name_unknown_uses_fallback() {
        assert_eq!(IconKey::from_name("Rocket"), IconKey::BarChart3);
        assert_eq!(IconKey::from_name(""), IconKey::FALLBACK);
        // Names are case-sensitive symbols
        assert_eq!(IconKey::from_name("users"), IconKey::FALLBACK);
    }
}
