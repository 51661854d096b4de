//! Unit markers
//!
//! Metric values are display strings. The marker embedded in the string
//! decides how the number is parsed out and how a new number is rendered
//! back, so a currency card stays a currency card across updates.

/// Unit encoded in a formatted metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitMarker {
    /// `$342,567`
    Currency,
    /// `23.4%`
    Percentage,
    /// `24.5K`
    Thousands,
    /// `1,847`
    Count,
}

impl UnitMarker {
    /// Detect the marker, checking `$` then `%` then `K`
    pub fn detect(value: &str) -> UnitMarker {
        if value.contains('$') {
            UnitMarker::Currency
        } else if value.contains('%') {
            UnitMarker::Percentage
        } else if value.contains('K') {
            UnitMarker::Thousands
        } else {
            UnitMarker::Count
        }
    }

    /// Parse the numeric magnitude out of a formatted value
    ///
    /// `K` values are scaled back up to units so that [`render`](Self::render)
    /// reproduces the same magnitude.
    pub fn parse(&self, value: &str) -> Option<f64> {
        let stripped: String = value
            .chars()
            .filter(|c| !matches!(c, '$' | ',' | '%' | 'K'))
            .collect();
        let number: f64 = stripped.trim().parse().ok()?;
        if !number.is_finite() {
            return None;
        }

        Some(match self {
            UnitMarker::Thousands => number * 1000.0,
            _ => number,
        })
    }

    /// Render a magnitude with this marker
    pub fn render(&self, magnitude: f64) -> String {
        match self {
            UnitMarker::Currency => format!("${}", group_thousands(magnitude.round() as i64)),
            UnitMarker::Percentage => format!("{:.1}%", round_half_up(magnitude, 1)),
            UnitMarker::Thousands => format!("{:.1}K", round_half_up(magnitude / 1000.0, 1)),
            UnitMarker::Count => group_thousands(magnitude.round() as i64),
        }
    }
}

/// Round to `decimals` places with ties away from zero
///
/// `format!("{:.N}")` alone rounds ties to even (`0.25` -> `0.2`).
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Format an integer with `,` thousands separators
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
