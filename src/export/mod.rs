//! Campaign Export
//!
//! Turns the full campaign list (unsorted, unpaginated) into a downloadable
//! artifact.
//!
//! - **CSV**: spreadsheet-friendly, fixed column order
//! - **JSON**: pretty-printed records
//! - **PDF**: not rendered; reports a notice to the user instead

mod csv;

pub use self::csv::{format_csv, CSV_HEADERS};

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::data::CampaignRecord;

/// Supported export formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// Format name not recognised
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    /// Download filename not usable in a `Content-Disposition` header
    #[error("Invalid export filename: {0:?}")]
    InvalidFilename(String),

    /// Format exists in the menu but has no renderer
    #[error("{notice}")]
    Unimplemented { format: ExportFormat, notice: String },

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A downloadable export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

/// Default filenames per format
#[derive(Debug, Clone)]
pub struct Exporter {
    pub csv_filename: String,
    pub json_filename: String,
    pub pdf_filename: String,
}

impl Default for Exporter {
    fn default() -> Self {
        Self {
            csv_filename: "campaigns-data.csv".to_string(),
            json_filename: "campaigns-data.json".to_string(),
            pdf_filename: "campaigns-report.pdf".to_string(),
        }
    }
}

impl Exporter {
    /// Export records, using `filename` if given, else the format default
    pub fn export(
        &self,
        format: ExportFormat,
        records: &[CampaignRecord],
        filename: Option<&str>,
    ) -> Result<Artifact, ExportError> {
        let filename = filename
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.default_filename(format).to_string());

        if !is_valid_filename(&filename) {
            return Err(ExportError::InvalidFilename(filename));
        }

        let artifact = match format {
            ExportFormat::Csv => Artifact {
                filename,
                content_type: "text/csv;charset=utf-8",
                body: format_csv(records),
            },
            ExportFormat::Json => Artifact {
                filename,
                content_type: "application/json",
                body: serde_json::to_string_pretty(records)?,
            },
            ExportFormat::Pdf => {
                tracing::info!(records = records.len(), "PDF export requested (simulated)");
                return Err(ExportError::Unimplemented {
                    format,
                    notice: format!(
                        "PDF export is simulated: {} would be rendered with a PDF library in a full deployment",
                        filename
                    ),
                });
            }
        };

        tracing::debug!(
            format = %format,
            filename = %artifact.filename,
            bytes = artifact.body.len(),
            "Export generated"
        );

        Ok(artifact)
    }

    pub fn default_filename(&self, format: ExportFormat) -> &str {
        match format {
            ExportFormat::Csv => &self.csv_filename,
            ExportFormat::Json => &self.json_filename,
            ExportFormat::Pdf => &self.pdf_filename,
        }
    }
}

/// A plain file name: no control characters, quotes, separators or `;`
fn is_valid_filename(name: &str) -> bool {
    !name
        .chars()
        .any(|c| c.is_control() || matches!(c, '"' | '\\' | '/' | ';'))
}
