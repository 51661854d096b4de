//! CSV export
//!
//! Fixed column order, header first, rows joined with `\n`. Campaign names
//! are always quoted; numbers and status are written bare.

use crate::data::CampaignRecord;
use crate::simulator::round_half_up;

/// Header row, in column order
pub const CSV_HEADERS: [&str; 7] = [
    "Campaign",
    "Impressions",
    "Clicks",
    "CTR (%)",
    "Conversions",
    "Revenue ($)",
    "Status",
];

/// Format campaign records as CSV
pub fn format_csv(records: &[CampaignRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for record in records {
        lines.push(format!(
            "\"{}\",{},{},{:.2},{},{},{}",
            record.campaign.replace('"', "\"\""),
            record.impressions,
            record.clicks,
            round_half_up(record.ctr, 2),
            record.conversions,
            record.revenue,
            record.status,
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{seed, CampaignStatus};

    #[test]
    fn test_seed_export_shape() {
        let csv = format_csv(&seed::campaigns());
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(
            lines[0],
            "Campaign,Impressions,Clicks,CTR (%),Conversions,Revenue ($),Status"
        );
        assert_eq!(
            lines[1],
            "\"Summer Sale 2024\",245000,12400,5.06,890,45670,active"
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_ctr_has_two_decimals() {
        let csv = format_csv(&seed::campaigns());
        for line in csv.lines().skip(1) {
            let ctr = line.split(',').nth(3).unwrap();
            let (_, decimals) = ctr.split_once('.').unwrap();
            assert_eq!(decimals.len(), 2, "{}", line);
        }
    }

    #[test]
    fn test_parses_with_csv_reader() {
        let csv = format_csv(&seed::campaigns());
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv.as_bytes());

        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADERS.to_vec());

        let rows: Vec<::csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(&rows[2][0], "Holiday Special");
        assert_eq!(&rows[2][3], "5.99");
        assert_eq!(&rows[3][6], "paused");
    }

    #[test]
    fn test_quotes_in_names_are_escaped() {
        let record = CampaignRecord {
            id: "9".to_string(),
            campaign: "The \"Big\" One, Part 2".to_string(),
            impressions: 10,
            clicks: 1,
            ctr: 10.0,
            conversions: 0,
            revenue: 99.5,
            status: CampaignStatus::Paused,
        };
        let csv = format_csv(&[record]);

        let mut reader = ::csv::Reader::from_reader(csv.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "The \"Big\" One, Part 2");
        assert_eq!(&row[3], "10.00");
        assert_eq!(&row[5], "99.5");
    }

    #[test]
    fn test_ctr_ties_round_up() {
        let record = CampaignRecord {
            id: "1".to_string(),
            campaign: "Tie".to_string(),
            impressions: 8000,
            clicks: 170,
            ctr: 2.125,
            conversions: 3,
            revenue: 120.0,
            status: CampaignStatus::Active,
        };
        let csv = format_csv(&[record]);
        assert_eq!(csv.lines().nth(1), Some("\"Tie\",8000,170,2.13,3,120,active"));
    }
}
