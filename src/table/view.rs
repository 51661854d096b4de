//! Table view state
//!
//! Sort key, sort direction and current page over a fixed campaign list.
//! The state never owns or mutates records; `sorted_view` and `page_view`
//! derive fresh projections on every call.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

use crate::data::CampaignRecord;

/// Rows per page
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Sortable campaign attribute
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Campaign,
    Impressions,
    Clicks,
    Ctr,
    Conversions,
    Revenue,
    Status,
}

impl SortField {
    pub fn all() -> &'static [SortField] {
        &[
            SortField::Campaign,
            SortField::Impressions,
            SortField::Clicks,
            SortField::Ctr,
            SortField::Conversions,
            SortField::Revenue,
            SortField::Status,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Campaign => "campaign",
            SortField::Impressions => "impressions",
            SortField::Clicks => "clicks",
            SortField::Ctr => "ctr",
            SortField::Conversions => "conversions",
            SortField::Revenue => "revenue",
            SortField::Status => "status",
        }
    }

    /// Ascending comparison of two records on this field
    pub fn compare(&self, a: &CampaignRecord, b: &CampaignRecord) -> Ordering {
        match self {
            SortField::Campaign => collate(&a.campaign, &b.campaign),
            SortField::Impressions => a.impressions.cmp(&b.impressions),
            SortField::Clicks => a.clicks.cmp(&b.clicks),
            SortField::Ctr => a.ctr.total_cmp(&b.ctr),
            SortField::Conversions => a.conversions.cmp(&b.conversions),
            SortField::Revenue => a.revenue.total_cmp(&b.revenue),
            SortField::Status => collate(a.status.as_str(), b.status.as_str()),
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown sort field name
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown sort field: {0}")]
pub struct ParseSortFieldError(pub String);

impl FromStr for SortField {
    type Err = ParseSortFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        SortField::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == name)
            .ok_or_else(|| ParseSortFieldError(s.to_string()))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Case-insensitive comparison, lowercase before uppercase on ties
fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

/// Sort and pagination state of the campaign table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableViewState {
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// 1-based
    pub current_page: usize,
    pub page_size: usize,
}

impl Default for TableViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// One page of the sorted table plus the numbers needed for
/// "Showing X to Y of Z" and the previous/next controls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageView {
    pub rows: Vec<CampaignRecord>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_records: usize,
    /// 1-based index of the first row shown, 0 when nothing is shown
    pub first_index: usize,
    /// 1-based index of the last row shown, 0 when nothing is shown
    pub last_index: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl TableViewState {
    /// Initial state: revenue, descending, first page
    pub fn new(page_size: usize) -> Self {
        Self {
            sort_field: SortField::Revenue,
            sort_direction: SortDirection::Desc,
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Select a sort column
    ///
    /// Clicking the active column flips the direction; a new column always
    /// starts descending. The current page is left as is.
    pub fn set_sort(&mut self, field: SortField) {
        if field == self.sort_field {
            self.sort_direction = self.sort_direction.flip();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Desc;
        }
    }

    /// Jump to a page
    ///
    /// Callers keep `page` within `1..=total_pages`; this does not clamp.
    pub fn set_page(&mut self, page: usize) {
        debug_assert!(page >= 1, "pages are 1-based");
        self.current_page = page;
    }

    pub fn total_pages(&self, record_count: usize) -> usize {
        record_count.div_ceil(self.page_size)
    }

    /// Whether `page` is a valid target for `record_count` records
    pub fn is_valid_page(&self, page: usize, record_count: usize) -> bool {
        page >= 1 && page <= self.total_pages(record_count)
    }

    /// Pull the current page back into range after the record count changed
    pub fn clamp_page(&mut self, record_count: usize) {
        self.current_page = self.current_page.min(self.total_pages(record_count)).max(1);
    }

    /// All records ordered by the active field and direction
    ///
    /// Stable: records that compare equal keep their input order.
    pub fn sorted_view(&self, records: &[CampaignRecord]) -> Vec<CampaignRecord> {
        let mut sorted = records.to_vec();
        let field = self.sort_field;
        let direction = self.sort_direction;
        sorted.sort_by(|a, b| direction.apply(field.compare(a, b)));
        sorted
    }

    /// The current page of the sorted view
    pub fn page_view(&self, records: &[CampaignRecord]) -> PageView {
        let total_records = records.len();
        let total_pages = self.total_pages(total_records);
        let start = (self.current_page.max(1) - 1) * self.page_size;

        let rows: Vec<CampaignRecord> = self
            .sorted_view(records)
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        let (first_index, last_index) = if rows.is_empty() {
            (0, 0)
        } else {
            (start + 1, start + rows.len())
        };

        PageView {
            page: self.current_page,
            page_size: self.page_size,
            total_pages,
            total_records,
            first_index,
            last_index,
            has_previous: self.current_page > 1,
            has_next: self.current_page < total_pages,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{seed, CampaignStatus};

    fn names(rows: &[CampaignRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.campaign.as_str()).collect()
    }

    fn record(id: &str, name: &str, revenue: f64) -> CampaignRecord {
        CampaignRecord {
            id: id.to_string(),
            campaign: name.to_string(),
            impressions: 1000,
            clicks: 10,
            ctr: 1.0,
            conversions: 1,
            revenue,
            status: CampaignStatus::Active,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = TableViewState::default();
        assert_eq!(state.sort_field, SortField::Revenue);
        assert_eq!(state.sort_direction, SortDirection::Desc);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.page_size, 5);
    }

    #[test]
    fn test_new_field_starts_descending() {
        let mut state = TableViewState::default();
        state.set_sort(SortField::Campaign);
        assert_eq!(state.sort_field, SortField::Campaign);
        assert_eq!(state.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_same_field_flips() {
        let mut state = TableViewState::default();
        state.set_sort(SortField::Campaign);
        state.set_sort(SortField::Campaign);
        assert_eq!(state.sort_field, SortField::Campaign);
        assert_eq!(state.sort_direction, SortDirection::Asc);

        state.set_sort(SortField::Campaign);
        assert_eq!(state.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_switching_field_after_ascending_resets_to_descending() {
        let mut state = TableViewState::default();
        state.set_sort(SortField::Revenue);
        assert_eq!(state.sort_direction, SortDirection::Asc);
        state.set_sort(SortField::Clicks);
        assert_eq!(state.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_sort_keeps_page() {
        let mut state = TableViewState::default();
        state.set_page(2);
        state.set_sort(SortField::Campaign);
        assert_eq!(state.current_page, 2);
    }

    #[test]
    fn test_revenue_descending_pages() {
        let records = seed::campaigns();
        let mut state = TableViewState::default();

        let page1 = state.page_view(&records);
        assert_eq!(page1.total_pages, 2);
        assert_eq!(
            names(&page1.rows),
            vec![
                "Holiday Special",
                "Summer Sale 2024",
                "Retargeting Campaign",
                "Mobile App Install",
                "Brand Awareness Q1",
            ]
        );
        assert_eq!((page1.first_index, page1.last_index), (1, 5));
        assert!(!page1.has_previous);
        assert!(page1.has_next);

        state.set_page(2);
        let page2 = state.page_view(&records);
        assert_eq!(names(&page2.rows), vec!["Product Launch"]);
        assert_eq!((page2.first_index, page2.last_index), (6, 6));
        assert_eq!(page2.total_records, 6);
        assert!(page2.has_previous);
        assert!(!page2.has_next);
    }

    #[test]
    fn test_descending_is_reverse_of_ascending() {
        let records = seed::campaigns();
        // Seed data has no ties on any of these fields
        for field in [
            SortField::Campaign,
            SortField::Impressions,
            SortField::Clicks,
            SortField::Ctr,
            SortField::Conversions,
            SortField::Revenue,
        ] {
            let asc = TableViewState {
                sort_field: field,
                sort_direction: SortDirection::Asc,
                ..Default::default()
            };
            let desc = TableViewState {
                sort_direction: SortDirection::Desc,
                ..asc
            };

            let mut reversed = desc.sorted_view(&records);
            reversed.reverse();
            assert_eq!(asc.sorted_view(&records), reversed, "field {}", field);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![
            record("a", "Alpha", 100.0),
            record("b", "Beta", 200.0),
            record("c", "Gamma", 100.0),
            record("d", "Delta", 100.0),
        ];

        let state = TableViewState::default();
        let ids: Vec<String> = state.sorted_view(&records).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "a", "c", "d"]);

        // Repeated calls give the same order
        assert_eq!(state.sorted_view(&records), state.sorted_view(&records));

        let asc = TableViewState {
            sort_direction: SortDirection::Asc,
            ..state
        };
        let ids: Vec<String> = asc.sorted_view(&records).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_pages_cover_sorted_view() {
        let mut records = seed::campaigns();
        for i in 0..17 {
            records.push(record(&format!("x{}", i), &format!("Extra {}", i), (i * 37 % 11) as f64));
        }

        for page_size in [1, 3, 5, 7, 23, 50] {
            let mut state = TableViewState::new(page_size);
            state.set_sort(SortField::Campaign);

            let mut concatenated = Vec::new();
            for page in 1..=state.total_pages(records.len()) {
                state.set_page(page);
                let view = state.page_view(&records);
                assert!(view.rows.len() <= page_size);
                concatenated.extend(view.rows);
            }
            assert_eq!(concatenated, state.sorted_view(&records), "page size {}", page_size);
        }
    }

    #[test]
    fn test_campaign_collation_ignores_case() {
        let records = vec![
            record("1", "banana", 0.0),
            record("2", "Apple", 0.0),
            record("3", "cherry", 0.0),
        ];
        let state = TableViewState {
            sort_field: SortField::Campaign,
            sort_direction: SortDirection::Asc,
            ..Default::default()
        };
        assert_eq!(names(&state.sorted_view(&records)), vec!["Apple", "banana", "cherry"]);
        assert_eq!(collate("apple", "Apple"), Ordering::Less);
    }

    #[test]
    fn test_status_sorts_by_name() {
        let mut state = TableViewState::default();
        state.set_sort(SortField::Status);
        state.set_sort(SortField::Status);
        let statuses: Vec<_> = state
            .sorted_view(&seed::campaigns())
            .into_iter()
            .map(|r| r.status)
            .collect();
        assert_eq!(statuses.first(), Some(&CampaignStatus::Active));
        assert_eq!(statuses.last(), Some(&CampaignStatus::Paused));
    }

    #[test]
    fn test_empty_dataset() {
        let state = TableViewState::default();
        let view = state.page_view(&[]);
        assert!(view.rows.is_empty());
        assert_eq!(view.total_pages, 0);
        assert_eq!((view.first_index, view.last_index), (0, 0));
        assert!(!view.has_next);
    }

    #[test]
    fn test_clamp_page() {
        let mut state = TableViewState::default();
        state.set_page(4);
        state.clamp_page(12);
        assert_eq!(state.current_page, 3);
        state.clamp_page(0);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_page_validity() {
        let state = TableViewState::default();
        assert!(state.is_valid_page(1, 6));
        assert!(state.is_valid_page(2, 6));
        assert!(!state.is_valid_page(0, 6));
        assert!(!state.is_valid_page(3, 6));
    }

    #[test]
    fn test_parse_sort_field() {
        assert_eq!("revenue".parse::<SortField>(), Ok(SortField::Revenue));
        assert_eq!(" CTR ".parse::<SortField>(), Ok(SortField::Ctr));
        assert!("id".parse::<SortField>().is_err());
    }

    #[test]
    fn test_state_serde_names() {
        let json = serde_json::to_string(&TableViewState::default()).unwrap();
        assert!(json.contains("\"sort_field\":\"revenue\""));
        assert!(json.contains("\"sort_direction\":\"desc\""));
    }
}
