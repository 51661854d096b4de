//! Campaign Table View Model
//!
//! Sorted, paginated projection of the campaign records.
//!
//! ```rust
//! use insights::data::seed;
//! use insights::table::{SortField, TableViewState};
//!
//! let records = seed::campaigns();
//! let mut state = TableViewState::default();
//!
//! state.set_sort(SortField::Campaign); // campaign, descending
//! state.set_page(2);
//!
//! let page = state.page_view(&records);
//! assert_eq!(page.total_pages, 2);
//! assert_eq!(page.rows.len(), 1);
//! ```

mod view;

pub use view::{
    PageView, ParseSortFieldError, SortDirection, SortField, TableViewState, DEFAULT_PAGE_SIZE,
};
