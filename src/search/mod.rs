//! Live text filtering of table rows driven by a search input.

mod filter;
mod page_search;
mod query;

pub use filter::{filter_rows, row_visible, FilterOutcome};
pub use page_search::{
    data_row_selector, init_page_search, init_page_search_with, sentinel_row_selector, PageSearch,
    PageSearchOptions, DEFAULT_CLEAR_SELECTOR, DEFAULT_HIDING_CLASS, DEFAULT_SENTINEL_CLASS,
};
pub use query::Query;
