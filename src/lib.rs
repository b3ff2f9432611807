//! Live row filtering for tables laid out as pages.
//!
//! A search input, an optional clear button and an optional "no results"
//! row are wired to a table with [`search::init_page_search`]. Every `input`
//! event lowercases and trims the query and hides each body row whose text
//! does not contain it. The [`dom`] module provides the small retained page
//! model this runs against; [`app`] renders it with egui over tables loaded
//! from PostgreSQL or JSON files.
//!
//! ```
//! use page_search::config::PageSettings;
//! use page_search::dom::EventType;
//! use page_search::models::{PageBuilder, TableData};
//! use page_search::search::init_page_search;
//!
//! let data = TableData::new(
//!     "recipes",
//!     &["Name"],
//!     vec![vec!["Apple Pie".into()], vec!["Banana Bread".into()]],
//! );
//! let mut doc = PageBuilder::new(&PageSettings::default()).build(&data);
//! init_page_search(&mut doc, "search-input", "data-table", None);
//! doc.finish_parsing();
//!
//! let input = doc.get_element_by_id("search-input").unwrap();
//! doc.element_mut(input).value = "bread".into();
//! doc.dispatch_event(input, EventType::Input);
//! ```

pub mod app;
pub mod config;
pub mod db;
pub mod dom;
pub mod models;
pub mod search;
pub mod ui;
