mod data_grid;
mod database_tree;
mod menu_bar;
mod search_bar;
mod status_bar;

pub use data_grid::{DataGrid, GridView};
pub use database_tree::{DatabaseTree, DatabaseTreeEvent};
pub use menu_bar::{MenuBar, MenuBarEvent};
pub use search_bar::{SearchBar, SearchBarEvent};
pub use status_bar::StatusBar;
