mod page;
mod state;
mod table;

pub use page::PageBuilder;
pub use state::AppState;
pub use table::{TableData, TableSource};
