mod models;
mod client;
mod operations;

pub use models::{ColumnInfo, SchemaInfo};
pub use client::{quote_ident, Database};
pub use operations::AsyncOperation;
