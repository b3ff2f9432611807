use poll_promise::Promise;
use anyhow::Result;
use std::sync::Arc;
use crate::db::{Database, SchemaInfo};
use crate::models::{TableData, TableSource};

pub enum AsyncOperation {
    LoadStructure(Promise<Result<(Arc<Database>, Vec<SchemaInfo>)>>),
    LoadTable(TableSource, Promise<Result<TableData>>),
}

impl AsyncOperation {
    pub fn describe(&self) -> String {
        match self {
            AsyncOperation::LoadStructure(_) => "Connecting...".to_string(),
            AsyncOperation::LoadTable(source, _) => format!("Loading {}...", source.title()),
        }
    }
}
