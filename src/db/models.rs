use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct SchemaInfo {
    pub name: String,
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_foreign_key: bool,
}

impl ColumnInfo {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: String::new(),
            is_primary_key: false,
            is_foreign_key: false,
        }
    }
}
