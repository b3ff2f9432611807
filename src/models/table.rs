use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::ColumnInfo;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(name: &str, columns: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| ColumnInfo::named(c)).collect(),
            rows,
        }
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading table file {}", path.display()))?;
        let data: TableData = serde_json::from_str(&content)
            .with_context(|| format!("parsing table file {}", path.display()))?;
        Ok(data)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Where the current table came from, kept so it can be reloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableSource {
    Table { schema: String, table: String },
    Query { sql: String },
    File { path: PathBuf },
}

impl TableSource {
    /// Parses `schema.table`, defaulting the schema to `public`.
    pub fn table(qualified: &str) -> Self {
        match qualified.split_once('.') {
            Some((schema, table)) => TableSource::Table {
                schema: schema.to_string(),
                table: table.to_string(),
            },
            None => TableSource::Table {
                schema: "public".to_string(),
                table: qualified.to_string(),
            },
        }
    }

    pub fn title(&self) -> String {
        match self {
            TableSource::Table { schema, table } => format!("{}.{}", schema, table),
            TableSource::Query { .. } => "Query Result".to_string(),
            TableSource::File { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    pub fn needs_database(&self) -> bool {
        !matches!(self, TableSource::File { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.json");
        fs::write(
            &path,
            r#"{
                "name": "courses",
                "columns": [{ "name": "title" }, { "name": "level", "data_type": "text" }],
                "rows": [["Algebra", "Grade 10"], ["Biology", "Grade 11"]]
            }"#,
        )
        .unwrap();

        let data = TableData::load_json(&path).unwrap();
        assert_eq!(data.columns[0].name, "title");
        assert_eq!(data.columns[0].data_type, "");
        assert!(!data.columns[0].is_primary_key);
        assert_eq!(data.rows.len(), 2);

        let copy = dir.path().join("out").join("copy.json");
        data.save_json(&copy).unwrap();
        assert_eq!(TableData::load_json(&copy).unwrap(), data);
    }

    #[test]
    fn test_load_json_reports_path() {
        let err = TableData::load_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("here.json"));
    }

    #[test]
    fn test_table_source_parsing() {
        assert_eq!(
            TableSource::table("dashboard.payments"),
            TableSource::Table { schema: "dashboard".to_string(), table: "payments".to_string() }
        );
        assert_eq!(TableSource::table("courses").title(), "public.courses");
        assert_eq!(TableSource::File { path: PathBuf::from("/tmp/a.json") }.title(), "a.json");
        assert!(!TableSource::File { path: PathBuf::from("a.json") }.needs_database());
        assert!(TableSource::Query { sql: "select 1".to_string() }.needs_database());
    }
}
