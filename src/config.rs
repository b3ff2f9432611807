use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::search::{DEFAULT_CLEAR_SELECTOR, DEFAULT_HIDING_CLASS, DEFAULT_SENTINEL_CLASS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConnection {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    #[serde(default)]
    pub use_tls: bool,
}

impl DatabaseConnection {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
            use_tls: false,
        }
    }

    pub fn to_connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.database
        )
    }
}

impl Default for DatabaseConnection {
    fn default() -> Self {
        Self::new()
    }
}

/// Element ids and classes used when a table is laid out as a page, plus
/// the knobs for the "no results" row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    pub search_input_id: String,
    pub table_id: String,
    pub clear_selector: String,
    pub sentinel_class: String,
    pub hiding_class: String,
    pub show_no_results_row: bool,
    pub no_results_text: String,
    pub row_limit: i64,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            search_input_id: "search-input".to_string(),
            table_id: "data-table".to_string(),
            clear_selector: DEFAULT_CLEAR_SELECTOR.to_string(),
            sentinel_class: DEFAULT_SENTINEL_CLASS.to_string(),
            hiding_class: DEFAULT_HIDING_CLASS.to_string(),
            show_no_results_row: true,
            no_results_text: "No results found".to_string(),
            row_limit: 10_000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connections: Vec<DatabaseConnection>,
    #[serde(default)]
    pub last_connection_index: Option<usize>,
    #[serde(default)]
    pub search: PageSettings,
}

impl Config {
    pub fn new() -> Self {
        Self {
            connections: vec![],
            last_connection_index: None,
            search: PageSettings::default(),
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::new())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(".config").join("page-search"))
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn get_connection(&self, index: usize) -> Option<&DatabaseConnection> {
        self.connections.get(index)
    }

    pub fn get_last_connection(&self) -> Option<&DatabaseConnection> {
        self.last_connection_index
            .and_then(|idx| self.connections.get(idx))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
