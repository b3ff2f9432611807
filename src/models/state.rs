use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;

use crate::config::Config;
use crate::models::TableSource;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppState {
    pub source: Option<TableSource>,
    #[serde(default)]
    pub expanded_schemas: HashSet<String>,
}

impl AppState {
    pub fn save_path() -> Result<PathBuf> {
        Ok(Config::config_dir()?.join("state.json"))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::save_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::save_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let state: AppState = serde_json::from_str(&content)?;
            Ok(state)
        } else {
            Err(anyhow::anyhow!("State file does not exist"))
        }
    }
}
