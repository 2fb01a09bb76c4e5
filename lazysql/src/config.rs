///
/// # Database configuration
///
/// Describes how to open a SQLite database, loaded from a small TOML file.
///
/// ## Example lazysql.toml
///
/// ```toml
/// path = "data/app.db"
/// tag = "app"
/// read_only = true
/// busy_timeout_ms = 250
/// ```
///
/// `path` may be `:memory:`. When `tag` is omitted it defaults to the file
/// stem of `path`, or `main` for in-memory databases.
///

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DbError, Result};

pub const MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tag: None,
            read_only: false,
            busy_timeout_ms: None,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MEMORY_PATH)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|reason| DbError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == MEMORY_PATH
    }

    pub fn tag(&self) -> String {
        if let Some(ref tag) = self.tag {
            return tag.clone();
        }
        if self.is_in_memory() {
            return "main".to_string();
        }
        Path::new(&self.path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "main".to_string())
    }
}
