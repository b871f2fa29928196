use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file consulted when `NOTEBOOK_MCP_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "notebook-mcp.toml";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub notebook: NotebookConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct NotebookConfig {
    /// Base directory against which relative notebook paths resolve.
    /// Absolute paths are used as-is.
    pub root_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).with_context(|| {
            format!("Failed to read config file {}", path.as_ref().display())
        })?;

        let mut config: Config =
            toml::from_str(&content).context("Failed to parse config file")?;

        // Override with environment variable if set
        if let Ok(root) = std::env::var("NOTEBOOK_ROOT_DIR") {
            config.notebook.root_dir = Some(PathBuf::from(root));
        }

        Ok(config)
    }

    /// Load the config file named by `NOTEBOOK_MCP_CONFIG` (falling back to
    /// `notebook-mcp.toml`), or defaults when no file is present. A file
    /// that exists but fails to parse is a hard error, not a fallback.
    pub fn load() -> Result<Self> {
        let path = std::env::var("NOTEBOOK_MCP_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        if Path::new(&path).exists() {
            return Self::from_file(&path);
        }

        let mut config = Config::default();
        if let Ok(root) = std::env::var("NOTEBOOK_ROOT_DIR") {
            config.notebook.root_dir = Some(PathBuf::from(root));
        }
        Ok(config)
    }

    /// Resolve a notebook path against the configured root directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match (&self.notebook.root_dir, path.is_absolute()) {
            (Some(root), false) => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}
