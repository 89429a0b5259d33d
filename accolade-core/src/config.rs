use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing;

pub const CONFIG_FILE_NAME: &str = "accolade.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub logbook: LogbookConfig,
}

impl CoreConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        let mut cfg = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str::<CoreConfig>(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        } else {
            tracing::info!(
                "No config file found at {}. Using CoreConfig::default().",
                path.display()
            );
            CoreConfig::default()
        };
        cfg.resolve_paths(root);
        Ok(cfg)
    }

    fn resolve_paths(&mut self, root: &Path) {
        self.rules.path = absolutize(root, &self.rules.path);
        self.logbook.path = absolutize(root, &self.logbook.path);
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            reports: ReportsConfig::default(),
            logbook: LogbookConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "RulesConfig::default_path")]
    pub path: PathBuf,
    #[serde(default = "RulesConfig::default_countries")]
    pub countries: String,
    #[serde(default = "RulesConfig::default_positions")]
    pub positions: String,
    // Restore the embedded copy when the file on disk differs
    #[serde(default = "RulesConfig::default_locked")]
    pub locked: bool,
}

impl RulesConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("rules")
    }

    fn default_countries() -> String {
        rulebook::assets::COUNTRIES_TOML_NAME.to_string()
    }

    fn default_positions() -> String {
        rulebook::assets::POSITIONS_TOML_NAME.to_string()
    }

    fn default_locked() -> bool {
        true
    }

    pub fn countries_path(&self) -> PathBuf {
        self.path.join(&self.countries)
    }

    pub fn positions_path(&self) -> PathBuf {
        self.path.join(&self.positions)
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            countries: Self::default_countries(),
            positions: Self::default_positions(),
            locked: Self::default_locked(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    #[serde(default = "ReportsConfig::default_top_countries")]
    pub top_countries: usize,
    #[serde(default = "ReportsConfig::default_position")]
    pub default_position: String,
}

impl ReportsConfig {
    fn default_top_countries() -> usize {
        5
    }

    fn default_position() -> String {
        "Other".to_string()
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            top_countries: Self::default_top_countries(),
            default_position: Self::default_position(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogbookConfig {
    #[serde(default = "LogbookConfig::default_path")]
    pub path: PathBuf,
    #[serde(default = "LogbookConfig::default_preview_len")]
    pub preview_len: usize,
}

impl LogbookConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("logbook/normalization.jsonl")
    }

    fn default_preview_len() -> usize {
        160
    }
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            preview_len: Self::default_preview_len(),
        }
    }
}

fn absolutize(root: &Path, value: &Path) -> PathBuf {
    if value.is_absolute() {
        value.to_path_buf()
    } else {
        root.join(value)
    }
}
