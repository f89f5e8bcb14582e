// src/core/config_manager.rs
//! Configuration loading: `config.yaml` sections per environment, then env overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::FsOps;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub settings: StoreSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub database_path: PathBuf,
    #[serde(default = "default_owner")]
    pub default_owner: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: Option<StoreSettings>,
    production: Option<StoreSettings>,
}

fn default_owner() -> String {
    "local".to_string()
}

fn default_log_filter() -> String {
    "field_templates=info".to_string()
}

impl StoreSettings {
    pub fn defaults_for(environment: &str) -> Self {
        let database_path = if environment == "production" {
            PathBuf::from("/app/data/saved_fields.db")
        } else {
            PathBuf::from("data/saved_fields.db")
        };

        Self {
            database_path,
            default_owner: default_owner(),
            log_filter: default_log_filter(),
        }
    }
}

impl ConfigManager {
    /// Load configuration for the current environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        let config_path = std::env::var("FIELDS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.yaml"));

        let mut config = Self::load_from(&environment, &config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.settings.database_path = Self::resolve_path(&config.settings.database_path)?;
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("FIELDS_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Read `config_path` if it exists; otherwise use the environment defaults
    pub fn load_from(environment: &str, config_path: &Path) -> Result<Self> {
        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::parse_config(&content, environment)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
                .unwrap_or_else(|| StoreSettings::defaults_for(environment))
        } else {
            StoreSettings::defaults_for(environment)
        };

        Ok(Self {
            environment: environment.to_string(),
            settings,
        })
    }

    /// Pick the section matching `environment` out of a YAML config
    pub fn parse_config(content: &str, environment: &str) -> Result<Option<StoreSettings>> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    /// Apply `FIELDS_DATABASE_PATH`, `FIELDS_OWNER` and `FIELDS_LOG_FILTER`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("FIELDS_DATABASE_PATH") {
            self.settings.database_path = PathBuf::from(path);
        }
        if let Some(owner) = lookup("FIELDS_OWNER") {
            self.settings.default_owner = owner;
        }
        if let Some(filter) = lookup("FIELDS_LOG_FILTER") {
            self.settings.log_filter = filter;
        }
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure the database directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        FsOps::ensure_parent_dir(&self.settings.database_path).await
    }
}
