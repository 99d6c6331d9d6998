//! User settings loaded from `config.toml`, `.env` and the environment

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::roster::excel::DEFAULT_DATE_FORMAT;
use crate::roster::import::ImportOptions;
use crate::roster::types::DEFAULT_RETIREMENT_YEARS;

/// Environment variable overriding the database location
pub const DATABASE_ENV: &str = "HRMS_DATABASE";

const APP_DIR: &str = "hrms";
const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "hrms.db";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite file path or `sqlite:` URL
    pub database: String,
    pub import: ImportSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Fill an empty DATE OF RETIREMENT from DATE OF JOINING
    pub derive_retirement: bool,
    pub retirement_age_years: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Excel number format for date cells
    pub date_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            import: ImportSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            derive_retirement: false,
            retirement_age_years: DEFAULT_RETIREMENT_YEARS,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Settings {
    /// Location of the settings file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load settings: file if present, then `.env` and environment overrides
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut settings = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Ok(database) = std::env::var(DATABASE_ENV) {
            if !database.trim().is_empty() {
                settings.database = database;
            }
        }

        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse settings")
    }

    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            derive_retirement: self.import.derive_retirement,
            retirement_age_years: self.import.retirement_age_years,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join(DATABASE_FILE))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
        .to_string_lossy()
        .into_owned()
}
