use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::constants::{
    DEFAULT_MAX_PER_PAGE, DEFAULT_PER_PAGE, ENV_FIRST_DAY_OF_WEEK, ENV_MAX_PER_PAGE, ENV_PER_PAGE,
    LARGE_PAGE_WARN_THRESHOLD,
};

// =============================================================================
// First Day Of Week
// =============================================================================

/// Locale setting for the start of the week ("this week" filters)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstDayOfWeek {
    #[default]
    Monday,
    Sunday,
}

impl FirstDayOfWeek {
    pub fn weekday(&self) -> Weekday {
        match self {
            FirstDayOfWeek::Monday => Weekday::Mon,
            FirstDayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

impl fmt::Display for FirstDayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirstDayOfWeek::Monday => write!(f, "monday"),
            FirstDayOfWeek::Sunday => write!(f, "sunday"),
        }
    }
}

impl FromStr for FirstDayOfWeek {
    type Err = anyhow::Error;

    /// Accepts names and ISO day numbers (`1` = Monday, `7` = Sunday)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" | "1" => Ok(FirstDayOfWeek::Monday),
            "sunday" | "sun" | "7" => Ok(FirstDayOfWeek::Sunday),
            other => anyhow::bail!("Unsupported first day of week: {}", other),
        }
    }
}

// =============================================================================
// File Config
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    first_day_of_week: Option<FirstDayOfWeek>,
    default_per_page: Option<u32>,
    max_per_page: Option<u32>,
    #[serde(flatten)]
    extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Query Config
// =============================================================================

/// Settings consumed by the query core
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryConfig {
    pub first_day_of_week: FirstDayOfWeek,
    pub default_per_page: u32,
    pub max_per_page: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            first_day_of_week: FirstDayOfWeek::default(),
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: DEFAULT_MAX_PER_PAGE,
        }
    }
}

impl QueryConfig {
    /// Load configuration
    ///
    /// Priority (highest wins):
    /// 1. Environment variables
    /// 2. JSON config file (if a path is given)
    /// 3. Defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        tracing::debug!("Loading query configuration");

        let mut config = Self::default();

        if let Some(path) = path {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            let file_config = FileConfig::load_from_file(path)?;
            file_config.warn_unknown_fields();
            config.apply_file(file_config);
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        tracing::debug!(
            first_day_of_week = %config.first_day_of_week,
            default_per_page = config.default_per_page,
            max_per_page = config.max_per_page,
            "Query configuration loaded"
        );
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(day) = file.first_day_of_week {
            self.first_day_of_week = day;
        }
        if let Some(per_page) = file.default_per_page {
            self.default_per_page = per_page;
        }
        if let Some(max) = file.max_per_page {
            self.max_per_page = max;
        }
    }

    /// Apply environment overrides through a lookup function
    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(day) = lookup(ENV_FIRST_DAY_OF_WEEK) {
            self.first_day_of_week = day
                .parse()
                .with_context(|| format!("Invalid {}", ENV_FIRST_DAY_OF_WEEK))?;
        }
        if let Some(per_page) = lookup(ENV_PER_PAGE) {
            self.default_per_page = per_page
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", ENV_PER_PAGE, per_page))?;
        }
        if let Some(max) = lookup(ENV_MAX_PER_PAGE) {
            self.max_per_page = max
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", ENV_MAX_PER_PAGE, max))?;
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_per_page == 0 {
            anyhow::bail!("Configuration error: max_per_page must be greater than 0");
        }
        if self.default_per_page > self.max_per_page {
            anyhow::bail!(
                "Configuration error: default_per_page ({}) exceeds max_per_page ({})",
                self.default_per_page,
                self.max_per_page
            );
        }
        if self.max_per_page > LARGE_PAGE_WARN_THRESHOLD {
            tracing::warn!(
                max_per_page = self.max_per_page,
                "max_per_page is very large, single pages may be slow to load"
            );
        }
        Ok(())
    }
}
