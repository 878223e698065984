//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::EntityKind;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Directory pages listing groups and teachers
    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.max_concurrent == 0 {
            return Err(AppError::validation("http.max_concurrent must be > 0"));
        }
        if self.sources.group_directories.is_empty() {
            return Err(AppError::validation("No group directories defined"));
        }
        if self.sources.teacher_directories.is_empty() {
            return Err(AppError::validation("No teacher directories defined"));
        }
        for url in self
            .sources
            .group_directories
            .iter()
            .chain(&self.sources.teacher_directories)
        {
            url::Url::parse(url)
                .map_err(|e| AppError::validation(format!("Bad directory URL {url}: {e}")))?;
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent requests for directory listings and room lookups
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Directory pages per entity kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "defaults::group_directories")]
    pub group_directories: Vec<String>,

    #[serde(default = "defaults::teacher_directories")]
    pub teacher_directories: Vec<String>,
}

impl SourcesConfig {
    /// Directory pages to scan for the given kind. Rooms have none.
    pub fn directories(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Group => &self.group_directories,
            EntityKind::Teacher => &self.teacher_directories,
            EntityKind::Room => &[],
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            group_directories: defaults::group_directories(),
            teacher_directories: defaults::teacher_directories(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level when RUST_LOG is not set
    #[serde(default = "defaults::level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::level(),
        }
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; ulstu-schedule/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        5
    }

    // Source defaults
    pub fn group_directories() -> Vec<String> {
        (1..=3)
            .map(|part| format!("https://old.ulstu.ru/schedule/students/part{part}/raspisan.html"))
            .collect()
    }
    pub fn teacher_directories() -> Vec<String> {
        vec!["https://old.ulstu.ru/schedule/teachers/Praspisan.html".into()]
    }

    // Logging defaults
    pub fn level() -> String {
        "info".into()
    }
}
