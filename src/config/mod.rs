//! Configuration
//!
//! Configuration is loaded in order of precedence:
//! 1. Command-line flags (highest priority, applied by `main`)
//! 2. Environment variables
//! 3. Config file (~/.config/blogdeck/config.toml)
//! 4. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

mod observability;
mod serialization;


pub use observability::{LogRotation, LoggingConfig};
use observability::FileLogging;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_API_BASE: &str = "https://acm-blog-backend.vercel.app";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_THEME: &str = "dark";

/// Which view the TUI opens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartView {
    #[default]
    Tabs,
    Gallery,
}

impl StartView {
    /// Parse from config; unknown values fall back to tabs
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "gallery" | "grid" => Self::Gallery,
            _ => Self::Tabs,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tabs => "tabs",
            Self::Gallery => "gallery",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the blog API (without `/api/blogs`)
    pub api_base: String,

    /// Per-request timeout for list and detail fetches
    pub request_timeout: Duration,

    /// Theme name: dark, light, nord
    pub theme: String,

    pub start_view: StartView,

    /// Serve bundled posts instead of calling the API (runtime only)
    pub demo_mode: bool,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            theme: DEFAULT_THEME.to_string(),
            start_view: StartView::default(),
            demo_mode: false,
            logging: LoggingConfig::default(),
        }
    }
}

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub api_base: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub theme: Option<String>,
    pub start_view: Option<String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

impl Config {
    /// Get the config file path: ~/.config/blogdeck/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("blogdeck").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Overwrite the config file with defaults
    pub fn reset_file() -> anyhow::Result<PathBuf> {
        use anyhow::Context;

        let path = Self::config_path().context("Cannot determine home directory")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, Self::default().to_toml())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but cannot be read or parsed is fatal: the
    /// user should fix it rather than debug silently applied defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::parse_file_config(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - Numbers written as strings (request_timeout_secs = 15)");
                    eprintln!("    - Typos in key or section names\n");
                    eprintln!("  To reset, run `blogdeck config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Self {
        Self::resolve(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Layer environment lookups over a parsed file
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let api_base = env("BLOGDECK_API_BASE")
            .or(file.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let timeout_secs = env("BLOGDECK_TIMEOUT")
            .and_then(|v| v.parse().ok())
            .or(file.request_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let theme = env("BLOGDECK_THEME")
            .or(file.theme)
            .unwrap_or_else(|| DEFAULT_THEME.to_string());

        // File only
        let start_view = file
            .start_view
            .as_deref()
            .map(StartView::parse)
            .unwrap_or_default();

        // Env only (runtime flag)
        let demo_mode = env("BLOGDECK_DEMO")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            api_base,
            request_timeout: Duration::from_secs(timeout_secs),
            theme,
            start_view,
            demo_mode,
            logging: LoggingConfig::from_file(file.logging),
        }
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, api_base: Option<String>, demo: bool, gallery: bool) -> Self {
        if let Some(api_base) = api_base {
            self.api_base = api_base;
        }
        if demo {
            self.demo_mode = true;
        }
        if gallery {
            self.start_view = StartView::Gallery;
        }
        self
    }

    /// Host part of the API base, for the status bar
    pub fn api_host(&self) -> &str {
        let without_scheme = self
            .api_base
            .split_once("://")
            .map_or(self.api_base.as_str(), |(_, rest)| rest);
        without_scheme.split('/').next().unwrap_or(without_scheme)
    }
}
