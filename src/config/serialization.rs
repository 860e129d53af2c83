//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML file
    ///
    /// Runtime-only settings (demo mode) are not persisted.
    pub fn to_toml(&self) -> String {
        format!(
            r#"# blogdeck configuration

# Blog API base URL (env: BLOGDECK_API_BASE)
api_base = "{api_base}"

# Seconds before a list or detail request gives up (env: BLOGDECK_TIMEOUT)
request_timeout_secs = {timeout}

# Theme: dark, light, nord (env: BLOGDECK_THEME, 't' cycles in the TUI)
theme = "{theme}"

# View on startup: tabs, gallery
start_view = "{start_view}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# JSON file logging (in addition to the TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            api_base = self.api_base,
            timeout = self.request_timeout.as_secs(),
            theme = self.theme,
            start_view = self.start_view.as_str(),
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string().replace('\\', "/"),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
