//! CLI configuration via environment variables
//!
//! Quill uses environment variables for optional configuration.
//! Command-line flags override them.

use std::env;

/// Log filter used when `QUILL_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Default to JSON diagnostic output (QUILL_DIAGNOSTICS=json)
    pub default_json: bool,
    /// Disable colored output (QUILL_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Log filter directives for env_logger (QUILL_LOG, e.g. "debug")
    pub log_filter: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            default_json: env::var("QUILL_DIAGNOSTICS")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            no_color: env::var("QUILL_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok(),
            log_filter: env::var("QUILL_LOG")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    /// Install the global logger
    ///
    /// Runtime log records go to stderr, filtered by `log_filter`.
    pub fn init_logging(&self) {
        let write_style = if self.no_color {
            env_logger::WriteStyle::Never
        } else {
            env_logger::WriteStyle::Auto
        };

        // A logger installed earlier (e.g. by a test harness) wins
        let _ = env_logger::Builder::new()
            .parse_filters(&self.log_filter)
            .write_style(write_style)
            .try_init();
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    // Environment variables are process-wide, so every case runs in one test
    #[test]
    fn test_config_from_env() {
        env::remove_var("QUILL_DIAGNOSTICS");
        env::remove_var("QUILL_NO_COLOR");
        env::remove_var("NO_COLOR");
        env::remove_var("QUILL_LOG");

        let config = Config::from_env();
        assert!(!config.default_json);
        assert!(!config.no_color);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);

        env::set_var("QUILL_DIAGNOSTICS", "JSON");
        env::set_var("NO_COLOR", "1");
        env::set_var("QUILL_LOG", "quill_runtime=debug");
        let config = Config::from_env();
        assert!(config.default_json);
        assert!(config.no_color);
        assert_eq!(config.log_filter, "quill_runtime=debug");

        env::remove_var("QUILL_DIAGNOSTICS");
        env::remove_var("NO_COLOR");
        env::remove_var("QUILL_LOG");
    }
}
