use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `app_level_filter`.
pub const LOG_ENV: &str = "GDSCAFFOLD_LOG";

/// Logger configuration used by the extension.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Filter for the extension's own crates.
    pub app_level_filter: LevelFilter,
    /// Filter for every other target.
    pub level_filter: LevelFilter,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { app_level_filter: LevelFilter::Info, level_filter: LevelFilter::Info }
    }
}

impl LoggerConfig {
    /// Applies an override given as a level name (`trace`, `debug`, ...).
    /// Unparseable values leave the config untouched.
    pub fn with_override(mut self, value: Option<&str>) -> Self {
        if let Some(filter) = value.and_then(|v| LevelFilter::from_str(v.trim()).ok()) {
            self.app_level_filter = filter;
        }
        self
    }

    /// Applies the `GDSCAFFOLD_LOG` override, if set.
    pub fn with_env_override(self) -> Self {
        let value = std::env::var(LOG_ENV).ok();
        self.with_override(value.as_deref())
    }
}
