use serde::{Deserialize, Serialize};

use crate::config::logger_config::LoggerConfig;

/// Configuration applied by [`crate::binding::InitObject`] during init.
/// Please use [`ExtensionConfigBuilder`] if you want to build it from code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Name of the extension, used as the log prefix.
    pub(crate) extension_name: String,
    /// Logger configuration to use. `None` leaves logging to the host process.
    #[serde(default)]
    pub(crate) logger_config: Option<LoggerConfig>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self { extension_name: "gdextension".to_string(), logger_config: Some(Default::default()) }
    }
}

impl ExtensionConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn extension_name(&self) -> &str {
        &self.extension_name
    }

    pub fn logger_config(&self) -> Option<&LoggerConfig> {
        self.logger_config.as_ref()
    }
}

/// `ExtensionConfigBuilder` is a convenience builder to create an `ExtensionConfig` from code.
pub struct ExtensionConfigBuilder {
    config: ExtensionConfig,
}

impl ExtensionConfigBuilder {
    pub fn new() -> Self {
        Self { config: Default::default() }
    }

    pub fn with_extension_name(mut self, name: impl Into<String>) -> Self {
        self.config.extension_name = name.into();
        self
    }

    pub fn with_logger_config(mut self, logger_config: LoggerConfig) -> Self {
        self.config.logger_config = Some(logger_config);
        self
    }

    /// Leaves the `log` backend uninstalled.
    pub fn without_logger(mut self) -> Self {
        self.config.logger_config = None;
        self
    }

    /// Retrieves the configuration built
    pub fn get(self) -> ExtensionConfig {
        self.config
    }
}

impl Default for ExtensionConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
