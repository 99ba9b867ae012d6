pub mod extension_config;
pub mod logger_config;
