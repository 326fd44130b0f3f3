//! Authgate core - configuration management shared by the service crates.

pub mod config;

pub use config::{
    AppConfig, CacheConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig,
};
