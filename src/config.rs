//! # Unified Application Configuration
//!
//! This module provides a centralized configuration object for the detection
//! engine. It supports loading from environment variables, validation, and a
//! one-line summary for startup logging.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Default guard on the number of tokens a single phrase may span
pub const DEFAULT_MAX_PHRASE_LENGTH: usize = 8;

/// Matching engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Phrases spanning more tokens than this are left out of the index
    pub max_phrase_length: usize,
    /// Maximum number of characters accepted for a single phrase
    pub max_phrase_chars: usize,
    /// Maximum number of characters accepted for a group name
    pub max_group_name_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_phrase_length: DEFAULT_MAX_PHRASE_LENGTH,
            max_phrase_chars: 100,
            max_group_name_chars: 100,
        }
    }
}

impl EngineConfig {
    /// Validate engine configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.max_phrase_length == 0 {
            return Err(AppError::Config(
                "max_phrase_length must be greater than 0".to_string(),
            ));
        }

        if self.max_phrase_length > 64 {
            return Err(AppError::Config(
                "max_phrase_length cannot be greater than 64".to_string(),
            ));
        }

        if self.max_phrase_chars == 0 {
            return Err(AppError::Config(
                "max_phrase_chars must be greater than 0".to_string(),
            ));
        }

        if self.max_group_name_chars == 0 {
            return Err(AppError::Config(
                "max_group_name_chars must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Structured logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Environment name (development, staging, production)
    pub environment: String,
    /// Log level for the crate's own targets
    pub log_level: String,
    /// Output format: "pretty" or "json"
    pub log_format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Check if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Whether human-readable output should be used
    pub fn use_pretty_format(&self) -> bool {
        self.is_development() || self.log_format == "pretty"
    }

    /// Validate logging configuration
    pub fn validate(&self) -> AppResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "Invalid log level: {}",
                self.log_level
            )));
        }

        if self.log_format != "pretty" && self.log_format != "json" {
            return Err(AppError::Config(format!(
                "Invalid log format: {}. Expected 'pretty' or 'json'",
                self.log_format
            )));
        }

        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Matching engine configuration
    pub engine: EngineConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Explicit location of the default groups JSON file
    pub default_groups_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        config.engine.max_phrase_length = env::var("MAX_PHRASE_LENGTH")
            .unwrap_or_else(|_| DEFAULT_MAX_PHRASE_LENGTH.to_string())
            .parse()
            .map_err(|_| AppError::Config("MAX_PHRASE_LENGTH must be a valid number".to_string()))?;
        config.engine.max_phrase_chars = env::var("MAX_PHRASE_CHARS")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|_| AppError::Config("MAX_PHRASE_CHARS must be a valid number".to_string()))?;

        config.logging.environment =
            env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        config.logging.log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        config.logging.log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

        config.default_groups_path = env::var("DEFAULT_GROUPS_CONFIG_PATH").ok();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.engine.validate()?;
        self.logging.validate()?;

        if let Some(path) = &self.default_groups_path {
            if path.trim().is_empty() {
                return Err(AppError::Config(
                    "DEFAULT_GROUPS_CONFIG_PATH cannot be empty if provided".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: environment={}, log_level={}, max_phrase_length={}, default_groups_path={}",
            self.logging.environment,
            self.logging.log_level,
            self.engine.max_phrase_length,
            self.default_groups_path.as_deref().unwrap_or("<built-in>")
        )
    }
}
