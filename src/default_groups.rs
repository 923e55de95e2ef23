//! # Default Groups
//!
//! The predefined ingredient categories (Allergens, Preservatives, Artificial
//! Colors, Sweeteners, Additives, Fats & Oils) and their JSON loading.
//!
//! Lookup order for [`load_default_groups_config`]:
//!
//! 1. The explicit path (usually `DEFAULT_GROUPS_CONFIG_PATH`)
//! 2. `/app/config/default_groups.json`, `config/default_groups.json`,
//!    `../config/default_groups.json`
//! 3. The copy compiled into the binary
//!
//! Expected JSON structure:
//! ```json
//! {
//!   "groups": [
//!     { "id": "1", "name": "Allergens", "icon": "warning", "color": "#F44336",
//!       "words": ["peanut", "tree nut", "milk"] }
//!   ]
//! }
//! ```

use crate::errors::{error_logging, AppError, AppResult};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

fn default_enabled() -> bool {
    true
}

/// A predefined group as described in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSeed {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Display icon name
    #[serde(default)]
    pub icon: Option<String>,
    /// Display color
    pub color: String,
    /// Ingredient phrases
    pub words: Vec<String>,
    /// Whether the group starts enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Default groups configuration loaded from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultGroupsConfig {
    pub groups: Vec<GroupSeed>,
}

impl DefaultGroupsConfig {
    /// Validate default groups configuration
    pub fn validate(&self) -> AppResult<()> {
        let mut seen = HashSet::new();
        for (i, group) in self.groups.iter().enumerate() {
            if group.id.trim().is_empty() {
                return Err(AppError::Config(format!("groups[{}].id cannot be empty", i)));
            }
            if !seen.insert(group.id.trim()) {
                return Err(AppError::Config(format!(
                    "groups[{}].id '{}' is duplicated",
                    i, group.id
                )));
            }
            if group.name.trim().is_empty() {
                return Err(AppError::Config(format!("groups[{}].name cannot be empty", i)));
            }
            if group.words.is_empty() {
                return Err(AppError::Config(format!("groups[{}].words cannot be empty", i)));
            }
            for (j, word) in group.words.iter().enumerate() {
                if word.trim().is_empty() {
                    return Err(AppError::Config(format!(
                        "groups[{}].words[{}] cannot be empty",
                        i, j
                    )));
                }
            }
        }
        Ok(())
    }
}

lazy_static! {
    static ref BUILT_IN_GROUPS: DefaultGroupsConfig =
        serde_json::from_str(include_str!("../config/default_groups.json"))
            .expect("Built-in default groups should be valid JSON");
}

/// The predefined groups compiled into the binary
pub fn built_in_default_groups() -> DefaultGroupsConfig {
    BUILT_IN_GROUPS.clone()
}

/// Read and validate a default groups file
pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<DefaultGroupsConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Failed to read '{}': {}", path.display(), e))
    })?;
    let config: DefaultGroupsConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load the default groups, falling back to the built-in copy
pub fn load_default_groups_config(explicit_path: Option<&str>) -> DefaultGroupsConfig {
    if let Some(config_path) = explicit_path {
        info!("Loading default groups config from: {}", config_path);
        match load_from_path(config_path) {
            Ok(config) => {
                info!(
                    group_count = config.groups.len(),
                    "Successfully loaded default groups config from: {}", config_path
                );
                return config;
            }
            Err(e) => {
                error_logging::log_config_error(&e, "DEFAULT_GROUPS_CONFIG_PATH", "load_default_groups");
                warn!(
                    "Failed to load default groups config from '{}'. Falling back to default paths.",
                    config_path
                );
            }
        }
    }

    let possible_paths = [
        "/app/config/default_groups.json", // Docker path
        "config/default_groups.json",      // Local development path
        "../config/default_groups.json",   // Test path
    ];

    for config_path in &possible_paths {
        if !Path::new(config_path).exists() {
            continue;
        }
        match load_from_path(config_path) {
            Ok(config) => {
                info!(
                    "Successfully loaded default groups config from fallback path: {}",
                    config_path
                );
                return config;
            }
            Err(e) => {
                warn!(
                    "Failed to load default groups config at '{}': {}. Trying next path.",
                    config_path, e
                );
            }
        }
    }

    info!("No default groups config file found, using built-in groups");
    built_in_default_groups()
}
