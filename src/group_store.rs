//! # Group Store
//!
//! In-memory, insertion-ordered collection of word groups. The store is the
//! only mutable piece of the engine; every effective mutation bumps a
//! monotonically increasing version so callers (and [`crate::cache::IndexCache`])
//! can tell when a previously built [`GroupIndex`] has gone stale.

use crate::config::EngineConfig;
use crate::default_groups::{built_in_default_groups, DefaultGroupsConfig, GroupSeed};
use crate::errors::{error_logging, AppError, AppResult};
use crate::group_index::GroupIndex;
use crate::observability::record_store_mutation;
use crate::validation::{describe, parse_word_list, validate_group_name, validate_phrase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Display color assigned to custom groups
pub const CUSTOM_GROUP_COLOR: &str = "#607D8B";

/// Display icon assigned to custom groups
pub const CUSTOM_GROUP_ICON: &str = "add-circle";

/// Stable identifier of a word group
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A named, colored, enable/disable-able collection of ingredient phrases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordGroup {
    /// Unique, immutable identifier
    pub id: GroupId,
    /// Display name (e.g. "Allergens")
    pub name: String,
    /// Display color, never interpreted by the engine
    pub color: String,
    /// Display icon name, never interpreted by the engine
    pub icon: Option<String>,
    /// Canonical phrases (see [`crate::normalizer::normalize_phrase`]), no duplicates
    pub words: Vec<String>,
    /// Whether the group takes part in matching
    pub enabled: bool,
    /// Whether the user created the group
    pub custom: bool,
    /// When the group entered the store
    pub created_at: DateTime<Utc>,
}

impl WordGroup {
    /// Whether the group already holds the canonical form of `phrase`
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        let canonical = crate::normalizer::normalize_phrase(phrase);
        self.words.iter().any(|w| *w == canonical)
    }
}

/// Mutable collection of word groups
#[derive(Debug, Clone)]
pub struct GroupStore {
    groups: Vec<WordGroup>,
    version: u64,
    next_custom_id: u64,
    config: EngineConfig,
}

impl Default for GroupStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupStore {
    /// Create an empty store with the default engine configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty store with a custom engine configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            groups: Vec::new(),
            version: 0,
            next_custom_id: 1,
            config,
        }
    }

    /// Create a store seeded with the built-in predefined groups
    pub fn with_default_groups() -> AppResult<Self> {
        Self::from_seeds(EngineConfig::default(), &built_in_default_groups())
    }

    /// Create a store seeded from a default groups configuration
    pub fn from_seeds(config: EngineConfig, seeds: &DefaultGroupsConfig) -> AppResult<Self> {
        let mut store = Self::with_config(config);
        for seed in &seeds.groups {
            store.insert_group(seed)?;
        }
        info!(group_count = store.len(), "Seeded group store");
        Ok(store)
    }

    /// Engine configuration used for validation and index builds
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current version; bumped by every effective mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if the store holds no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All groups in insertion order
    pub fn groups(&self) -> &[WordGroup] {
        &self.groups
    }

    /// Enabled groups in insertion order
    pub fn enabled_groups(&self) -> impl Iterator<Item = &WordGroup> {
        self.groups.iter().filter(|g| g.enabled)
    }

    /// Look up a group by id
    pub fn get(&self, id: &GroupId) -> Option<&WordGroup> {
        self.groups.iter().find(|g| g.id == *id)
    }

    /// Build an index over the enabled groups, stamped with the current version
    pub fn build_index(&self) -> GroupIndex {
        GroupIndex::build(&self.groups, &self.config).with_source_version(self.version)
    }

    /// Whether `index` was built from this store at its current version
    pub fn is_current(&self, index: &GroupIndex) -> bool {
        index.source_version() == Some(self.version)
    }

    /// Create a custom group from a name and a list of phrases
    ///
    /// The group is enabled and receives a fresh `custom-<n>` id that no
    /// other group holds, seeded ones included; a blank `color` falls back to
    /// [`CUSTOM_GROUP_COLOR`]. Phrases with the same canonical form are
    /// collapsed; an empty name, an empty list, or any phrase with no words is
    /// rejected with `InvalidInput`.
    pub fn create_group<S: AsRef<str>>(
        &mut self,
        name: &str,
        words: &[S],
        color: &str,
    ) -> AppResult<WordGroup> {
        let name = self.checked_name(name, "create_group")?;
        let words = self.checked_phrases(words, "create_group")?;

        let id = self.next_free_custom_id();

        let group = WordGroup {
            id,
            name,
            color: if color.trim().is_empty() {
                CUSTOM_GROUP_COLOR.to_string()
            } else {
                color.trim().to_string()
            },
            icon: Some(CUSTOM_GROUP_ICON.to_string()),
            words,
            enabled: true,
            custom: true,
            created_at: Utc::now(),
        };

        self.groups.push(group.clone());
        self.bump("create_group");
        info!(group_id = %group.id, name = %group.name, words = group.words.len(), "Created custom group");
        Ok(group)
    }

    /// Create a custom group from a comma-separated word list
    pub fn create_group_from_list(
        &mut self,
        name: &str,
        word_list: &str,
        color: &str,
    ) -> AppResult<WordGroup> {
        self.create_group(name, parse_word_list(word_list).as_slice(), color)
    }

    /// Register a predefined group under its own id
    pub fn insert_group(&mut self, seed: &GroupSeed) -> AppResult<WordGroup> {
        let id = GroupId::new(seed.id.trim());
        if id.as_str().is_empty() {
            return Err(AppError::InvalidInput("Group id cannot be empty".to_string()));
        }
        if self.get(&id).is_some() {
            return Err(AppError::InvalidInput(format!(
                "A group with id '{}' already exists",
                id
            )));
        }

        let name = self.checked_name(&seed.name, "insert_group")?;
        let words = self.checked_phrases(seed.words.as_slice(), "insert_group")?;

        let group = WordGroup {
            id,
            name,
            color: seed.color.clone(),
            icon: seed.icon.clone(),
            words,
            enabled: seed.enabled,
            custom: false,
            created_at: Utc::now(),
        };

        self.groups.push(group.clone());
        self.bump("insert_group");
        debug!(group_id = %group.id, "Inserted predefined group");
        Ok(group)
    }

    /// Remove a group, returning it
    pub fn delete_group(&mut self, id: &GroupId) -> AppResult<WordGroup> {
        let position = self.position(id, "delete_group")?;
        let group = self.groups.remove(position);
        self.bump("delete_group");
        info!(group_id = %id, "Deleted group");
        Ok(group)
    }

    /// Flip a group's enabled flag, returning the updated group
    pub fn toggle_group(&mut self, id: &GroupId) -> AppResult<WordGroup> {
        let position = self.position(id, "toggle_group")?;
        let group = &mut self.groups[position];
        group.enabled = !group.enabled;
        let updated = group.clone();
        self.bump("toggle_group");
        info!(group_id = %id, enabled = updated.enabled, "Toggled group");
        Ok(updated)
    }

    /// Set a group's enabled flag
    ///
    /// Setting the state the group is already in is a no-op that returns the
    /// unchanged group without bumping the version.
    pub fn set_enabled(&mut self, id: &GroupId, enabled: bool) -> AppResult<WordGroup> {
        let position = self.position(id, "set_enabled")?;
        if self.groups[position].enabled == enabled {
            return Ok(self.groups[position].clone());
        }
        self.toggle_group(id)
    }

    /// Add a phrase to a group, returning the updated group
    ///
    /// Adding a phrase the group already holds (after normalization) is a
    /// no-op.
    pub fn add_word(&mut self, id: &GroupId, word: &str) -> AppResult<WordGroup> {
        let position = self.position(id, "add_word")?;
        let phrase = validate_phrase(word, self.config.max_phrase_chars).map_err(|code| {
            let err = AppError::InvalidInput(format!("Phrase '{}' {}", word.trim(), describe(code)));
            error_logging::log_validation_error(&err, "add_word", "phrase", Some(word));
            err
        })?;

        let group = &mut self.groups[position];
        if group.words.contains(&phrase) {
            debug!(group_id = %id, phrase = %phrase, "Phrase already present, nothing to add");
            return Ok(group.clone());
        }

        group.words.push(phrase);
        let updated = group.clone();
        self.bump("add_word");
        info!(group_id = %id, words = updated.words.len(), "Added phrase to group");
        Ok(updated)
    }

    /// Remove the phrase at `word_index` from a group, returning it
    pub fn remove_word(&mut self, id: &GroupId, word_index: usize) -> AppResult<String> {
        let position = self.position(id, "remove_word")?;
        let len = self.groups[position].words.len();
        if word_index >= len {
            let err = AppError::OutOfRange {
                index: word_index,
                len,
            };
            error_logging::log_store_error(&err, "remove_word", Some(id.as_str()), Some(word_index));
            return Err(err);
        }

        let removed = self.groups[position].words.remove(word_index);
        self.bump("remove_word");
        info!(group_id = %id, phrase = %removed, "Removed phrase from group");
        Ok(removed)
    }

    /// Next `custom-<n>` id not already held by a group, seeded ones included
    fn next_free_custom_id(&mut self) -> GroupId {
        loop {
            let id = GroupId::new(format!("custom-{}", self.next_custom_id));
            self.next_custom_id += 1;
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn position(&self, id: &GroupId, operation: &str) -> AppResult<usize> {
        self.groups.iter().position(|g| g.id == *id).ok_or_else(|| {
            let err = AppError::NotFound(id.to_string());
            error_logging::log_store_error(&err, operation, Some(id.as_str()), None);
            err
        })
    }

    fn checked_name(&self, name: &str, operation: &str) -> AppResult<String> {
        validate_group_name(name, self.config.max_group_name_chars)
            .map(str::to_string)
            .map_err(|code| {
                let err = AppError::InvalidInput(format!("Group name {}", describe(code)));
                error_logging::log_validation_error(&err, operation, "group_name", Some(name));
                err
            })
    }

    fn checked_phrases<S: AsRef<str>>(&self, words: &[S], operation: &str) -> AppResult<Vec<String>> {
        let mut phrases: Vec<String> = Vec::with_capacity(words.len());
        for word in words {
            let word = word.as_ref();
            let phrase = validate_phrase(word, self.config.max_phrase_chars).map_err(|code| {
                let err = AppError::InvalidInput(format!("Phrase '{}' {}", word.trim(), describe(code)));
                error_logging::log_validation_error(&err, operation, "phrase", Some(word));
                err
            })?;
            if !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }

        if phrases.is_empty() {
            let err = AppError::InvalidInput("A group needs at least one phrase".to_string());
            error_logging::log_validation_error(&err, operation, "words", None);
            return Err(err);
        }

        Ok(phrases)
    }

    fn bump(&mut self, operation: &'static str) {
        self.version += 1;
        record_store_mutation(operation);
    }
}
