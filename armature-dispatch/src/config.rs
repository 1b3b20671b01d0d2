// Dispatcher configuration: the `listen` table and the logging flag

use crate::event::{Event, EventType};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Unknown event in configuration: {0}")]
    UnknownEvent(String),

    #[error("Event `{alias}` is already configured as `{previous}`")]
    DuplicateEvent { alias: String, previous: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// Static listener configuration.
///
/// ```toml
/// log_events = true
///
/// [listen]
/// "app.payment" = ["payment_listener", "audit_listener"]
/// ```
///
/// Keys of `listen` are event aliases resolved through an [`EventCatalog`];
/// values are listener identifiers resolved by the listener factory at
/// dispatch time, in the order given. Each event type may appear under one
/// alias only, and unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    pub log_events: bool,
    pub listen: BTreeMap<String, Vec<String>>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            log_events: true,
            listen: BTreeMap::new(),
        }
    }
}

impl DispatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_events(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }

    /// Append listener identifiers for an event alias.
    pub fn listen<I, S>(mut self, event: impl Into<String>, listeners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.listen
            .entry(event.into())
            .or_default()
            .extend(listeners.into_iter().map(Into::into));
        self
    }

    /// Parse configuration from a string in the given format.
    pub fn parse(content: &str, format: FileFormat) -> Result<Self> {
        match format {
            FileFormat::Json => Self::from_json_str(content),
            FileFormat::Toml => Self::from_toml_str(content),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))
    }

    /// Load configuration from file, detecting the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::LoadError(format!("Unsupported format: {}", ext)))?;

        let content = fs::read_to_string(path)?;
        Self::parse(&content, format)
    }
}

/// Maps the event names used in configuration to event types.
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    events: HashMap<String, EventType>,
}

impl EventCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `E` under its full type name.
    pub fn register<E: Event>(self) -> Self {
        self.register_as::<E>(std::any::type_name::<E>())
    }

    /// Register `E` under a custom alias.
    pub fn register_as<E: Event>(mut self, alias: impl Into<String>) -> Self {
        self.events.insert(alias.into(), EventType::of::<E>());
        self
    }

    pub fn get(&self, alias: &str) -> Option<EventType> {
        self.events.get(alias).copied()
    }

    pub fn resolve(&self, alias: &str) -> Result<EventType> {
        self.get(alias)
            .ok_or_else(|| ConfigError::UnknownEvent(alias.to_string()))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
