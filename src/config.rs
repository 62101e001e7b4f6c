//! Persisted tidy options.
//!
//! The ordered list of [`TidyOption`]s describes which strategies show up
//! and which are enabled. It serializes to a compact JSON document stored
//! as an opaque string under a single settings key:
//!
//! ```json
//! {
//!   "tidy_options": [
//!     { "id": "extension", "type": "standard", "enabled": true },
//!     { "id": "creation_day", "type": "standard", "enabled": false }
//!   ]
//! }
//! ```
//!
//! The document shape is a compatibility contract; strategy ids written by
//! newer builds are dropped silently on load, and an unparseable document
//! falls back to the built-in defaults instead of erroring.

use crate::strategy::{self, SENTINEL_ID, TidyStrategy};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Settings key the options document is stored under.
pub const KEY_TIDY_OPTIONS: &str = "key_tidy_options";

const OPTION_TYPE_STANDARD: &str = "standard";

/// Errors that can occur while persisting configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The options document could not be serialized.
    Serialize(String),
    /// The backing store could not be read or written.
    StoreIo {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Serialize(msg) => write!(f, "Could not serialize options: {}", msg),
            ConfigError::StoreIo { path, source } => {
                write!(f, "Settings store {} failed: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Serialize(_) => None,
            ConfigError::StoreIo { source, .. } => Some(source),
        }
    }
}

/// One entry of the tidy configuration: a strategy id plus its enabled flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TidyOption {
    pub strategy_id: String,
    pub enabled: bool,
}

impl TidyOption {
    pub fn new(strategy_id: &str, enabled: bool) -> Self {
        Self {
            strategy_id: strategy_id.to_string(),
            enabled,
        }
    }

    /// Whether this is the "more" placeholder entry.
    pub fn is_sentinel(&self) -> bool {
        self.strategy_id == SENTINEL_ID
    }

    /// Resolves the entry against the strategy registry.
    pub fn strategy(&self) -> Option<&'static TidyStrategy> {
        strategy::strategy_by_id(&self.strategy_id)
    }
}

/// String key-value persistence seam for configuration.
///
/// The core never touches a concrete storage mechanism directly; the CLI
/// plugs in a [`FileSettingsStore`], tests a [`MemorySettingsStore`].
pub trait SettingsStore {
    /// Returns the stored value, or `None` when the key has never been set
    /// (or the store itself is unreadable).
    fn get_string(&self, key: &str) -> Option<String>;

    fn set_string(&self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/// Settings store backed by one JSON file of string key-value pairs.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The per-user default location, `~/.config/mediatidy/settings.json`.
    pub fn default_location() -> Option<Self> {
        let home = std::env::var("HOME").ok()?;
        Some(Self::new(
            PathBuf::from(home)
                .join(".config")
                .join("mediatidy")
                .join("settings.json"),
        ))
    }

    fn read_map(&self) -> HashMap<String, String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }
}

impl SettingsStore for FileSettingsStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.read_map().remove(key)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut map = self.read_map();
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::StoreIo {
                path: self.path.clone(),
                source: e,
            })?;
        }
        let content = serde_json::to_string_pretty(&map)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| ConfigError::StoreIo {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// In-memory settings store for tests and embedding.
#[derive(Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct OptionsDocument {
    tidy_options: Vec<OptionEntry>,
}

#[derive(Serialize, Deserialize)]
struct OptionEntry {
    id: String,
    #[serde(rename = "type")]
    entry_type: String,
    enabled: bool,
}

/// The built-in option list used before anything has been persisted.
pub fn default_options() -> Vec<TidyOption> {
    vec![
        TidyOption::new("extension", true),
        TidyOption::new("orientation", false),
        TidyOption::new("creation_day", false),
        TidyOption::new("modification_day", false),
        TidyOption::new(SENTINEL_ID, false),
    ]
}

/// Loads the tidy options from the store.
///
/// A missing or unparseable document yields [`default_options`]. Entries
/// with unknown ids are dropped, the sentinel is appended, `enabled_only`
/// keeps enabled entries (sentinel always retained), and the first standard
/// entry is forced enabled so a loaded configuration always has an active
/// strategy whenever any standard option survives.
pub fn load_options(store: &dyn SettingsStore, enabled_only: bool) -> Vec<TidyOption> {
    let Some(raw) = store.get_string(KEY_TIDY_OPTIONS) else {
        return default_options();
    };
    match parse_options(&raw, enabled_only) {
        Some(options) => options,
        None => {
            warn!("persisted tidy options could not be parsed, falling back to defaults");
            default_options()
        }
    }
}

/// Persists the options, excluding the sentinel entry.
pub fn save_options(store: &dyn SettingsStore, options: &[TidyOption]) -> Result<(), ConfigError> {
    let document = OptionsDocument {
        tidy_options: options
            .iter()
            .filter(|option| !option.is_sentinel())
            .map(|option| OptionEntry {
                id: option.strategy_id.clone(),
                entry_type: OPTION_TYPE_STANDARD.to_string(),
                enabled: option.enabled,
            })
            .collect(),
    };
    let raw =
        serde_json::to_string(&document).map_err(|e| ConfigError::Serialize(e.to_string()))?;
    store.set_string(KEY_TIDY_OPTIONS, &raw)
}

fn parse_options(raw: &str, enabled_only: bool) -> Option<Vec<TidyOption>> {
    let document: OptionsDocument = serde_json::from_str(raw).ok()?;

    let mut options: Vec<TidyOption> = document
        .tidy_options
        .into_iter()
        .filter_map(|entry| {
            // Unknown ids are dropped so documents written by newer builds
            // keep loading; a persisted sentinel would be a foreign artifact
            // and is dropped the same way.
            if entry.id == SENTINEL_ID {
                return None;
            }
            strategy::strategy_by_id(&entry.id)?;
            Some(TidyOption {
                strategy_id: entry.id,
                enabled: entry.enabled,
            })
        })
        .collect();

    options.push(TidyOption::new(SENTINEL_ID, false));

    if enabled_only {
        options.retain(|option| option.enabled || option.is_sentinel());
    }

    if let Some(first) = options.iter_mut().find(|option| !option.is_sentinel()) {
        first.enabled = true;
    }

    Some(options)
}
