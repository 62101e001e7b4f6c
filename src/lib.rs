//! mediatidy - group directory contents into buckets and tidy them up
//!
//! This library scans a directory (non-recursively), groups its files under
//! a pluggable strategy (extension, creation/modification date, EXIF
//! attributes, image/video orientation), and applies a bulk action to each
//! group: move into a named subfolder, move to a recoverable trash
//! directory, or delete permanently. Which strategies are offered is a
//! persistable, user-editable configuration.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod executor;
pub mod folder;
pub mod media_group;
pub mod metadata;
pub mod output;
pub mod strategy;
pub mod workspace;

pub use classifier::{ScanError, classify, enumerate_files};
pub use config::{
    ConfigError, FileSettingsStore, MemorySettingsStore, SettingsStore, TidyOption,
    default_options, load_options, save_options,
};
pub use executor::{ActionExecutor, ExecutionReport, MutationError};
pub use folder::{ApplyTask, FolderError, MediaFolder, ScanTask, TaskHandle};
pub use media_group::{FileRecord, MediaAction, MediaGroup};
pub use strategy::{StrategyKind, TidyStrategy, all_strategies, strategy_by_id};
pub use workspace::Workspace;

pub use cli::{Cli, Command, run_cli, run_cli_with_store};
