//! Command-line interface module for mediatidy.
//!
//! This is the stand-in for the presentation layer: it drives scans,
//! renders group tables, runs apply passes with a progress bar and edits
//! the persisted tidy options. All real work happens in the library
//! modules; errors surface here as printable strings.

use crate::config::{self, FileSettingsStore, MemorySettingsStore, SettingsStore};
use crate::executor::{ActionExecutor, ExecutionReport};
use crate::folder::{FolderError, MediaFolder};
use crate::media_group::MediaAction;
use crate::output::OutputFormatter;
use crate::strategy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mediatidy",
    version,
    about = "Group the files of a directory into buckets and move, trash or delete each bucket."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a directory and show how its files would be grouped.
    Scan {
        /// Directory to scan (non-recursive).
        dir: PathBuf,
        /// Strategy id to group by; defaults to the active configured option.
        #[arg(long)]
        by: Option<String>,
    },
    /// Scan a directory and apply an action to its groups.
    Apply {
        /// Directory to tidy.
        dir: PathBuf,
        /// Strategy id to group by; defaults to the active configured option.
        #[arg(long)]
        by: Option<String>,
        /// Action applied to the groups: group, trash or delete.
        #[arg(long, default_value = "group")]
        action: String,
        /// Group keys to act on; all groups when omitted.
        #[arg(long)]
        only: Vec<String>,
    },
    /// List the known grouping strategies.
    Strategies,
    /// Show the persisted tidy options, optionally enabling/disabling some.
    Options {
        /// Strategy ids to enable.
        #[arg(long)]
        enable: Vec<String>,
        /// Strategy ids to disable.
        #[arg(long)]
        disable: Vec<String>,
    },
}

/// Runs a command against the default per-user settings store.
pub fn run_cli(command: Command) -> Result<(), String> {
    match FileSettingsStore::default_location() {
        Some(store) => run_cli_with_store(command, &store),
        None => {
            // No home directory; settings just don't persist this run.
            let store = MemorySettingsStore::new();
            run_cli_with_store(command, &store)
        }
    }
}

/// Runs a command against an explicit settings store.
pub fn run_cli_with_store(command: Command, store: &dyn SettingsStore) -> Result<(), String> {
    match command {
        Command::Scan { dir, by } => scan_directory(&dir, by.as_deref(), store),
        Command::Apply {
            dir,
            by,
            action,
            only,
        } => apply_directory(&dir, by.as_deref(), &action, &only, store),
        Command::Strategies => {
            list_strategies();
            Ok(())
        }
        Command::Options { enable, disable } => edit_options(store, &enable, &disable),
    }
}

fn scan_directory(
    dir: &PathBuf,
    by: Option<&str>,
    store: &dyn SettingsStore,
) -> Result<(), String> {
    let folder = prepare_folder(dir, by, store)?;
    let Some(folder) = scan_folder(folder)? else {
        return Ok(());
    };

    OutputFormatter::group_table(&folder.groups);
    Ok(())
}

fn apply_directory(
    dir: &PathBuf,
    by: Option<&str>,
    action_name: &str,
    only: &[String],
    store: &dyn SettingsStore,
) -> Result<(), String> {
    let action = MediaAction::from_name(action_name)
        .ok_or_else(|| format!("Unknown action '{}' (group, trash, delete)", action_name))?;

    let folder = prepare_folder(dir, by, store)?;
    let Some(mut folder) = scan_folder(folder)? else {
        return Ok(());
    };

    for group in &mut folder.groups {
        group.action = action;
        if !only.is_empty() {
            group.selected = only.iter().any(|key| *key == group.key);
        }
    }

    let selected: Vec<_> = folder
        .groups
        .iter()
        .filter(|g| g.selected)
        .cloned()
        .collect();
    if selected.is_empty() {
        OutputFormatter::warning("Nothing to do: no groups selected.");
        return Ok(());
    }

    let pb = OutputFormatter::create_progress_bar(selected.len() as u64);
    let mut report = ExecutionReport::default();
    for group in &selected {
        pb.set_message(group.key.clone());
        ActionExecutor::apply_group(folder.path(), group, &mut report);
        pb.inc(1);
    }
    pb.finish_and_clear();

    print_report(&report);
    Ok(())
}

fn list_strategies() {
    OutputFormatter::header("STRATEGIES");
    for strategy in strategy::all_strategies() {
        if strategy.is_sentinel() {
            continue;
        }
        OutputFormatter::plain(&format!("{:<20} {}", strategy.id(), strategy.display_name()));
    }
}

fn edit_options(
    store: &dyn SettingsStore,
    enable: &[String],
    disable: &[String],
) -> Result<(), String> {
    let mut options = config::load_options(store, false);

    for id in enable {
        if !toggle_option(&mut options, id, true) {
            OutputFormatter::warning(&format!("Unknown strategy id '{}'", id));
        }
    }
    for id in disable {
        if !toggle_option(&mut options, id, false) {
            OutputFormatter::warning(&format!("Unknown strategy id '{}'", id));
        }
    }

    if !enable.is_empty() || !disable.is_empty() {
        config::save_options(store, &options).map_err(|e| format!("Error saving options: {}", e))?;
        OutputFormatter::success("Options saved.");
    }

    OutputFormatter::header("TIDY OPTIONS");
    for option in options.iter().filter(|o| !o.is_sentinel()) {
        let state = if option.enabled { "enabled " } else { "disabled" };
        let name = option
            .strategy()
            .map(|s| s.display_name())
            .unwrap_or_default();
        OutputFormatter::plain(&format!("{} {:<20} {}", state, option.strategy_id, name));
    }
    Ok(())
}

fn toggle_option(options: &mut Vec<config::TidyOption>, id: &str, enabled: bool) -> bool {
    if strategy::strategy_by_id(id).is_none() || id == strategy::SENTINEL_ID {
        return false;
    }
    if let Some(option) = options.iter_mut().find(|o| o.strategy_id == id) {
        option.enabled = enabled;
    } else {
        // Strategies not yet in the configured list join it, sentinel last.
        let at = options
            .iter()
            .position(|o| o.is_sentinel())
            .unwrap_or(options.len());
        options.insert(at, config::TidyOption::new(id, enabled));
    }
    true
}

fn prepare_folder(
    dir: &PathBuf,
    by: Option<&str>,
    store: &dyn SettingsStore,
) -> Result<MediaFolder, String> {
    let options = config::load_options(store, true);
    let mut folder = MediaFolder::new(dir, options);

    if let Some(id) = by {
        // An explicit --by may name any registry strategy, configured or not.
        if strategy::strategy_by_id(id).is_none() || id == strategy::SENTINEL_ID {
            return Err(format!(
                "Unknown strategy '{}'. Run 'mediatidy strategies' for the list.",
                id
            ));
        }
        if !folder.select_strategy(id) {
            folder.options.push(config::TidyOption::new(id, true));
            folder.select_strategy(id);
        }
    }
    Ok(folder)
}

/// Scans the folder, reporting a scan failure as a soft condition.
///
/// Returns `Ok(None)` when the scan failed recoverably (a warning has been
/// printed and there is nothing to show).
fn scan_folder(mut folder: MediaFolder) -> Result<Option<MediaFolder>, String> {
    OutputFormatter::info(&format!("Scanning {}…", folder.path().display()));
    match folder.rescan() {
        Ok(()) => Ok(Some(folder)),
        Err(FolderError::Scan(e)) => {
            OutputFormatter::warning(&format!("{}", e));
            Ok(None)
        }
        Err(e) => Err(format!("{}", e)),
    }
}

fn print_report(report: &ExecutionReport) {
    if report.is_complete_success() {
        OutputFormatter::success(&format!(
            "Done: {} {} processed.",
            report.succeeded,
            if report.succeeded == 1 { "file" } else { "files" }
        ));
    } else {
        OutputFormatter::warning(&format!(
            "Done with problems: {} processed, {} failed, {} groups skipped.",
            report.succeeded,
            report.failed.len(),
            report.skipped_groups.len()
        ));
        for (path, reason) in &report.failed {
            OutputFormatter::error(&format!("{}: {}", path.display(), reason));
        }
        for (key, reason) in &report.skipped_groups {
            OutputFormatter::error(&format!("group '{}': {}", key, reason));
        }
    }
    OutputFormatter::plain("Rescan the directory before relying on previous group lists.");
}
