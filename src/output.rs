//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored
//! status lines, progress tracking and the group table. Keeping formatting
//! here makes it easy to change the presentation globally.

use crate::media_group::MediaGroup;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for an apply run.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the groups of a scan as a table.
    ///
    /// Shows the group key, member count, pending action and the rename
    /// target the `Group` action would move files into.
    pub fn group_table(groups: &[MediaGroup]) {
        Self::header("GROUPS");

        if groups.is_empty() {
            println!("(no groups)");
            return;
        }

        let key_width = groups
            .iter()
            .map(|g| g.key.len())
            .max()
            .unwrap_or(0)
            .max("Group".len());

        println!(
            " {:<width$} | {:>5} | {:<6} | {}",
            "Group".bold(),
            "Files".bold(),
            "Action".bold(),
            "Target".bold(),
            width = key_width
        );
        println!("{}", "-".repeat(key_width + 30));

        let mut total = 0;
        for group in groups {
            let marker = if group.selected { " " } else { "-" };
            total += group.len();
            println!(
                "{}{:<width$} | {:>5} | {:<6} | {}",
                marker,
                group.key,
                group.len().to_string().green(),
                group.action.label(),
                group.rename_target,
                width = key_width
            );
        }

        println!("{}", "-".repeat(key_width + 30));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            if total == 1 { "file" } else { "files" },
            width = key_width
        );
    }
}
