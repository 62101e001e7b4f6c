/// Bulk action application.
///
/// The executor walks the selected groups of a scan and performs each
/// group's action on every member. Failures are isolated: a file that
/// cannot be moved or removed is recorded and skipped, a group folder that
/// cannot be created skips that group's moves, and in both cases the
/// remaining work continues. After an apply run every previously computed
/// group is stale; the caller rescans before presenting state again.
use crate::media_group::{MediaAction, MediaGroup};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the reserved trash directory created under the root.
///
/// There is no portable OS trash facility, so the `Trash` action moves
/// members into this hidden directory instead. The leading dot keeps it out
/// of subsequent scans.
pub const TRASH_DIR_NAME: &str = ".Trash";

/// Errors that abort an apply run before any group is touched.
#[derive(Debug)]
pub enum MutationError {
    /// The root directory does not exist.
    InvalidRoot { path: PathBuf },
}

impl std::fmt::Display for MutationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoot { path } => {
                write!(f, "Root directory does not exist: {}", path.display())
            }
        }
    }
}

impl std::error::Error for MutationError {}

/// Aggregate outcome of an apply run.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// Files successfully moved, trashed or deleted.
    pub succeeded: usize,
    /// Per-file failures, with the reason each file was left in place.
    pub failed: Vec<(PathBuf, String)>,
    /// Groups skipped wholesale (key, reason), e.g. folder creation failed.
    pub skipped_groups: Vec<(String, String)>,
}

impl ExecutionReport {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.skipped_groups.is_empty()
    }

    /// Files that were attempted, successfully or not.
    pub fn total_processed(&self) -> usize {
        self.succeeded + self.failed.len()
    }
}

/// Applies each selected group's action under a root directory.
pub struct ActionExecutor;

impl ActionExecutor {
    /// Runs every selected group and collects the outcome.
    ///
    /// The only hard error is a missing root; everything past that point is
    /// recorded in the report and never aborts sibling groups.
    pub fn apply(root: &Path, groups: &[MediaGroup]) -> Result<ExecutionReport, MutationError> {
        if !root.exists() {
            return Err(MutationError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }

        let mut report = ExecutionReport::default();
        for group in groups.iter().filter(|g| g.selected) {
            Self::apply_group(root, group, &mut report);
        }
        Ok(report)
    }

    /// Runs a single group, appending its outcome to `report`.
    pub fn apply_group(root: &Path, group: &MediaGroup, report: &mut ExecutionReport) {
        match group.action {
            MediaAction::Group => Self::move_into_folder(root, group, report),
            MediaAction::Trash => Self::trash_members(root, group, report),
            MediaAction::Delete => Self::delete_members(group, report),
        }
    }

    fn move_into_folder(root: &Path, group: &MediaGroup, report: &mut ExecutionReport) {
        let target = root.join(&group.rename_target);
        if !target.exists()
            && let Err(e) = fs::create_dir_all(&target)
        {
            warn!("could not create {}: {}", target.display(), e);
            report.skipped_groups.push((
                group.key.clone(),
                format!("could not create {}: {}", target.display(), e),
            ));
            return;
        }

        for member in &group.members {
            let destination = target.join(member.name());
            match fs::rename(member.path(), &destination) {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    warn!("could not move {}: {}", member.path().display(), e);
                    report.failed.push((
                        member.path().to_path_buf(),
                        format!("move to {} failed: {}", destination.display(), e),
                    ));
                }
            }
        }
    }

    fn trash_members(root: &Path, group: &MediaGroup, report: &mut ExecutionReport) {
        let trash_dir = root.join(TRASH_DIR_NAME);
        if !trash_dir.exists()
            && let Err(e) = fs::create_dir_all(&trash_dir)
        {
            warn!("could not create {}: {}", trash_dir.display(), e);
            report.skipped_groups.push((
                group.key.clone(),
                format!("could not create {}: {}", trash_dir.display(), e),
            ));
            return;
        }

        for member in &group.members {
            let destination = Self::trash_destination(&trash_dir, member.name());
            match fs::rename(member.path(), &destination) {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    warn!("could not trash {}: {}", member.path().display(), e);
                    report.failed.push((
                        member.path().to_path_buf(),
                        format!("trash failed: {}", e),
                    ));
                }
            }
        }
    }

    fn delete_members(group: &MediaGroup, report: &mut ExecutionReport) {
        for member in &group.members {
            match fs::remove_file(member.path()) {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    warn!("could not delete {}: {}", member.path().display(), e);
                    report.failed.push((
                        member.path().to_path_buf(),
                        format!("delete failed: {}", e),
                    ));
                }
            }
        }
    }

    /// Picks a free name inside the trash directory.
    ///
    /// A file trashed twice under the same name gets a timestamp suffix,
    /// e.g. `photo.jpg.20240301-143052`, so nothing is overwritten.
    fn trash_destination(trash_dir: &Path, file_name: &str) -> PathBuf {
        let plain = trash_dir.join(file_name);
        if !plain.exists() {
            return plain;
        }
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        trash_dir.join(format!("{}.{}", file_name, timestamp))
    }
}
