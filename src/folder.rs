/// Per-root scan and apply orchestration.
///
/// A [`MediaFolder`] is one user-selected directory together with its tidy
/// options and the groups of its latest scan. Scans and apply runs for the
/// same root must not overlap, so the folder guards both behind one busy
/// flag; distinct folders share no mutable state and may run concurrently.
///
/// Long-running work happens on a background thread and reports back
/// through a [`TaskHandle`]. Dropping a handle discards the in-flight run:
/// the worker finishes, releases the busy flag and its result is thrown
/// away without panicking.
use crate::classifier::{self, ScanError};
use crate::config::TidyOption;
use crate::executor::{ActionExecutor, ExecutionReport, MutationError};
use crate::media_group::MediaGroup;
use crate::strategy::TidyStrategy;
use crossbeam_channel::{Receiver, bounded};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Why a folder refused to start or finish an operation.
#[derive(Debug)]
pub enum FolderError {
    /// A scan or apply run is already in flight on this root.
    Busy,
    /// No enabled standard option resolves to a known strategy.
    NoActiveStrategy,
    /// The scan itself failed (recoverable; the group list is empty).
    Scan(ScanError),
    /// The apply run could not start.
    Mutation(MutationError),
}

impl std::fmt::Display for FolderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FolderError::Busy => write!(f, "An operation is already running on this folder"),
            FolderError::NoActiveStrategy => write!(f, "No active strategy is configured"),
            FolderError::Scan(e) => write!(f, "{}", e),
            FolderError::Mutation(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FolderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FolderError::Scan(e) => Some(e),
            FolderError::Mutation(e) => Some(e),
            _ => None,
        }
    }
}

/// Completion handle for a background scan or apply run.
pub struct TaskHandle<T> {
    receiver: Receiver<T>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the run completes. `None` only if the worker vanished.
    pub fn wait(self) -> Option<T> {
        self.receiver.recv().ok()
    }

    /// Returns the result if the run has completed, without blocking.
    pub fn poll(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }
}

pub type ScanTask = TaskHandle<Result<Vec<MediaGroup>, ScanError>>;
pub type ApplyTask = TaskHandle<Result<ExecutionReport, MutationError>>;

/// One user-selected root directory and its tidy state.
pub struct MediaFolder {
    path: PathBuf,
    display_name: String,
    /// Ordered tidy options; the first enabled standard option is active.
    pub options: Vec<TidyOption>,
    /// Groups of the latest completed scan. Stale after any apply run.
    pub groups: Vec<MediaGroup>,
    busy: Arc<AtomicBool>,
}

impl MediaFolder {
    /// Creates a folder for `path` with the given option list.
    ///
    /// The display name is the final path component.
    pub fn new(path: &Path, options: Vec<TidyOption>) -> Self {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path: path.to_path_buf(),
            display_name,
            options,
            groups: Vec::new(),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// The strategy behind the first enabled standard option.
    pub fn active_strategy(&self) -> Option<&'static TidyStrategy> {
        self.options
            .iter()
            .find(|option| option.enabled && !option.is_sentinel())
            .and_then(|option| option.strategy())
    }

    /// Makes `id` the single active option.
    ///
    /// Returns false for unknown ids and the sentinel; the current selection
    /// stays untouched in that case. A rescan must follow a successful
    /// switch for the group list to match.
    pub fn select_strategy(&mut self, id: &str) -> bool {
        let known = self
            .options
            .iter()
            .any(|option| option.strategy_id == id && !option.is_sentinel());
        if !known {
            return false;
        }
        for option in &mut self.options {
            option.enabled = option.strategy_id == id;
        }
        true
    }

    /// Starts a background scan with the active strategy.
    pub fn begin_scan(&self) -> Result<ScanTask, FolderError> {
        let Some(strategy) = self.active_strategy() else {
            return Err(FolderError::NoActiveStrategy);
        };
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(FolderError::Busy);
        }

        let path = self.path.clone();
        Ok(self.spawn(move || classifier::classify(&path, strategy)))
    }

    /// Installs the outcome of a completed scan.
    ///
    /// A failed scan leaves an empty group list; the error is returned so
    /// the caller can surface it as a soft failure.
    pub fn finish_scan(
        &mut self,
        outcome: Result<Vec<MediaGroup>, ScanError>,
    ) -> Result<(), FolderError> {
        match outcome {
            Ok(groups) => {
                self.groups = groups;
                Ok(())
            }
            Err(e) => {
                self.groups.clear();
                Err(FolderError::Scan(e))
            }
        }
    }

    /// Scans synchronously: begin, wait, install.
    pub fn rescan(&mut self) -> Result<(), FolderError> {
        let task = self.begin_scan()?;
        match task.wait() {
            Some(outcome) => self.finish_scan(outcome),
            None => {
                self.groups.clear();
                Ok(())
            }
        }
    }

    /// Starts a background apply run over the current groups.
    ///
    /// The groups are taken: whatever the run does to the filesystem makes
    /// them stale, so the folder's list is empty afterwards and the caller
    /// rescans once the report is in.
    pub fn begin_apply(&mut self) -> Result<ApplyTask, FolderError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(FolderError::Busy);
        }

        let path = self.path.clone();
        let groups = std::mem::take(&mut self.groups);
        Ok(self.spawn(move || ActionExecutor::apply(&path, &groups)))
    }

    /// Applies synchronously and returns the report.
    pub fn apply(&mut self) -> Result<ExecutionReport, FolderError> {
        let task = self.begin_apply()?;
        match task.wait() {
            Some(Ok(report)) => Ok(report),
            Some(Err(e)) => Err(FolderError::Mutation(e)),
            None => Ok(ExecutionReport::default()),
        }
    }

    fn spawn<T: Send + 'static>(
        &self,
        job: impl FnOnce() -> T + Send + 'static,
    ) -> TaskHandle<T> {
        let busy = Arc::clone(&self.busy);
        let (sender, receiver) = bounded(1);
        thread::spawn(move || {
            let outcome = job();
            busy.store(false, Ordering::Release);
            // The handle may have been dropped if the root went away; the
            // result is simply discarded then.
            let _ = sender.send(outcome);
        });
        TaskHandle { receiver }
    }
}
