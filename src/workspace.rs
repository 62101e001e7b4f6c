/// The set of root directories currently being tidied.
///
/// Each folder owns its own options, groups and busy flag, so distinct
/// roots can scan and apply concurrently; the workspace only manages
/// membership and the apply-to-all pass.
use crate::executor::ExecutionReport;
use crate::folder::{FolderError, MediaFolder};
use std::path::{Path, PathBuf};

/// An ordered collection of [`MediaFolder`]s, one per selected root.
#[derive(Default)]
pub struct Workspace {
    folders: Vec<MediaFolder>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn folders(&self) -> &[MediaFolder] {
        &self.folders
    }

    pub fn folders_mut(&mut self) -> &mut [MediaFolder] {
        &mut self.folders
    }

    /// Adds a folder, replacing any existing folder for the same path.
    ///
    /// The caller rescans the returned folder afterwards; a replaced
    /// folder's groups do not carry over.
    pub fn add_folder(&mut self, folder: MediaFolder) -> &mut MediaFolder {
        self.remove_folder(&folder.path().to_path_buf());
        self.folders.push(folder);
        self.folders.last_mut().expect("folder was just pushed")
    }

    /// Removes the folder for `path`, returning whether one was present.
    pub fn remove_folder(&mut self, path: &Path) -> bool {
        let before = self.folders.len();
        self.folders.retain(|folder| folder.path() != path);
        self.folders.len() != before
    }

    pub fn clear(&mut self) {
        self.folders.clear();
    }

    /// Applies every folder's selected groups, one root after another.
    ///
    /// Each root reports independently; a folder that is busy or whose
    /// root disappeared contributes its error without stopping the rest.
    pub fn apply_all(&mut self) -> Vec<(PathBuf, Result<ExecutionReport, FolderError>)> {
        self.folders
            .iter_mut()
            .map(|folder| (folder.path().to_path_buf(), folder.apply()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_options;
    use std::fs;
    use tempfile::TempDir;

    fn folder_for(path: &Path) -> MediaFolder {
        MediaFolder::new(path, default_options())
    }

    #[test]
    fn test_add_folder_replaces_same_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut workspace = Workspace::new();

        workspace.add_folder(folder_for(temp_dir.path()));
        workspace.add_folder(folder_for(temp_dir.path()));

        assert_eq!(workspace.len(), 1);
    }

    #[test]
    fn test_remove_folder() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut workspace = Workspace::new();
        workspace.add_folder(folder_for(temp_dir.path()));

        assert!(workspace.remove_folder(temp_dir.path()));
        assert!(!workspace.remove_folder(temp_dir.path()));
        assert!(workspace.is_empty());
    }

    #[test]
    fn test_apply_all_reports_per_root() {
        let first = TempDir::new().expect("Failed to create temp directory");
        let second = TempDir::new().expect("Failed to create temp directory");
        fs::write(first.path().join("a.txt"), "x").expect("Failed to write file");
        fs::write(second.path().join("b.jpg"), "x").expect("Failed to write file");

        let mut workspace = Workspace::new();
        for path in [first.path(), second.path()] {
            let folder = workspace.add_folder(folder_for(path));
            folder.rescan().expect("scan succeeds");
        }

        let results = workspace.apply_all();

        assert_eq!(results.len(), 2);
        for (_, result) in &results {
            assert_eq!(result.as_ref().expect("apply succeeds").succeeded, 1);
        }
        assert!(first.path().join("TXT").join("a.txt").is_file());
        assert!(second.path().join("JPG").join("b.jpg").is_file());
    }

    #[test]
    fn test_apply_all_isolates_bad_roots() {
        let good = TempDir::new().expect("Failed to create temp directory");
        fs::write(good.path().join("a.txt"), "x").expect("Failed to write file");

        let mut workspace = Workspace::new();
        workspace.add_folder(folder_for(Path::new("/no/such/root")));
        let folder = workspace.add_folder(folder_for(good.path()));
        folder.rescan().expect("scan succeeds");

        let results = workspace.apply_all();

        assert!(results[0].1.is_err());
        assert_eq!(results[1].1.as_ref().expect("apply succeeds").succeeded, 1);
    }
}
