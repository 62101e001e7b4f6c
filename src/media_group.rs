/// Core data model for directory tidying.
///
/// A scan turns the immediate children of a directory into [`FileRecord`]s,
/// groups them under string keys and wraps each bucket in a [`MediaGroup`]
/// that carries the user-editable state (selection, action, rename target).
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A single file captured by a directory scan.
///
/// The record stores the path and file name eagerly; every other attribute
/// is resolved against the filesystem on demand and returns `None` when the
/// attribute cannot be read, so a bad file never aborts a scan.
#[derive(Debug, Clone)]
pub struct FileRecord {
    path: PathBuf,
    name: String,
}

impl FileRecord {
    /// Creates a record for the given path.
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The final path component, used as the destination file name on moves.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lowercased extension, or `None` when the file has none.
    ///
    /// Lowercasing makes extension grouping case-insensitive: `a.JPG` and
    /// `b.jpg` land in the same bucket.
    pub fn extension(&self) -> Option<String> {
        let ext = self.path.extension()?.to_string_lossy().to_lowercase();
        if ext.is_empty() { None } else { Some(ext) }
    }

    /// Creation timestamp, when the filesystem records one.
    pub fn created(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.created().ok()
    }

    /// Last modification timestamp.
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }
}

/// The bulk action applied to every member of a group.
///
/// `Delete` is permanent; there is no undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAction {
    /// Move the members into a subfolder named after the group's rename target.
    Group,
    /// Move the members to a recoverable trash location.
    Trash,
    /// Permanently remove the members.
    Delete,
}

impl MediaAction {
    /// Short lowercase label, also accepted by [`MediaAction::from_name`].
    pub fn label(&self) -> &'static str {
        match self {
            MediaAction::Group => "group",
            MediaAction::Trash => "trash",
            MediaAction::Delete => "delete",
        }
    }

    /// Parses the label produced by [`MediaAction::label`].
    ///
    /// ```
    /// use mediatidy::media_group::MediaAction;
    ///
    /// assert_eq!(MediaAction::from_name("trash"), Some(MediaAction::Trash));
    /// assert_eq!(MediaAction::from_name("shred"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "group" => Some(MediaAction::Group),
            "trash" => Some(MediaAction::Trash),
            "delete" => Some(MediaAction::Delete),
            _ => None,
        }
    }
}

/// One bucket of files sharing a group key.
///
/// Groups are created by the classifier with `selected = true`, the `Group`
/// action and an uppercased rename target; all three are user-editable
/// afterwards. Members are only valid until the next filesystem mutation
/// under the same root, so an apply run must be followed by a rescan.
#[derive(Debug, Clone)]
pub struct MediaGroup {
    /// The non-empty key this bucket was grouped under.
    pub key: String,
    /// Member files in enumeration order.
    pub members: Vec<FileRecord>,
    /// Whether an apply run touches this group.
    pub selected: bool,
    /// The action applied to every member.
    pub action: MediaAction,
    /// Destination folder name for the `Group` action.
    pub rename_target: String,
}

impl MediaGroup {
    /// Creates a group with the default selection, action and rename target.
    pub fn new(key: String, members: Vec<FileRecord>) -> Self {
        let rename_target = key.to_uppercase();
        Self {
            key,
            members,
            selected: true,
            action: MediaAction::Group,
            rename_target,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_record_name_and_extension() {
        let record = FileRecord::new(PathBuf::from("/some/where/Photo.JPG"));
        assert_eq!(record.name(), "Photo.JPG");
        assert_eq!(record.extension(), Some("jpg".to_string()));
    }

    #[test]
    fn test_record_without_extension() {
        let record = FileRecord::new(PathBuf::from("/some/where/Makefile"));
        assert_eq!(record.extension(), None);
    }

    #[test]
    fn test_record_timestamps_for_missing_file() {
        let record = FileRecord::new(PathBuf::from("/no/such/file.txt"));
        assert_eq!(record.created(), None);
        assert_eq!(record.modified(), None);
    }

    #[test]
    fn test_record_modified_for_real_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("file.txt");
        File::create(&path).expect("Failed to create file");

        let record = FileRecord::new(path);
        assert!(record.modified().is_some());
    }

    #[test]
    fn test_action_labels_round_trip() {
        for action in [MediaAction::Group, MediaAction::Trash, MediaAction::Delete] {
            assert_eq!(MediaAction::from_name(action.label()), Some(action));
        }
    }

    #[test]
    fn test_group_defaults() {
        let group = MediaGroup::new(
            "jpg".to_string(),
            vec![FileRecord::new(PathBuf::from("/a/x.jpg"))],
        );

        assert!(group.selected);
        assert_eq!(group.action, MediaAction::Group);
        assert_eq!(group.rename_target, "JPG");
        assert_eq!(group.len(), 1);
        assert!(!group.is_empty());
    }
}
