/// Directory scanning and grouping.
///
/// The classifier enumerates the immediate children of a directory, applies
/// one strategy to every file and turns the result into an ordered list of
/// [`MediaGroup`]s. Extraction failures exclude individual files; only an
/// unreadable root surfaces as an error, and even that is a recoverable
/// condition the caller reports and moves on from.
use crate::media_group::{FileRecord, MediaGroup};
use crate::strategy::TidyStrategy;
use log::warn;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A directory scan that could not start.
#[derive(Debug)]
pub enum ScanError {
    /// The root could not be enumerated at all.
    DirectoryUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryUnreadable { path, source } => {
                write!(f, "Unable to read directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DirectoryUnreadable { source, .. } => Some(source),
        }
    }
}

/// Enumerates the files directly under `root`.
///
/// Hidden entries and subdirectories are excluded. Entries are sorted by
/// file name so member order is deterministic for a fixed directory state,
/// independent of how the platform orders `read_dir`.
pub fn enumerate_files(root: &Path) -> Result<Vec<FileRecord>, ScanError> {
    let entries = fs::read_dir(root).map_err(|e| {
        warn!("unable to read directory {}: {}", root.display(), e);
        ScanError::DirectoryUnreadable {
            path: root.to_path_buf(),
            source: e,
        }
    })?;

    let mut files: Vec<FileRecord> = Vec::new();
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        files.push(FileRecord::new(entry.path()));
    }

    files.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(files)
}

/// Scans `root` and groups its files under `strategy`.
///
/// Groups come back sorted by descending member count; ties keep the order
/// in which their keys were first encountered. Files whose key is `None` or
/// empty do not appear in any group.
pub fn classify(root: &Path, strategy: &TidyStrategy) -> Result<Vec<MediaGroup>, ScanError> {
    let files = enumerate_files(root)?;

    // EXIF and container probing dominate scan time, so key extraction
    // fans out over the rayon pool. Collecting keeps input order.
    let keys: Vec<Option<String>> = files
        .par_iter()
        .map(|file| strategy.group_key(file))
        .collect();

    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<FileRecord>> = HashMap::new();
    for (file, key) in files.into_iter().zip(keys) {
        let Some(key) = key else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        if !buckets.contains_key(&key) {
            order.push(key.clone());
        }
        buckets.entry(key).or_default().push(file);
    }

    let mut groups: Vec<MediaGroup> = order
        .into_iter()
        .map(|key| {
            let members = buckets.remove(&key).unwrap_or_default();
            MediaGroup::new(key, members)
        })
        .collect();

    // Stable sort, so equal counts keep first-encountered key order.
    groups.sort_by(|a, b| b.members.len().cmp(&a.members.len()));
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::strategy_by_id;
    use std::fs;
    use tempfile::TempDir;

    fn extension_strategy() -> &'static TidyStrategy {
        strategy_by_id("extension").expect("known id")
    }

    #[test]
    fn test_classify_groups_by_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        for name in ["a.txt", "b.TXT", "c.jpg", "README"] {
            fs::write(temp_dir.path().join(name), "x").expect("Failed to write file");
        }

        let groups = classify(temp_dir.path(), extension_strategy()).expect("scan succeeds");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "txt");
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].key, "jpg");
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn test_classify_excludes_hidden_and_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.txt"), "x").expect("Failed to write file");
        fs::write(temp_dir.path().join(".hidden.txt"), "x").expect("Failed to write file");
        fs::create_dir(temp_dir.path().join("sub.txt")).expect("Failed to create directory");

        let groups = classify(temp_dir.path(), extension_strategy()).expect("scan succeeds");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 1);
        assert_eq!(groups[0].members[0].name(), "a.txt");
    }

    #[test]
    fn test_classify_tie_order_is_first_encountered() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // Sorted enumeration sees .aaa before .bbb; both buckets have one member.
        fs::write(temp_dir.path().join("1.aaa"), "x").expect("Failed to write file");
        fs::write(temp_dir.path().join("2.bbb"), "x").expect("Failed to write file");

        for _ in 0..3 {
            let groups = classify(temp_dir.path(), extension_strategy()).expect("scan succeeds");
            let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
            assert_eq!(keys, ["aaa", "bbb"]);
        }
    }

    #[test]
    fn test_classify_member_order_is_deterministic() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        for name in ["c.txt", "a.txt", "b.txt"] {
            fs::write(temp_dir.path().join(name), "x").expect("Failed to write file");
        }

        let groups = classify(temp_dir.path(), extension_strategy()).expect("scan succeeds");
        let names: Vec<&str> = groups[0].members.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_classify_unreadable_root_is_an_error() {
        let result = classify(Path::new("/no/such/directory"), extension_strategy());
        assert!(result.is_err());
    }

    #[test]
    fn test_classify_empty_directory_yields_no_groups() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let groups = classify(temp_dir.path(), extension_strategy()).expect("scan succeeds");
        assert!(groups.is_empty());
    }
}
