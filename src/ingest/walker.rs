use walkdir::WalkDir;
use std::path::{Path, PathBuf};
use crate::error::{Result, TechtreeError};

/// Extension of task description files
pub const MARKUP_EXTENSION: &str = "rst";

/// Metadata for a discovered file
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub file_name: String,
    pub absolute_path: PathBuf,
    pub file_size: u64,
}

/// Discover the task description files in `root`.
///
/// Only the directory itself is listed, sub-directories are not descended
/// into. Files come back ordered by file name, so when two documents define
/// the same task the one whose name sorts last wins.
pub fn discover_files(root: &Path) -> Result<Vec<FileMetadata>> {
    if !root.is_dir() {
        return Err(TechtreeError::Config(format!(
            "data directory does not exist or is not a directory: {}",
            root.display()
        )));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| TechtreeError::Io(e.into()))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        if extension != MARKUP_EXTENSION {
            continue;
        }

        let metadata = std::fs::metadata(path)?;

        files.push(FileMetadata {
            file_name: entry.file_name().to_string_lossy().to_string(),
            absolute_path: path.to_path_buf(),
            file_size: metadata.len(),
        });
    }

    log::info!("Discovered {} task files in {}", files.len(), root.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use std::fs;

    #[test]
    fn test_discover_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("drafts")).unwrap();
        fs::write(root.join("sandbox.rst"), "Sandbox\n=======\n").unwrap();
        fs::write(root.join("Cloud.RST"), "Cloud\n=====\n").unwrap();
        fs::write(root.join("README.md"), "# Docs").unwrap();
        fs::write(root.join("notes.rst.bak"), "old").unwrap();
        fs::write(root.join("drafts/wip.rst"), "Wip\n===\n").unwrap(); // nested, not listed

        let files = discover_files(root).unwrap();

        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["Cloud.RST", "sandbox.rst"]);
        assert!(files.iter().all(|f| f.absolute_path.starts_with(root)));
        assert_eq!(files[1].file_size, 16);
    }

    #[test]
    fn test_discover_files_empty() {
        let temp_dir = TempDir::new().unwrap();
        let files = discover_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 0);
    }

    #[test]
    fn test_discover_files_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        assert!(matches!(
            discover_files(&missing),
            Err(TechtreeError::Config(_))
        ));
    }
}
