//! Corpus of task records gathered from a data directory.

use super::normalize::{normalize, TaskRecord};
use super::rst::parse_document;
use super::walker::{discover_files, FileMetadata};
use crate::error::{Result, TechtreeError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// All task records of one run, keyed by normalized identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Corpus {
    records: BTreeMap<String, TaskRecord>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its identifier, returning the one it replaced
    pub fn insert(&mut self, record: TaskRecord) -> Option<TaskRecord> {
        let id = record.id();
        let replaced = self.records.insert(id.clone(), record);
        if let Some(ref old) = replaced {
            log::warn!("Task {:?} redefined, keeping the latest definition of {:?}", id, old.taskname);
        }
        replaced
    }

    pub fn get(&self, id: &str) -> Option<&TaskRecord> {
        self.records.get(id)
    }

    /// Records in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskRecord)> {
        self.records.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<TaskRecord> for Corpus {
    fn from_iter<I: IntoIterator<Item = TaskRecord>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for record in iter {
            corpus.insert(record);
        }
        corpus
    }
}

/// What to do when a document fails to load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the run on the first failing document
    #[default]
    FailFast,
    /// Skip failing documents and report them at the end
    KeepGoing,
}

/// Outcome of loading a data directory
#[derive(Debug, Default)]
pub struct LoadReport {
    pub corpus: Corpus,
    /// Files that were read successfully
    pub files_loaded: usize,
    /// Documents skipped under [`ErrorPolicy::KeepGoing`]
    pub failures: Vec<(PathBuf, TechtreeError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line failure summary for the run's exit status, `None` when clean
    pub fn failure_summary(&self) -> Option<String> {
        if self.is_clean() {
            None
        } else {
            Some(format!("{} file(s) failed to load", self.failures.len()))
        }
    }
}

/// Parse one document's source into its task records
pub fn parse_records(source: &str) -> Result<Vec<TaskRecord>> {
    let doc = parse_document(source)?;
    let records = normalize(&doc)?.collect::<Result<Vec<_>>>()?;
    Ok(records)
}

/// Read and parse a single task file
pub fn load_file(path: &Path) -> Result<Vec<TaskRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}

/// Load every task file of `dir` into one corpus.
///
/// A document's records are only added once the whole document parsed, so
/// a skipped document never leaves part of its tasks behind.
pub fn load_corpus(dir: &Path, policy: ErrorPolicy) -> Result<LoadReport> {
    let files = discover_files(dir)?;
    let mut report = LoadReport::default();

    for file in &files {
        match load_file(&file.absolute_path) {
            Ok(records) => {
                log::info!(
                    "✓ {} ({} tasks, {} bytes)",
                    file.file_name,
                    records.len(),
                    file.file_size
                );
                report.files_loaded += 1;
                for record in records {
                    report.corpus.insert(record);
                }
            }
            Err(e) => match policy {
                ErrorPolicy::FailFast => return Err(in_file(file, e)),
                ErrorPolicy::KeepGoing => {
                    log::error!("✗ {}: {}", file.file_name, e);
                    report.failures.push((file.absolute_path.clone(), e));
                }
            },
        }
    }

    log::info!(
        "Loaded {} tasks from {} of {} files",
        report.corpus.len(),
        report.files_loaded,
        files.len()
    );
    Ok(report)
}

fn in_file(file: &FileMetadata, source: TechtreeError) -> TechtreeError {
    TechtreeError::Document {
        path: file.absolute_path.clone(),
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::sections::Attribute;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_load_corpus_merges_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.rst", "Sandbox\n=======\n\nduration::\n\n    2 weeks\n");
        write(&dir, "b.rst", "Cloud Lookup\n============\n\ndepends_on::\n\n    * Sandbox\n");
        write(&dir, "notes.txt", "colour::\n\n    ignored, not a task file\n");

        let report = load_corpus(dir.path(), ErrorPolicy::FailFast).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.failure_summary(), None);
        assert_eq!(report.files_loaded, 2);
        assert_eq!(report.corpus.len(), 2);
        let cloud = report.corpus.get("cloud_lookup").unwrap();
        assert_eq!(cloud.list(Attribute::DependsOn), ["Sandbox"]);
    }

    #[test]
    fn test_identifier_collision_last_file_wins() {
        let dir = TempDir::new().unwrap();
        write(&dir, "1_first.rst", "Cloud Lookup\n============\n\nap::\n\n    first\n");
        write(&dir, "2_second.rst", "cloud-lookup\n============\n\nap::\n\n    second\n");

        let report = load_corpus(dir.path(), ErrorPolicy::FailFast).unwrap();
        assert_eq!(report.corpus.len(), 1);
        let record = report.corpus.get("cloud_lookup").unwrap();
        assert_eq!(record.taskname, "cloud-lookup");
        assert_eq!(record.text(Attribute::Ap), Some("second"));
    }

    #[test]
    fn test_fail_fast_names_the_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.rst", "Task\n====\n");
        write(&dir, "bad.rst", "Other\n=====\n\ncolour::\n\n    red\n");

        let err = load_corpus(dir.path(), ErrorPolicy::FailFast).unwrap_err();
        match &err {
            TechtreeError::Document { path, source } => {
                assert!(path.ends_with("bad.rst"));
                assert!(matches!(**source, TechtreeError::UnknownSection(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_keep_going_skips_whole_document() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.rst", "Task\n====\n");
        write(
            &dir,
            "bad.rst",
            "Fine\n====\n\nap::\n\n    ok\n\nBroken\n======\n\ndepends_on::\n\n    Task\n",
        );

        let report = load_corpus(dir.path(), ErrorPolicy::KeepGoing).unwrap();
        assert!(!report.is_clean());
        assert_eq!(report.failure_summary().as_deref(), Some("1 file(s) failed to load"));
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].1, TechtreeError::MalformedList(_)));
        assert_eq!(report.corpus.len(), 1);
        assert!(report.corpus.get("task").is_some());
        assert!(report.corpus.get("fine").is_none());
    }

    #[test]
    fn test_corpus_from_records() {
        let corpus: Corpus = parse_records("A\n=\n\nB\n=\n").unwrap().into_iter().collect();
        let ids: Vec<_> = corpus.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
