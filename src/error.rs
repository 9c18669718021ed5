use std::path::PathBuf;
use thiserror::Error;

/// Main error type for techtree
#[derive(Error, Debug)]
pub enum TechtreeError {
    /// Document text does not fit the supported markup grammar
    #[error("Malformed markup{}: {message}", at_line(.line))]
    MalformedMarkup { line: Option<usize>, message: String },

    /// Section label outside the recognized vocabulary
    #[error("No parser known for the {0:?} section")]
    UnknownSection(String),

    /// Bullet-point block containing a line without the `*` marker
    #[error("Every line of the bullet point list should start with an asterisk: {0:?}")]
    MalformedList(String),

    /// Free-text attribute set twice for the same task
    #[error("Task {task:?} overrides the already set {attribute:?} section")]
    ConflictingOverride { task: String, attribute: String },

    /// Section body that does not open with its title
    #[error("Section does not start with a title")]
    MissingTitle,

    /// Failure while loading a specific document
    #[error("{}: {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: Box<TechtreeError>,
    },

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TechtreeError {
    /// The underlying error, looking through any per-document wrapper.
    pub fn root(&self) -> &TechtreeError {
        match self {
            TechtreeError::Document { source, .. } => source.root(),
            other => other,
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

/// Convenient Result type using TechtreeError
pub type Result<T> = std::result::Result<T, TechtreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TechtreeError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TechtreeError = io_err.into();
        assert!(matches!(err, TechtreeError::Io(_)));
    }

    #[test]
    fn test_document_error_names_file() {
        let err = TechtreeError::Document {
            path: PathBuf::from("data/crypto.rst"),
            source: Box::new(TechtreeError::UnknownSection("colour".to_string())),
        };
        let msg = err.to_string();
        assert!(msg.contains("crypto.rst"));
        assert!(msg.contains("colour"));
        assert!(matches!(err.root(), TechtreeError::UnknownSection(_)));
    }

    #[test]
    fn test_malformed_markup_line_is_optional() {
        let err = TechtreeError::MalformedMarkup {
            line: Some(4),
            message: "Unexpected indentation".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed markup at line 4: Unexpected indentation");

        let err = TechtreeError::MalformedMarkup {
            line: None,
            message: "Label without content".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed markup: Label without content");
    }
}
