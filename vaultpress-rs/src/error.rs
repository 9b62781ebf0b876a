//! Error types and exit codes for Vaultpress.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes used by the `vaultpress` binary.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOTE_NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
    pub const INVALID_FRONTMATTER: i32 = 5;
    pub const PARTIAL_FAILURE: i32 = 6;
}

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Note not found: {0}")]
    NoteNotFound(PathBuf),

    #[error("Image not found: '{reference}' (tried: {})", format_attempted(.attempted))]
    ImageNotFound {
        reference: String,
        attempted: Vec<PathBuf>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to export image '{reference}': {source}")]
    Image {
        reference: String,
        #[source]
        source: Box<ExportError>,
    },

    #[error("Failed to export {note}: {source}")]
    Note {
        note: PathBuf,
        #[source]
        source: Box<ExportError>,
    },

    #[error("{failed} of {total} notes failed to export")]
    PartialFailure { failed: usize, total: usize },

    #[error("Invalid frontmatter in {path}: {message}")]
    InvalidFrontmatter { path: PathBuf, message: String },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),
}

fn format_attempted(attempted: &[PathBuf]) -> String {
    attempted
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ExportError {
    /// Wrap an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ExportError::Io {
            context: context.into(),
            source,
        }
    }

    /// Attach the note a failure belongs to.
    pub fn for_note(self, note: impl Into<PathBuf>) -> Self {
        ExportError::Note {
            note: note.into(),
            source: Box::new(self),
        }
    }

    /// Attach the image reference text a failure belongs to.
    pub fn for_image(self, reference: impl Into<String>) -> Self {
        ExportError::Image {
            reference: reference.into(),
            source: Box::new(self),
        }
    }

    /// Short description of the failure without paths, safe to publish.
    pub fn kind(&self) -> &'static str {
        match self {
            ExportError::NoteNotFound(_) => "note not found",
            ExportError::ImageNotFound { .. } => "image not found",
            ExportError::InvalidInput(_) => "invalid input",
            ExportError::Io { source, .. } | ExportError::IoError(source) => {
                match source.kind() {
                    std::io::ErrorKind::NotFound => "file not found",
                    std::io::ErrorKind::PermissionDenied => "permission denied",
                    _ => "I/O error",
                }
            }
            ExportError::Note { source, .. } | ExportError::Image { source, .. } => source.kind(),
            ExportError::InvalidFrontmatter { .. } => "invalid frontmatter",
            _ => "export error",
        }
    }

    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExportError::NoteNotFound(_) => exit_code::NOTE_NOT_FOUND,
            ExportError::InvalidInput(_) => exit_code::INVALID_INPUT,
            ExportError::InvalidFrontmatter { .. } => exit_code::INVALID_FRONTMATTER,
            ExportError::PartialFailure { .. } => exit_code::PARTIAL_FAILURE,
            ExportError::Note { source, .. } | ExportError::Image { source, .. } => {
                source.exit_code()
            }
            _ => exit_code::GENERAL_ERROR,
        }
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
