//! Note representation.

use std::path::{Path, PathBuf};

/// A note loaded from the vault.
#[derive(Debug, Clone)]
pub struct Note {
    /// Path relative to vault root (e.g., "blog/My Post.md").
    pub path: PathBuf,

    /// Raw content of the note.
    pub content: String,
}

impl Note {
    /// Create a new note from path and content.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Get the note name (filename without .md extension).
    pub fn name(&self) -> &str {
        note_name(&self.path)
    }

    /// Get the parent folder path, relative to the vault root.
    pub fn folder(&self) -> &Path {
        note_folder(&self.path)
    }
}

/// File name without extension.
pub fn note_name(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("")
}

/// Parent folder, or an empty path for notes at the vault root.
fn note_folder(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new(""))
}

/// Whether the path names a markdown file.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_and_folder() {
        let note = Note::new("blog/2024/My Post.md", "");
        assert_eq!(note.name(), "My Post");
        assert_eq!(note.folder(), Path::new("blog/2024"));

        let root_note = Note::new("Top.md", "");
        assert_eq!(root_note.folder(), Path::new(""));
    }

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("a/b.md")));
        assert!(is_markdown(Path::new("B.MD")));
        assert!(!is_markdown(Path::new("image.png")));
        assert!(!is_markdown(Path::new("README")));
    }
}
