//! Vault access: locating and reading notes.

use crate::config::expand_path;
use crate::error::{ExportError, Result};
use crate::note::{is_markdown, Note};
use glob::glob;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Represents an Obsidian vault.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Root path of the vault.
    pub root: PathBuf,
}

impl Vault {
    /// Create a new vault instance. The root is expanded and made absolute.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = expand_path(&root.into())?;

        if !root.is_dir() {
            return Err(ExportError::InvalidInput(format!(
                "Vault not found at: {}",
                root.display()
            )));
        }

        Ok(Self { root })
    }

    /// Get the full path to a note.
    pub fn note_path(&self, relative_path: &Path) -> PathBuf {
        self.root.join(relative_path)
    }

    /// Turn a user-supplied path (absolute or vault-relative) into a
    /// vault-relative one.
    pub fn relative_note_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    /// Read a note's raw text.
    pub async fn read_note_text(&self, relative_path: &Path) -> Result<String> {
        match tokio::fs::read_to_string(self.note_path(relative_path)).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ExportError::NoteNotFound(relative_path.to_path_buf()))
            }
            Err(e) => Err(ExportError::io(
                format!("Failed to read {}", relative_path.display()),
                e,
            )),
        }
    }

    /// Load a note from the vault.
    pub async fn load_note(&self, relative_path: &Path) -> Result<Note> {
        let content = self.read_note_text(relative_path).await?;
        Ok(Note::new(relative_path, content))
    }

    /// List markdown notes, optionally restricted to a glob pattern relative to
    /// the vault root. Hidden files and folders are skipped.
    pub fn list_notes(&self, pattern: Option<&str>) -> Result<Vec<PathBuf>> {
        let full_pattern = self.root.join(pattern.unwrap_or("**/*.md"));
        let pattern_str = full_pattern.to_string_lossy();

        let mut notes = Vec::new();

        for entry in glob(&pattern_str)? {
            match entry {
                Ok(path) => {
                    if !path.is_file() || !is_markdown(&path) {
                        continue;
                    }
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        let hidden = relative
                            .components()
                            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
                        if !hidden {
                            notes.push(relative.to_path_buf());
                        }
                    }
                }
                Err(e) => {
                    log::warn!("glob error: {}", e);
                }
            }
        }

        notes.sort();
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_vault() -> (TempDir, Vault) {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path()).unwrap();
        (dir, vault)
    }

    fn write(vault: &Vault, relative: &str, content: &str) {
        let path = vault.root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_missing_vault() {
        let dir = TempDir::new().unwrap();
        let result = Vault::new(dir.path().join("nope"));
        assert!(matches!(result, Err(ExportError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_read_note_text() {
        let (_dir, vault) = setup_test_vault();
        write(&vault, "sub/test.md", "Hello, world!");

        let note = vault.load_note(Path::new("sub/test.md")).await.unwrap();
        assert_eq!(note.content, "Hello, world!");
        assert_eq!(note.name(), "test");
    }

    #[tokio::test]
    async fn test_read_missing_note() {
        let (_dir, vault) = setup_test_vault();
        let result = vault.read_note_text(Path::new("missing.md")).await;
        assert!(matches!(result, Err(ExportError::NoteNotFound(_))));
    }

    #[test]
    fn test_list_notes() {
        let (_dir, vault) = setup_test_vault();
        write(&vault, "b.md", "B");
        write(&vault, "a.md", "A");
        write(&vault, "sub/c.md", "C");
        write(&vault, ".obsidian/hidden.md", "H");
        write(&vault, "image.png", "");

        let notes = vault.list_notes(None).unwrap();
        assert_eq!(
            notes,
            vec![
                PathBuf::from("a.md"),
                PathBuf::from("b.md"),
                PathBuf::from("sub/c.md"),
            ]
        );

        let sub = vault.list_notes(Some("sub/*.md")).unwrap();
        assert_eq!(sub, vec![PathBuf::from("sub/c.md")]);
    }

    #[test]
    fn test_relative_note_path() {
        let (_dir, vault) = setup_test_vault();

        let absolute = vault.root.join("blog/post.md");
        assert_eq!(
            vault.relative_note_path(&absolute),
            PathBuf::from("blog/post.md")
        );
        assert_eq!(
            vault.relative_note_path(Path::new("blog/post.md")),
            PathBuf::from("blog/post.md")
        );
    }
}
