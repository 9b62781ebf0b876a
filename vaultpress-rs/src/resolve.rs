//! Image lookup inside a vault.
//!
//! A reference is tried against an ordered list of candidate locations and the
//! first readable file wins. The order matters: a same-named attachment folder
//! next to the note shadows everything else, then the note's folder, the vault
//! root, and finally conventional attachment folders.

use crate::error::{ExportError, Result};
use std::path::{Path, PathBuf};

/// Conventional attachment folders, relative to the vault root.
pub const ATTACHMENT_FOLDERS: &[&str] = &["Attachments", "attachments", "assets", "images"];

/// Build the de-duplicated, ordered list of paths to try for `reference`.
///
/// `note_dir` is the note's folder relative to the vault root and
/// `note_base_name` its file name without extension.
pub fn candidate_paths(
    vault_root: &Path,
    note_dir: &Path,
    note_base_name: &str,
    reference: &str,
) -> Vec<PathBuf> {
    let relative = reference.trim_start_matches('/');
    let mut candidates: Vec<PathBuf> = Vec::new();

    if reference.starts_with('/') {
        candidates.push(vault_root.join(relative));
    }

    let note_folder = vault_root.join(note_dir);
    candidates.push(note_folder.join(note_base_name).join(relative));
    candidates.push(note_folder.join(relative));
    candidates.push(vault_root.join(relative));

    for folder in ATTACHMENT_FOLDERS {
        candidates.push(vault_root.join(folder).join(relative));
    }

    // References with a directory part get one more pass with separators
    // normalized, so `sub\cat.png` written on Windows still resolves.
    if relative.contains(['/', '\\']) {
        let normalized = relative.replace('\\', "/");
        candidates.push(note_folder.join(&normalized));
        candidates.push(vault_root.join(&normalized));
    }

    let mut unique: Vec<PathBuf> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Resolve `reference` to an absolute path of a readable file.
///
/// Fails with [`ExportError::ImageNotFound`] listing every path tried.
pub async fn resolve_image(
    note_dir: &Path,
    note_base_name: &str,
    vault_root: &Path,
    reference: &str,
) -> Result<PathBuf> {
    let candidates = candidate_paths(vault_root, note_dir, note_base_name, reference);

    for candidate in &candidates {
        if is_readable_file(candidate).await {
            log::debug!("resolved image '{}' -> {}", reference, candidate.display());
            return Ok(candidate.clone());
        }
        log::trace!("image candidate missing: {}", candidate.display());
    }

    Err(ExportError::ImageNotFound {
        reference: reference.to_string(),
        attempted: candidates,
    })
}

// Opening the file doubles as a read-permission probe; unreadable entries are
// treated like missing ones.
async fn is_readable_file(path: &Path) -> bool {
    match tokio::fs::File::open(path).await {
        Ok(file) => file
            .metadata()
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, relative.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_candidate_order() {
        let root = Path::new("/vault");
        let candidates = candidate_paths(root, Path::new("blog"), "Post", "cat.png");
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/vault/blog/Post/cat.png"),
                PathBuf::from("/vault/blog/cat.png"),
                PathBuf::from("/vault/cat.png"),
                PathBuf::from("/vault/Attachments/cat.png"),
                PathBuf::from("/vault/attachments/cat.png"),
                PathBuf::from("/vault/assets/cat.png"),
                PathBuf::from("/vault/images/cat.png"),
            ]
        );
    }

    #[test]
    fn test_rooted_reference_tried_first() {
        let root = Path::new("/vault");
        let candidates = candidate_paths(root, Path::new("blog"), "Post", "/media/cat.png");
        assert_eq!(candidates[0], PathBuf::from("/vault/media/cat.png"));
        assert_eq!(candidates[1], PathBuf::from("/vault/blog/Post/media/cat.png"));
        // Duplicates of earlier candidates are dropped
        let count = candidates
            .iter()
            .filter(|c| **c == PathBuf::from("/vault/media/cat.png"))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_note_at_vault_root_dedupes() {
        let root = Path::new("/vault");
        let candidates = candidate_paths(root, Path::new(""), "Post", "sub/cat.png");
        assert_eq!(candidates[0], PathBuf::from("/vault/Post/sub/cat.png"));
        assert_eq!(candidates[1], PathBuf::from("/vault/sub/cat.png"));
        assert_eq!(candidates.len(), 6);
    }

    #[test]
    fn test_backslash_reference_normalized() {
        let root = Path::new("/vault");
        let candidates = candidate_paths(root, Path::new("blog"), "Post", r"sub\cat.png");
        let tail = &candidates[candidates.len() - 2..];
        assert_eq!(
            tail,
            &[
                PathBuf::from("/vault/blog/sub/cat.png"),
                PathBuf::from("/vault/sub/cat.png"),
            ]
        );
    }

    #[tokio::test]
    async fn test_same_named_folder_wins() {
        let dir = TempDir::new().unwrap();
        let expected = touch(dir.path(), "blog/Post/cat.png");
        touch(dir.path(), "cat.png");
        touch(dir.path(), "blog/cat.png");

        let resolved = resolve_image(Path::new("blog"), "Post", dir.path(), "cat.png")
            .await
            .unwrap();
        assert_eq!(resolved, expected);
    }

    #[tokio::test]
    async fn test_falls_back_to_attachment_folder() {
        let dir = TempDir::new().unwrap();
        let expected = touch(dir.path(), "assets/diagram.svg");

        let resolved = resolve_image(Path::new("blog"), "Post", dir.path(), "diagram.svg")
            .await
            .unwrap();
        assert_eq!(resolved, expected);
    }

    #[tokio::test]
    async fn test_directory_is_not_a_match() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("blog/Post/cat.png")).unwrap();
        let expected = touch(dir.path(), "cat.png");

        let resolved = resolve_image(Path::new("blog"), "Post", dir.path(), "cat.png")
            .await
            .unwrap();
        assert_eq!(resolved, expected);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_candidate_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = touch(dir.path(), "blog/Post/cat.png");
        let expected = touch(dir.path(), "blog/cat.png");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can read the file regardless of its mode
        if std::fs::File::open(&locked).is_ok() {
            return;
        }

        let resolved = resolve_image(Path::new("blog"), "Post", dir.path(), "cat.png")
            .await
            .unwrap();
        assert_eq!(resolved, expected);

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[tokio::test]
    async fn test_not_found_lists_attempts() {
        let dir = TempDir::new().unwrap();
        let err = resolve_image(Path::new("blog"), "Post", dir.path(), "missing.png")
            .await
            .unwrap_err();

        match err {
            ExportError::ImageNotFound {
                reference,
                attempted,
            } => {
                assert_eq!(reference, "missing.png");
                assert_eq!(attempted.len(), 7);
                assert_eq!(attempted[0], dir.path().join("blog/Post/missing.png"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
