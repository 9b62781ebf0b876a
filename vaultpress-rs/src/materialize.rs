//! Copying resolved images into the static asset tree.

use crate::error::{ExportError, Result};
use crate::parser::naming::sanitize_filename;
use crate::types::ResolvedImage;
use std::path::{Path, PathBuf};

/// Published file name for an image reference.
///
/// Any folder part of the reference is dropped, so same-named images from
/// different folders land on the same destination and the last copy wins.
pub fn destination_name(reference: &str) -> String {
    let base = reference
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(reference);
    sanitize_filename(base)
}

/// Markdown for a published image: `![alt](<prefix>/<name>)`.
///
/// Empty alt text falls back to the file name. The name is percent-encoded.
pub fn image_fragment(alt_text: &str, file_name: &str, url_prefix: &str) -> String {
    let alt = if alt_text.trim().is_empty() {
        file_name
    } else {
        alt_text
    };
    format!(
        "![{}]({}/{})",
        alt,
        url_prefix.trim_end_matches('/'),
        urlencoding::encode(file_name)
    )
}

/// Plan where a resolved source file will be copied.
pub fn plan_copy(source: &Path, reference: &str) -> ResolvedImage {
    ResolvedImage {
        absolute_source_path: source.to_path_buf(),
        destination_relative_path: PathBuf::from(destination_name(reference)),
    }
}

/// Copy `source_path` into `static_images_dir` and return the markdown that
/// replaces the original reference.
///
/// The destination directory is created if needed and an existing file is
/// overwritten without comparison. A copy that fails halfway is not rolled back.
pub async fn materialize_image(
    source_path: &Path,
    static_images_dir: &Path,
    desired_basename: &str,
    alt_text: &str,
    url_prefix: &str,
) -> Result<String> {
    let plan = plan_copy(source_path, desired_basename);
    let destination = static_images_dir.join(&plan.destination_relative_path);

    tokio::fs::create_dir_all(static_images_dir)
        .await
        .map_err(|e| {
            ExportError::io(
                format!("Failed to create {}", static_images_dir.display()),
                e,
            )
        })?;

    tokio::fs::copy(&plan.absolute_source_path, &destination)
        .await
        .map_err(|e| {
            ExportError::io(
                format!(
                    "Failed to copy {} to {}",
                    plan.absolute_source_path.display(),
                    destination.display()
                ),
                e,
            )
        })?;

    log::debug!(
        "copied {} -> {}",
        plan.absolute_source_path.display(),
        destination.display()
    );

    let file_name = plan.destination_relative_path.to_string_lossy();
    Ok(image_fragment(alt_text, &file_name, url_prefix))
}
