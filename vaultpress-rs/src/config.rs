//! Export settings.
//!
//! Settings come from an optional TOML file, may be overridden by the host, and
//! are resolved to absolute paths before any export runs.

use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Default URL section that rewritten wikilinks point into.
pub const DEFAULT_POSTS_URL_PREFIX: &str = "posts";

/// Default URL prefix copied images are served under.
pub const DEFAULT_IMAGES_URL_PREFIX: &str = "/";

/// Export settings owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where exported notes are written. May start with `~`.
    pub posts_directory: PathBuf,

    /// Where referenced images are copied. May start with `~`.
    pub static_images_directory: PathBuf,

    /// Trace every pipeline step.
    pub debug_mode: bool,

    /// Site section for rewritten wikilinks (`/<prefix>/<slug>/`).
    pub posts_url_prefix: String,

    /// URL prefix for copied images.
    pub images_url_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            posts_directory: PathBuf::from("content/posts"),
            static_images_directory: PathBuf::from("static"),
            debug_mode: false,
            posts_url_prefix: DEFAULT_POSTS_URL_PREFIX.to_string(),
            images_url_prefix: DEFAULT_IMAGES_URL_PREFIX.to_string(),
        }
    }
}

impl Settings {
    /// Default settings file: `<config_dir>/vaultpress/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vaultpress").join("config.toml"))
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ExportError::io(format!("Failed to read {}", path.display()), e))?;
        Self::from_toml(&text)
    }

    /// Load settings from the default location, or defaults if the file is absent.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Return a copy with both directories expanded and made absolute.
    pub fn resolved(&self) -> Result<Self> {
        Ok(Self {
            posts_directory: expand_path(&self.posts_directory)?,
            static_images_directory: expand_path(&self.static_images_directory)?,
            ..self.clone()
        })
    }
}

/// Expand a leading `~` to the home directory and make the path absolute.
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let mut components = path.components();
    let expanded = match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = dirs::home_dir().ok_or_else(|| {
                ExportError::ConfigError("Could not determine home directory".to_string())
            })?;
            home.join(components.as_path())
        }
        _ => path.to_path_buf(),
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| ExportError::io("Failed to read current directory", e))?;
        Ok(cwd.join(expanded))
    }
}
