//! Vaultpress - export Obsidian-style notes into a static-site content tree.
//!
//! # Overview
//!
//! A note goes through one pipeline:
//! - Frontmatter is split off and given a `title` and `date` when missing
//! - Fenced and inline code is lifted out so nothing inside it is rewritten
//! - Image embeds (`![[x.png]]`, `![alt](x.png)`) are located in the vault,
//!   copied into the static images directory and rewritten to site URLs
//! - Wikilinks (`[[Note]]`, `[[Note|text]]`) become links into the posts section
//! - The document is reassembled and written to the posts directory
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use vaultpress::{ExportContext, Exporter, Settings, Vault};
//!
//! # async fn run() -> vaultpress::Result<()> {
//! let vault = Vault::new("/path/to/vault")?;
//! let settings = Settings::load_default()?;
//! let exporter = Exporter::new(vault, &settings)?;
//!
//! exporter.export_one(Path::new("blog/My Post.md"), ExportContext::Single).await?;
//!
//! let summary = exporter.export_many(&["a.md", "b.md"]).await;
//! println!("{} exported, {} failed", summary.succeeded, summary.failed);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod materialize;
pub mod note;
pub mod parser;
pub mod resolve;
pub mod rewrite;
pub mod types;
pub mod vault;

// Re-export main types at crate root
pub use config::Settings;
pub use error::{ExportError, Result};
pub use export::Exporter;
pub use note::Note;
pub use types::*;
pub use vault::Vault;
