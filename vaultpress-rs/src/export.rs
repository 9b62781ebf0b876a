//! Note export: one note, or a batch of notes processed one after another.

use crate::config::Settings;
use crate::error::{ExportError, Result};
use crate::note::{is_markdown, note_name};
use crate::parser::frontmatter::merge_frontmatter;
use crate::parser::naming::sanitize_filename;
use crate::rewrite::{rewrite_body, RewriteContext};
use crate::types::{ExportContext, ExportSummary};
use crate::vault::Vault;
use chrono::{DateTime, FixedOffset, Local};
use std::path::{Path, PathBuf};

/// Exports notes from a vault into the configured site directories.
#[derive(Debug, Clone)]
pub struct Exporter {
    vault: Vault,
    settings: Settings,
    timestamp: Option<DateTime<FixedOffset>>,
}

impl Exporter {
    /// Create an exporter. Settings paths are expanded and made absolute here.
    pub fn new(vault: Vault, settings: &Settings) -> Result<Self> {
        Ok(Self {
            vault,
            settings: settings.resolved()?,
            timestamp: None,
        })
    }

    /// Use a fixed time for defaulted `date` fields instead of the current time.
    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Where a note's export is written: `<posts>/<sanitized name>.md`.
    pub fn output_path(&self, note: &Path) -> PathBuf {
        self.settings
            .posts_directory
            .join(format!("{}.md", sanitize_filename(note_name(note))))
    }

    /// Export a single note and return the path written.
    ///
    /// Image failures are reported inline in the output; anything else aborts
    /// this note and is returned wrapped with the note path.
    pub async fn export_one(&self, note: &Path, context: ExportContext) -> Result<PathBuf> {
        let relative = self.vault.relative_note_path(note);
        let written = self
            .export_note(&relative)
            .await
            .map_err(|e| e.for_note(&relative))?;

        if context.is_batch() {
            log::debug!("exported {} -> {}", relative.display(), written.display());
        } else {
            log::info!("Exported {} to {}", relative.display(), written.display());
        }
        Ok(written)
    }

    /// Export notes in order. Never fails: each failure is logged and counted
    /// and the next note is processed.
    pub async fn export_many<P: AsRef<Path>>(&self, notes: &[P]) -> ExportSummary {
        let mut summary = ExportSummary::default();

        for note in notes {
            match self.export_one(note.as_ref(), ExportContext::Batch).await {
                Ok(_) => summary.succeeded += 1,
                Err(e) => {
                    log::warn!("{}", e);
                    summary.failed += 1;
                }
            }
        }

        log::info!(
            "Exported {}/{} notes ({} failed)",
            summary.succeeded,
            summary.total(),
            summary.failed
        );
        summary
    }

    async fn export_note(&self, relative: &Path) -> Result<PathBuf> {
        if !is_markdown(relative) {
            return Err(ExportError::InvalidInput(format!(
                "{} is not a markdown file",
                relative.display()
            )));
        }

        log::debug!("reading {}", relative.display());
        let note = self.vault.load_note(relative).await?;

        let now = self
            .timestamp
            .unwrap_or_else(|| Local::now().fixed_offset());
        let mut document = merge_frontmatter(&note.content, note.name(), now, &note.path)?;

        let ctx = RewriteContext {
            vault_root: &self.vault.root,
            note_dir: note.folder(),
            note_base_name: note.name(),
            settings: &self.settings,
        };
        document.body = rewrite_body(&document.body, &ctx).await;

        let output = document.to_markdown()?;
        let destination = self.output_path(relative);
        write_output(&destination, &output).await?;
        Ok(destination)
    }
}

async fn write_output(destination: &Path, content: &str) -> Result<()> {
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ExportError::io(format!("Failed to create {}", parent.display()), e))?;
    }
    tokio::fs::write(destination, content)
        .await
        .map_err(|e| ExportError::io(format!("Failed to write {}", destination.display()), e))
}
