//! Export command implementations.

use crate::cli::args::{Cli, ExportAllArgs, ExportArgs};
use crate::cli::output::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::export::Exporter;
use crate::types::{ExportContext, ExportSummary};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    #[serde(flatten)]
    pub summary: ExportSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub written: Vec<String>,
}

/// Load settings from `--config` (or the default location) and apply CLI
/// overrides.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match cli.config {
        Some(ref path) => Settings::load(path)?,
        None => Settings::load_default()?,
    };

    if let Some(ref dir) = cli.posts_dir {
        settings.posts_directory = dir.clone();
    }
    if let Some(ref dir) = cli.images_dir {
        settings.static_images_directory = dir.clone();
    }
    if cli.debug {
        settings.debug_mode = true;
    }

    Ok(settings)
}

/// Export explicitly named notes.
///
/// A single note fails the command on error; several notes are exported as a
/// batch and failures are only counted.
pub async fn export(exporter: &Exporter, args: &ExportArgs, output: &Output) -> Result<ExportSummary> {
    if let [note] = args.notes.as_slice() {
        let written = exporter.export_one(note, ExportContext::Single).await?;
        let response = ExportResponse {
            summary: ExportSummary {
                succeeded: 1,
                failed: 0,
            },
            written: vec![written.to_string_lossy().to_string()],
        };
        output.print(&response)?;
        return Ok(response.summary);
    }

    let summary = exporter.export_many(args.notes.as_slice()).await;
    print_summary(summary, output)?;
    Ok(summary)
}

/// Export every note in the vault, or those matching `--glob`.
pub async fn export_all(
    exporter: &Exporter,
    args: &ExportAllArgs,
    output: &Output,
) -> Result<ExportSummary> {
    let notes: Vec<PathBuf> = exporter.vault().list_notes(args.glob.as_deref())?;
    if notes.is_empty() {
        log::warn!("No notes to export");
    } else {
        output.info(&format!("Exporting {} notes", notes.len()));
    }

    let summary = exporter.export_many(notes.as_slice()).await;
    print_summary(summary, output)?;
    Ok(summary)
}

fn print_summary(summary: ExportSummary, output: &Output) -> Result<()> {
    output.print(&ExportResponse {
        summary,
        written: Vec::new(),
    })
}
