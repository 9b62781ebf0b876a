//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vaultpress")]
#[command(author, version, about = "Export Obsidian-style notes to a static site", long_about = None)]
pub struct Cli {
    /// Path to the vault (defaults to the current directory)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Settings file (defaults to <config dir>/vaultpress/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory exported notes are written to
    #[arg(long, global = true)]
    pub posts_dir: Option<PathBuf>,

    /// Directory referenced images are copied to
    #[arg(long, global = true)]
    pub images_dir: Option<PathBuf>,

    /// Trace every export step
    #[arg(long, global = true)]
    pub debug: bool,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the given notes
    Export(ExportArgs),

    /// Export every note in the vault (or those matching a glob)
    #[command(name = "export-all")]
    ExportAll(ExportAllArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Note paths, relative to the vault root or absolute
    #[arg(required = true)]
    pub notes: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExportAllArgs {
    /// Glob pattern relative to the vault root (e.g., "blog/**/*.md")
    #[arg(long)]
    pub glob: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export() {
        let cli = Cli::parse_from([
            "vaultpress",
            "--vault",
            "/v",
            "--posts-dir",
            "~/site/content/posts",
            "export",
            "a.md",
            "b/c.md",
        ]);
        assert_eq!(cli.vault, Some(PathBuf::from("/v")));
        assert_eq!(cli.posts_dir, Some(PathBuf::from("~/site/content/posts")));
        match cli.command {
            Commands::Export(args) => assert_eq!(args.notes.len(), 2),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_export_all_yaml() {
        let cli = Cli::parse_from(["vaultpress", "export-all", "--glob", "blog/*.md", "--yaml"]);
        assert_eq!(cli.output_format(), OutputFormat::Yaml);
        assert!(matches!(
            cli.command,
            Commands::ExportAll(ExportAllArgs { glob: Some(_) })
        ));
    }

    #[test]
    fn test_export_requires_notes() {
        assert!(Cli::try_parse_from(["vaultpress", "export"]).is_err());
    }
}
