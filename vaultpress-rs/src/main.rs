//! Vaultpress CLI entry point.

use clap::Parser;
use std::process::ExitCode;
use vaultpress::cli::args::{Cli, Commands};
use vaultpress::cli::export;
use vaultpress::cli::output::Output;
use vaultpress::error::{exit_code, ExportError};
use vaultpress::export::Exporter;
use vaultpress::logging::init_logging;
use vaultpress::vault::Vault;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new(cli.output_format(), cli.quiet);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            output.error(&format!("failed to start runtime: {}", e));
            return ExitCode::from(exit_code::GENERAL_ERROR as u8);
        }
    };

    match runtime.block_on(run(&cli, &output)) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            output.error(&e.to_string());
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: &Cli, output: &Output) -> Result<i32, ExportError> {
    let settings = export::load_settings(cli)?;
    init_logging(settings.debug_mode, output.is_quiet());

    let vault_path = match cli.vault {
        Some(ref path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let vault = Vault::new(vault_path)?;
    let exporter = Exporter::new(vault, &settings)?;
    log::debug!("settings: {:?}", exporter.settings());

    let summary = match &cli.command {
        Commands::Export(args) => export::export(&exporter, args, output).await?,
        Commands::ExportAll(args) => export::export_all(&exporter, args, output).await?,
    };

    Ok(match summary.into_result() {
        Ok(_) => exit_code::SUCCESS,
        Err(e) => e.exit_code(),
    })
}
