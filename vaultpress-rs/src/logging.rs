//! Logger bootstrap for the `vaultpress` binary.

use log::LevelFilter;
use std::sync::Once;

static INIT: Once = Once::new();

/// Level used when `RUST_LOG` is not set.
pub fn default_level(debug_mode: bool, quiet: bool) -> LevelFilter {
    if debug_mode {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install `env_logger` once per process. `RUST_LOG` overrides the level
/// chosen from the settings.
pub fn init_logging(debug_mode: bool, quiet: bool) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder
            .filter_level(default_level(debug_mode, quiet))
            .format_timestamp(None)
            .parse_default_env();
        if let Err(e) = builder.try_init() {
            eprintln!("Warning: logger already initialized: {}", e);
        }
    });
}
