//! Command-line argument parsing for Terrella binaries.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, QualityTier};

/// Terrella command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "terrella", about = "Terrella planet core")]
pub struct CliArgs {
    /// Quality tier (0 = highest fidelity, 5 = lowest).
    #[arg(long)]
    pub quality: Option<u8>,

    /// Spatial grid cell size.
    #[arg(long)]
    pub cell_size: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Run headless for this many frames, then exit.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(q) = args.quality {
            self.graphics.quality_tier = QualityTier::from_index(q);
        }
        if let Some(size) = args.cell_size {
            self.grid.cell_size = size;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
