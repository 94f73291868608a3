//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Deepbound command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "deepbound", about = "Deepbound terrain generator")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// World height in tiles.
    #[arg(long)]
    pub height: Option<i32>,

    /// Sea level row.
    #[arg(long)]
    pub sea_level: Option<i32>,

    /// Disable cave carving.
    #[arg(long)]
    pub no_caves: bool,

    /// Number of generation worker threads (0 = auto).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// First chunk column to preview.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub chunk_x: i32,

    /// Number of chunk columns to preview.
    #[arg(long, default_value_t = 4)]
    pub chunks_wide: u32,

    /// Horizontal sampling step of the preview (tiles per character).
    #[arg(long, default_value_t = 2)]
    pub step: u32,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(height) = args.height {
            self.world.height = height;
        }
        if let Some(sea_level) = args.sea_level {
            self.world.sea_level = sea_level;
        }
        if args.no_caves {
            self.caves.enabled = false;
        }
        if let Some(threads) = args.threads {
            self.workers.threads = threads;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(42),
            sea_level: Some(300),
            no_caves: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.sea_level, 300);
        assert!(!config.caves.enabled);
        // Non-overridden fields retain defaults
        assert_eq!(config.world.height, 1024);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "deepbound",
            "--seed",
            "5",
            "--chunk-x",
            "-3",
            "--no-caves",
        ]);
        assert_eq!(args.seed, Some(5));
        assert_eq!(args.chunk_x, -3);
        assert!(args.no_caves);
        assert_eq!(args.chunks_wide, 4);
    }
}
