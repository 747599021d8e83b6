//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;
use voxblend_core::CONFIG_DIR_ENV;

use crate::commands::Commands;

/// Command-line interface for the voice blender.
///
/// Every command operates on the last-used mix, which is restored on start
/// and persisted on exit.
#[derive(Parser)]
#[command(name = "voxblend")]
#[command(about = "Blend Kokoro voices into a single voice embedding")]
#[command(version)]
pub struct Cli {
    /// Directory holding the last-used configuration
    #[arg(long = "config-dir", global = true, env = CONFIG_DIR_ENV)]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Toggle;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["voxblend", "--verbose", "--config-dir", "/tmp/vb", "show"]);
        assert!(cli.verbose);
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/vb")));
        assert!(matches!(cli.command, Some(Commands::Show)));
    }

    #[test]
    fn test_set_accepts_out_of_range_values() {
        let cli = Cli::parse_from(["voxblend", "set", "af_bella", "-5"]);
        match cli.command {
            Some(Commands::Set { voice, units }) => {
                assert_eq!(voice, "af_bella");
                assert_eq!(units, -5);
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn test_randomize_defaults() {
        let cli = Cli::parse_from(["voxblend", "randomize"]);
        match cli.command {
            Some(Commands::Randomize { count, seed }) => {
                assert_eq!(count, voxblend_core::DEFAULT_RANDOM_COUNT);
                assert_eq!(seed, None);
            }
            _ => panic!("expected randomize"),
        }
    }

    #[test]
    fn test_normalize_toggle() {
        let cli = Cli::parse_from(["voxblend", "normalize", "off"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Normalize { state: Toggle::Off })
        ));
        assert!(Cli::try_parse_from(["voxblend", "normalize", "maybe"]).is_err());
    }

    #[test]
    fn test_export_requires_paths() {
        assert!(Cli::try_parse_from(["voxblend", "export", "--out", "mix.npy"]).is_err());
        let cli = Cli::parse_from([
            "voxblend", "export", "--voices", "voices.bin", "--out", "mix.npy",
        ]);
        match cli.command {
            Some(Commands::Export { voices, out }) => {
                assert_eq!(voices, PathBuf::from("voices.bin"));
                assert_eq!(out, PathBuf::from("mix.npy"));
            }
            _ => panic!("expected export"),
        }
    }
}
