//! vmdtune CLI - Command-line interface for cleaning up VMD motion capture
//!
//! This binary smooths, resamples and reduces the bone and morph keyframes
//! of VMD motion files.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use vmdtune_cli::commands;
use vmdtune_cli::config::ConfigOverrides;
use vmdtune_cli::logging;

/// vmdtune - VMD keyframe smoothing, resampling and reduction
#[derive(Parser)]
#[command(name = "vmdtune")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter, resample and reduce every channel of a VMD file
    Process {
        /// Path to the input VMD file
        input: PathBuf,

        /// Path to the output VMD file
        output: PathBuf,

        /// JSON pipeline config (flags below override its values)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Low-pass cutoff frequency in Hz
        #[arg(long, conflicts_with = "no_filter")]
        cutoff: Option<f64>,

        /// Skip the low-pass filter
        #[arg(long)]
        no_filter: bool,

        /// Position error threshold for reduction
        #[arg(long)]
        th_pos: Option<f64>,

        /// Rotation error threshold for reduction, in degrees
        #[arg(long)]
        th_rot: Option<f64>,

        /// Morph weight error threshold for reduction
        #[arg(long)]
        th_morph: Option<f64>,

        /// Skip keyframe reduction
        #[arg(long)]
        no_reduce: bool,

        /// Frame rate of the input motion
        #[arg(long)]
        fps_in: Option<f64>,

        /// Frame rate to resample to (default: same as input)
        #[arg(long)]
        fps_out: Option<f64>,

        /// Interpolate linearly instead of using the stored Bezier curves
        #[arg(long)]
        linear: bool,

        /// Keep linear curves on reduced keyframes instead of fitting new ones
        #[arg(long)]
        no_fit: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the channels of a VMD file
    Inspect {
        /// Path to the VMD file
        input: PathBuf,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Process {
            input,
            output,
            config,
            cutoff,
            no_filter,
            th_pos,
            th_rot,
            th_morph,
            no_reduce,
            fps_in,
            fps_out,
            linear,
            no_fit,
            json,
        } => {
            let overrides = ConfigOverrides {
                cutoff_hz: cutoff,
                no_filter,
                th_pos,
                th_rot,
                th_morph,
                no_reduce,
                fps_in,
                fps_out,
                linear,
                no_fit,
            };
            commands::process::run(&input, &output, config.as_deref(), &overrides, json)
        }
        Commands::Inspect { input, json } => commands::inspect::run(&input, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_process_defaults() {
        let cli = Cli::try_parse_from(["vmdtune", "process", "in.vmd", "out.vmd"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Process {
                input,
                output,
                config,
                cutoff,
                no_filter,
                json,
                ..
            } => {
                assert_eq!(input, PathBuf::from("in.vmd"));
                assert_eq!(output, PathBuf::from("out.vmd"));
                assert!(config.is_none());
                assert!(cutoff.is_none());
                assert!(!no_filter);
                assert!(!json);
            }
            _ => panic!("expected process command"),
        }
    }

    #[test]
    fn test_cli_parses_process_options() {
        let cli = Cli::try_parse_from([
            "vmdtune",
            "process",
            "in.vmd",
            "out.vmd",
            "--config",
            "tune.json",
            "--cutoff",
            "4.5",
            "--th-rot",
            "1.5",
            "--fps-in",
            "60",
            "--fps-out",
            "30",
            "--linear",
            "--no-fit",
            "--json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Process {
                config,
                cutoff,
                th_rot,
                th_pos,
                fps_in,
                fps_out,
                linear,
                no_fit,
                json,
                ..
            } => {
                assert_eq!(config, Some(PathBuf::from("tune.json")));
                assert_eq!(cutoff, Some(4.5));
                assert_eq!(th_rot, Some(1.5));
                assert_eq!(th_pos, None);
                assert_eq!(fps_in, Some(60.0));
                assert_eq!(fps_out, Some(30.0));
                assert!(linear);
                assert!(no_fit);
                assert!(json);
            }
            _ => panic!("expected process command"),
        }
    }

    #[test]
    fn test_cli_rejects_cutoff_with_no_filter() {
        let result = Cli::try_parse_from([
            "vmdtune",
            "process",
            "in.vmd",
            "out.vmd",
            "--cutoff",
            "5",
            "--no-filter",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_inspect() {
        let cli = Cli::try_parse_from(["vmdtune", "inspect", "dance.vmd", "--json"]).unwrap();
        match cli.command {
            Commands::Inspect { input, json } => {
                assert_eq!(input, PathBuf::from("dance.vmd"));
                assert!(json);
            }
            _ => panic!("expected inspect command"),
        }
    }

    #[test]
    fn test_cli_requires_output() {
        assert!(Cli::try_parse_from(["vmdtune", "process", "in.vmd"]).is_err());
    }
}
