//! Process command implementation
//!
//! Smooths, resamples and reduces every bone and morph channel of a VMD file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use vmdtune_motion::{process_channels, PipelineConfig, ProcessReport};
use vmdtune_vmd::Motion;

use super::json_output::{JsonError, ProcessJson};
use crate::channels::{group_channels, store_channels};
use crate::config::{load_config, ConfigOverrides};

/// Run the process command
///
/// # Arguments
/// * `input` - VMD file to read
/// * `output` - VMD file to write
/// * `config_path` - Optional JSON pipeline config
/// * `overrides` - Settings given as flags, applied over the config file
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on failure. Nothing is written on failure.
pub fn run(
    input: &Path,
    output: &Path,
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(input, output, config_path, overrides)
    } else {
        run_human(input, output, config_path, overrides)
    }
}

fn run_human(
    input: &Path,
    output: &Path,
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ExitCode> {
    let start = Instant::now();
    println!("{} {}", "Processing:".cyan().bold(), input.display());

    let config = load_config(config_path, overrides)?;
    print_config(&config);

    let report = process_file(input, output, &config)?;
    print_report(&report);

    println!(
        "\n{} Wrote {} ({} -> {} keyframes, {}ms)",
        "SUCCESS".green().bold(),
        output.display(),
        report.keyframes_before(),
        report.keyframes_after(),
        start.elapsed().as_millis()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_json(
    input: &Path,
    output: &Path,
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ExitCode> {
    let outcome = load_config(config_path, overrides).and_then(|config| {
        let report = process_file(input, output, &config)?;
        Ok((config, report))
    });

    let (result, code) = match outcome {
        Ok((config, report)) => (
            ProcessJson {
                success: true,
                input: input.display().to_string(),
                output: output.display().to_string(),
                config: Some(config),
                report: Some(report),
                errors: Vec::new(),
            },
            ExitCode::SUCCESS,
        ),
        Err(err) => (
            ProcessJson {
                success: false,
                input: input.display().to_string(),
                output: output.display().to_string(),
                config: None,
                report: None,
                errors: vec![JsonError::from_anyhow(&err)],
            },
            ExitCode::from(1),
        ),
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(code)
}

/// Reads `input`, runs the pipeline and writes `output`.
///
/// The output file is only created once every channel has been processed.
pub fn process_file(input: &Path, output: &Path, config: &PipelineConfig) -> Result<ProcessReport> {
    let mut motion = read_motion(input)?;
    let channels = group_channels(&motion);
    tracing::info!(
        bones = motion.bones.len(),
        morphs = motion.morphs.len(),
        channels = channels.len(),
        "read motion"
    );

    let processed = process_channels(channels, config)?;
    store_channels(&mut motion, &processed.channels);

    write_motion(output, &motion)?;
    Ok(processed.report)
}

pub fn read_motion(path: &Path) -> Result<Motion> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open motion file: {}", path.display()))?;
    Motion::read(&mut BufReader::new(file))
        .with_context(|| format!("Failed to read motion file: {}", path.display()))
}

fn write_motion(path: &Path, motion: &Motion) -> Result<()> {
    let bytes = motion.to_bytes()?;
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}

fn print_config(config: &PipelineConfig) {
    let cutoff = config
        .cutoff_hz
        .map(|hz| format!("{} Hz", hz))
        .unwrap_or_else(|| "off".to_string());
    let reduction = config
        .reduction
        .map(|th| {
            format!(
                "pos {} / rot {} deg / morph {}",
                th.position, th.rotation_deg, th.morph
            )
        })
        .unwrap_or_else(|| "off".to_string());
    println!(
        "{} {} -> {} fps",
        "Rate:".dimmed(),
        config.source_fps,
        config.target_fps()
    );
    println!("{} {}", "Low-pass:".dimmed(), cutoff);
    println!("{} {}", "Reduction:".dimmed(), reduction);
}

fn print_report(report: &ProcessReport) {
    for channel in &report.channels {
        println!(
            "  {} {} {}: {} -> {}",
            "+".green(),
            channel.kind.as_str().dimmed(),
            channel.name,
            channel.keyframes_before,
            channel.keyframes_after
        );
    }
    for skipped in &report.skipped {
        println!(
            "  {} {} {} skipped [{}]: {}",
            "!".yellow(),
            skipped.kind.as_str().dimmed(),
            skipped.name,
            skipped.code,
            skipped.reason
        );
    }
}
