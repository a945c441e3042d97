//! Inspect command implementation
//!
//! Lists the channels of a VMD file.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use vmdtune_motion::Channel;

use super::json_output::{ChannelSummary, InspectJson, JsonError};
use super::process::read_motion;
use crate::channels::group_channels;

/// Run the inspect command
///
/// # Arguments
/// * `input` - VMD file to read
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(input: &Path, json_output: bool) -> Result<ExitCode> {
    if json_output {
        return run_json(input);
    }

    println!("{} {}", "Inspecting:".cyan().bold(), input.display());
    let motion = read_motion(input)?;
    let channels = group_channels(&motion);
    println!(
        "{} {}",
        "Model:".dimmed(),
        String::from_utf8_lossy(vmdtune_vmd::header::until_nul(&motion.model_name))
    );
    println!(
        "{} {} bone / {} morph records, {} trailing bytes",
        "Records:".dimmed(),
        motion.bones.len(),
        motion.morphs.len(),
        motion.trailer.len()
    );

    for summary in channels.iter().map(summarize) {
        let range = match (summary.first_frame, summary.last_frame) {
            (Some(first), Some(last)) => format!("{}..={}", first, last),
            _ => "-".to_string(),
        };
        println!(
            "  {} {}: {} keyframes, frames {}",
            summary.kind.as_str().dimmed(),
            summary.name,
            summary.keyframes,
            range
        );
    }
    println!("\n{} {} channel(s)", "DONE".green().bold(), channels.len());
    Ok(ExitCode::SUCCESS)
}

fn run_json(input: &Path) -> Result<ExitCode> {
    let (result, code) = match read_motion(input) {
        Ok(motion) => (
            InspectJson {
                success: true,
                input: input.display().to_string(),
                model_name: Some(
                    String::from_utf8_lossy(vmdtune_vmd::header::until_nul(&motion.model_name))
                        .into_owned(),
                ),
                channels: group_channels(&motion).iter().map(summarize).collect(),
                errors: Vec::new(),
            },
            ExitCode::SUCCESS,
        ),
        Err(err) => (
            InspectJson {
                success: false,
                input: input.display().to_string(),
                model_name: None,
                channels: Vec::new(),
                errors: vec![JsonError::from_anyhow(&err)],
            },
            ExitCode::from(1),
        ),
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(code)
}

/// Name, kind, size and frame range of one channel.
pub fn summarize(channel: &Channel) -> ChannelSummary {
    let range = channel.frame_range();
    ChannelSummary {
        name: channel.name().to_string(),
        kind: channel.kind(),
        keyframes: channel.len(),
        first_frame: range.map(|(first, _)| first),
        last_frame: range.map(|(_, last)| last),
    }
}
