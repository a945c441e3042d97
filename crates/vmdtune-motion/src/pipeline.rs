//! Per-channel processing: gap fill, smoothing, resampling, reduction and
//! curve fitting.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bezier::BezierCurve;
use crate::channel::{Channel, ChannelKind, Track};
use crate::config::PipelineConfig;
use crate::densify::densify;
use crate::error::MotionResult;
use crate::filter::lowpass_filter;
use crate::fps::change_fps;
use crate::keyframe::{Axis, BoneKeyframe, MorphKeyframe};
use crate::optimize::optimize_bezier_parameter_with;
use crate::reduce::reduce_indices;

/// Keyframe counts for one processed channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReport {
    pub name: String,
    pub kind: ChannelKind,
    pub keyframes_before: usize,
    pub keyframes_after: usize,
}

/// A channel passed through unmodified because it was malformed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedChannel {
    pub name: String,
    pub kind: ChannelKind,
    pub code: String,
    pub reason: String,
}

/// Summary of a [`process_channels`] run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessReport {
    pub channels: Vec<ChannelReport>,
    pub skipped: Vec<SkippedChannel>,
}

impl ProcessReport {
    /// Total keyframes across processed channels before processing.
    pub fn keyframes_before(&self) -> usize {
        self.channels.iter().map(|c| c.keyframes_before).sum()
    }

    /// Total keyframes across processed channels after processing.
    pub fn keyframes_after(&self) -> usize {
        self.channels.iter().map(|c| c.keyframes_after).sum()
    }
}

/// Processed channels, in input order, and the run summary.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub channels: Vec<Channel>,
    pub report: ProcessReport,
}

/// Runs the pipeline over a single channel.
///
/// Fails on an invalid config or a malformed channel.
pub fn process_channel(channel: &Channel, config: &PipelineConfig) -> MotionResult<Channel> {
    config.validate()?;
    channel.validate()?;
    run_channel(channel, config)
}

/// Runs the pipeline over every channel.
///
/// The config is validated once up front; an invalid config fails the whole
/// run before any channel is touched. Malformed channels are logged, recorded
/// in the report and returned unchanged.
pub fn process_channels(
    channels: Vec<Channel>,
    config: &PipelineConfig,
) -> MotionResult<ProcessOutput> {
    config.validate()?;

    let mut report = ProcessReport::default();
    let mut processed = Vec::with_capacity(channels.len());
    for channel in channels {
        let name = channel.name().to_string();
        let kind = channel.kind();

        let outcome = channel
            .validate()
            .and_then(|_| run_channel(&channel, config));
        match outcome {
            Ok(out) => {
                report.channels.push(ChannelReport {
                    name,
                    kind,
                    keyframes_before: channel.len(),
                    keyframes_after: out.len(),
                });
                processed.push(out);
            }
            Err(err) if !err.is_fatal() => {
                warn!(channel = %name, kind = kind.as_str(), error = %err, "skipping channel");
                report.skipped.push(SkippedChannel {
                    name,
                    kind,
                    code: err.code().to_string(),
                    reason: err.to_string(),
                });
                processed.push(channel);
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        processed = report.channels.len(),
        skipped = report.skipped.len(),
        keyframes_before = report.keyframes_before(),
        keyframes_after = report.keyframes_after(),
        "pipeline finished"
    );
    Ok(ProcessOutput {
        channels: processed,
        report,
    })
}

fn run_channel(channel: &Channel, config: &PipelineConfig) -> MotionResult<Channel> {
    Ok(match channel {
        Channel::Bone(track) => Channel::Bone(Track::new(
            track.name,
            process_bones(&track.keyframes, config)?,
        )),
        Channel::Morph(track) => Channel::Morph(Track::new(
            track.name,
            process_morphs(&track.keyframes, config)?,
        )),
    })
}

fn process_bones(
    keyframes: &[BoneKeyframe],
    config: &PipelineConfig,
) -> MotionResult<Vec<BoneKeyframe>> {
    if !config.needs_dense() {
        return Ok(keyframes.to_vec());
    }
    let use_bezier = config.use_bezier();
    let mut dense = densify(keyframes, use_bezier);
    debug!(sparse = keyframes.len(), dense = dense.len(), "filled gaps");

    if let Some(cutoff) = config.cutoff_hz {
        for axis in Axis::POSITION {
            let mut series: Vec<f64> = dense
                .iter()
                .filter_map(|k| axis.component(&k.position))
                .collect();
            lowpass_filter(&mut series, cutoff, config.source_fps);
            for (k, value) in dense.iter_mut().zip(series) {
                axis.set_component(&mut k.position, value);
            }
        }
        debug!(cutoff, "smoothed positions");
    }

    if config.resamples() {
        dense = change_fps(&dense, config.source_fps, config.target_fps(), use_bezier)?;
    }

    let Some(thresholds) = &config.reduction else {
        return Ok(dense);
    };
    let Some(last) = dense.len().checked_sub(1) else {
        return Ok(dense);
    };
    let kept = reduce_indices(&dense, 0, last, thresholds);
    let mut reduced: Vec<BoneKeyframe> = kept.iter().map(|&i| dense[i]).collect();
    debug!(dense = dense.len(), kept = reduced.len(), "reduced bone keyframes");

    for (slot, pair) in kept.windows(2).enumerate() {
        let tail = &mut reduced[slot + 1];
        if config.fit_curves {
            let (head_frame, tail_frame) = (dense[pair[0]].frame, dense[pair[1]].frame);
            optimize_bezier_parameter_with(tail, &dense, head_frame, tail_frame, &config.search)?;
        } else {
            // Reduction measured error against straight segments.
            for axis in Axis::ALL {
                tail.interpolation.set_curve(axis, BezierCurve::LINEAR);
            }
        }
    }
    Ok(reduced)
}

fn process_morphs(
    keyframes: &[MorphKeyframe],
    config: &PipelineConfig,
) -> MotionResult<Vec<MorphKeyframe>> {
    if !config.needs_dense() {
        return Ok(keyframes.to_vec());
    }
    let mut dense = densify(keyframes, false);

    if let Some(cutoff) = config.cutoff_hz {
        let mut series: Vec<f64> = dense.iter().map(|k| k.weight).collect();
        lowpass_filter(&mut series, cutoff, config.source_fps);
        for (k, value) in dense.iter_mut().zip(series) {
            k.weight = value.clamp(0.0, 1.0);
        }
        debug!(cutoff, "smoothed morph weights");
    }

    if config.resamples() {
        dense = change_fps(&dense, config.source_fps, config.target_fps(), false)?;
    }

    match (&config.reduction, dense.len().checked_sub(1)) {
        (Some(thresholds), Some(last)) => {
            let kept = reduce_indices(&dense, 0, last, thresholds);
            debug!(dense = dense.len(), kept = kept.len(), "reduced morph keyframes");
            Ok(kept.into_iter().map(|i| dense[i]).collect())
        }
        _ => Ok(dense),
    }
}
