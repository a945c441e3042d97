//! vmdtune Motion Engine
//!
//! Keyframe curve processing for VMD motion-capture channels:
//! - resampling a channel to another frame rate
//! - low-pass smoothing of dense position and morph-weight series
//! - fitting the per-axis Bezier ease bytes of a keyframe to a dense curve
//! - error-bounded decimation of dense channels back to sparse keyframes
//!
//! # Overview
//!
//! A channel is a [`Track`] of bone or morph keyframes, ascending and unique by
//! frame index. [`process_channels`] runs the full pipeline over a batch:
//!
//! 1. gap fill to one keyframe per integer frame ([`densify()`])
//! 2. low-pass filter positions and morph weights ([`lowpass_filter`])
//! 3. change frame rate ([`change_fps`])
//! 4. decimate ([`reduce()`])
//! 5. fit ease curves for the retained bone keyframes
//!    ([`optimize_bezier_parameter`])
//!
//! Each stage is enabled through [`PipelineConfig`]. Channels are independent;
//! a malformed channel is skipped and returned unchanged without affecting
//! the others.
//!
//! # Example
//!
//! ```
//! use vmdtune_motion::{
//!     process_channels, Channel, ChannelName, MorphKeyframe, PipelineConfig, Track,
//! };
//!
//! let channel = Channel::Morph(Track::new(
//!     ChannelName::new("blink"),
//!     vec![MorphKeyframe::new(0, 0.0), MorphKeyframe::new(30, 1.0)],
//! ));
//! let output = process_channels(vec![channel], &PipelineConfig::default()).unwrap();
//! assert_eq!(output.report.channels.len(), 1);
//! ```
//!
//! # Crate Structure
//!
//! - [`math`] - `glam` vector and quaternion types, `lerp` and shorter-arc `slerp`
//! - [`bezier`] - ease-curve evaluation and inversion
//! - [`keyframe`] - bone/morph keyframes and the interpolation block
//! - [`interpolate`] - one keyframe between two bracketing keyframes
//! - [`filter`] - FFT low-pass filter
//! - [`fps`] - frame-rate conversion
//! - [`optimize`] - Bezier control-point fitting
//! - [`reduce`] - keyframe decimation
//! - [`pipeline`] - per-channel control flow and reporting

pub mod bezier;
pub mod channel;
pub mod config;
pub mod densify;
pub mod error;
pub mod filter;
pub mod fps;
pub mod interpolate;
pub mod keyframe;
pub mod math;
pub mod optimize;
pub mod pipeline;
pub mod reduce;
pub mod validation;

// Re-export main types at crate root
pub use bezier::{bezier_ease, BezierCurve};
pub use channel::{Channel, ChannelKind, Track};
pub use config::{InterpolationMode, PipelineConfig};
pub use densify::densify;
pub use error::{MotionError, MotionResult};
pub use filter::lowpass_filter;
pub use fps::change_fps;
pub use interpolate::{interpolate_frame, interpolate_morph};
pub use keyframe::{
    Axis, BoneInterpolation, BoneKeyframe, ChannelName, Keyframe, MorphKeyframe,
};
pub use math::{lerp, normalize_rotation, slerp, Quat, Vec3};
pub use optimize::{optimize_bezier_parameter, optimize_bezier_parameter_with, SearchBudget};
pub use pipeline::{
    process_channel, process_channels, ChannelReport, ProcessOutput, ProcessReport,
    SkippedChannel,
};
pub use reduce::{reduce, reduce_indices, Reducible, ReductionThresholds};
