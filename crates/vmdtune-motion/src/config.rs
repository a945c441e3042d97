//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::MotionResult;
use crate::optimize::SearchBudget;
use crate::reduce::ReductionThresholds;
use crate::validation::validate_positive;

/// How synthesized keyframes between two sparse keyframes are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMode {
    /// Ease each axis through the tail keyframe's curve.
    #[default]
    Bezier,
    /// Plain lerp/slerp, ignoring stored curves.
    Linear,
}

/// Settings for one processing run.
///
/// Every field has a default, so an empty JSON object is a valid config.
/// Setting `cutoff_hz` or `reduction` to `null` disables that stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PipelineConfig {
    /// Frame rate the input channels were recorded at.
    pub source_fps: f64,
    /// Frame rate to resample to; `None` keeps the source rate.
    pub target_fps: Option<f64>,
    /// Low-pass cutoff in Hz; `None` disables smoothing.
    pub cutoff_hz: Option<f64>,
    /// Decimation thresholds; `None` disables reduction.
    pub reduction: Option<ReductionThresholds>,
    pub interpolation: InterpolationMode,
    /// Fit ease curves for retained bone keyframes after reduction.
    pub fit_curves: bool,
    pub search: SearchBudget,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_fps: 30.0,
            target_fps: None,
            cutoff_hz: Some(5.0),
            reduction: Some(ReductionThresholds::default()),
            interpolation: InterpolationMode::default(),
            fit_curves: true,
            search: SearchBudget::default(),
        }
    }
}

impl PipelineConfig {
    /// Output frame rate.
    pub fn target_fps(&self) -> f64 {
        self.target_fps.unwrap_or(self.source_fps)
    }

    pub fn use_bezier(&self) -> bool {
        self.interpolation == InterpolationMode::Bezier
    }

    /// Whether the output rate differs from the source rate.
    pub fn resamples(&self) -> bool {
        self.target_fps() != self.source_fps
    }

    /// Whether any stage needs the gap-filled dense curve.
    pub fn needs_dense(&self) -> bool {
        self.cutoff_hz.is_some() || self.resamples() || self.reduction.is_some()
    }

    /// Checks every field, failing on the first invalid one.
    pub fn validate(&self) -> MotionResult<()> {
        validate_positive("source_fps", self.source_fps)?;
        if let Some(fps) = self.target_fps {
            validate_positive("target_fps", fps)?;
        }
        if let Some(cutoff) = self.cutoff_hz {
            validate_positive("cutoff_hz", cutoff)?;
        }
        if let Some(reduction) = &self.reduction {
            reduction.validate()?;
        }
        self.search.validate()
    }
}
