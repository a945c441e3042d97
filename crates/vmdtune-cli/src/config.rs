//! Pipeline configuration loading and command-line overrides.

use anyhow::{Context, Result};
use std::path::Path;

use vmdtune_motion::{InterpolationMode, PipelineConfig, ReductionThresholds};

/// Settings given on the command line, applied on top of the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub cutoff_hz: Option<f64>,
    pub no_filter: bool,
    pub th_pos: Option<f64>,
    pub th_rot: Option<f64>,
    pub th_morph: Option<f64>,
    pub no_reduce: bool,
    pub fps_in: Option<f64>,
    pub fps_out: Option<f64>,
    pub linear: bool,
    pub no_fit: bool,
}

impl ConfigOverrides {
    /// Applies every override that was given.
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(cutoff) = self.cutoff_hz {
            config.cutoff_hz = Some(cutoff);
        }
        if self.no_filter {
            config.cutoff_hz = None;
        }

        if self.th_pos.is_some() || self.th_rot.is_some() || self.th_morph.is_some() {
            let reduction = config
                .reduction
                .get_or_insert_with(ReductionThresholds::default);
            if let Some(th) = self.th_pos {
                reduction.position = th;
            }
            if let Some(th) = self.th_rot {
                reduction.rotation_deg = th;
            }
            if let Some(th) = self.th_morph {
                reduction.morph = th;
            }
        }
        if self.no_reduce {
            config.reduction = None;
        }

        if let Some(fps) = self.fps_in {
            config.source_fps = fps;
        }
        if let Some(fps) = self.fps_out {
            config.target_fps = Some(fps);
        }
        if self.linear {
            config.interpolation = InterpolationMode::Linear;
        }
        if self.no_fit {
            config.fit_curves = false;
        }
    }
}

/// Parses a JSON pipeline config.
pub fn parse_config(json: &str) -> Result<PipelineConfig> {
    serde_json::from_str(json).context("Invalid pipeline config")
}

/// Loads the config file (defaults when `path` is `None`), applies
/// `overrides` and validates the result.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            parse_config(&text)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    tracing::debug!(?config, "loaded pipeline config");
    Ok(config)
}
