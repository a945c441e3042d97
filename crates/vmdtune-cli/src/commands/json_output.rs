//! Machine-readable output for `--json`.

use serde::Serialize;

use vmdtune_motion::{ChannelKind, MotionError, PipelineConfig, ProcessReport};
use vmdtune_vmd::VmdError;

/// Code used for failures that carry no library error code.
pub const GENERIC_ERROR: &str = "CLI_001";

/// One error entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonError {
    pub code: String,
    pub message: String,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Builds an entry from an error chain, using the code of the first
    /// library error found in it.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let code = err
            .chain()
            .find_map(|cause| {
                cause
                    .downcast_ref::<MotionError>()
                    .map(MotionError::code)
                    .or_else(|| cause.downcast_ref::<VmdError>().map(VmdError::code))
            })
            .unwrap_or(GENERIC_ERROR);
        Self::new(code, format!("{:#}", err))
    }
}

/// Result of `vmdtune process --json`.
#[derive(Debug, Serialize)]
pub struct ProcessJson {
    pub success: bool,
    pub input: String,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PipelineConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ProcessReport>,
    pub errors: Vec<JsonError>,
}

/// One channel listed by `vmdtune inspect --json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub name: String,
    pub kind: ChannelKind,
    pub keyframes: usize,
    pub first_frame: Option<u32>,
    pub last_frame: Option<u32>,
}

/// Result of `vmdtune inspect --json`.
#[derive(Debug, Serialize)]
pub struct InspectJson {
    pub success: bool,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    pub channels: Vec<ChannelSummary>,
    pub errors: Vec<JsonError>,
}
