//! Error types for the motion engine.

use thiserror::Error;

/// Result type for motion operations.
pub type MotionResult<T> = Result<T, MotionError>;

/// Errors that can occur while processing keyframe channels.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotionError {
    /// Invalid pipeline configuration.
    #[error("invalid configuration '{name}': {message}")]
    InvalidConfig {
        /// Configuration field name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Channel violates the keyframe ordering contract.
    #[error("malformed channel '{channel}': {reason}")]
    MalformedChannel {
        /// Display form of the channel name.
        channel: String,
        /// Why the channel was rejected.
        reason: String,
    },

    /// Interpolation target is not strictly inside the keyframe segment.
    #[error("frame {frame} is outside the open segment ({head}, {tail})")]
    FrameOutsideSegment {
        /// Requested frame.
        frame: u32,
        /// Head keyframe frame index.
        head: u32,
        /// Tail keyframe frame index.
        tail: u32,
    },

    /// Dense curve does not cover the requested range.
    #[error("dense curve has no sample at frame {frame}")]
    MissingSample {
        /// Frame index that could not be found.
        frame: u32,
    },
}

impl MotionError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a malformed channel error.
    pub fn malformed(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedChannel {
            channel: channel.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            MotionError::InvalidConfig { .. } => "MOTION_001",
            MotionError::MalformedChannel { .. } => "MOTION_002",
            MotionError::FrameOutsideSegment { .. } => "MOTION_003",
            MotionError::MissingSample { .. } => "MOTION_004",
        }
    }

    /// Whether the error aborts the whole run rather than a single channel.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MotionError::InvalidConfig { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_helper() {
        let err = MotionError::invalid_config("source_fps", "must be positive, got 0");
        assert!(err.to_string().contains("source_fps"));
        assert!(err.to_string().contains("must be positive"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_malformed_is_not_fatal() {
        let err = MotionError::malformed("center", "frame 3 repeats");
        assert_eq!(err.code(), "MOTION_002");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            MotionError::invalid_config("a", "b").code(),
            MotionError::malformed("a", "b").code(),
            MotionError::FrameOutsideSegment {
                frame: 0,
                head: 0,
                tail: 1,
            }
            .code(),
            MotionError::MissingSample { frame: 0 }.code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
