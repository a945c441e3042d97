//! Parameter validation helpers shared by the pipeline configuration.

use crate::error::{MotionError, MotionResult};

/// Validate that a value is positive (> 0) and finite.
///
/// # Example
/// ```
/// use vmdtune_motion::validation::validate_positive;
///
/// assert!(validate_positive("source_fps", 30.0).is_ok());
/// assert!(validate_positive("source_fps", 0.0).is_err());
/// assert!(validate_positive("source_fps", f64::NAN).is_err());
/// ```
pub fn validate_positive(name: &str, value: f64) -> MotionResult<()> {
    if !value.is_finite() {
        return Err(MotionError::invalid_config(
            name,
            format!("must be finite, got {}", value),
        ));
    }
    if value <= 0.0 {
        return Err(MotionError::invalid_config(
            name,
            format!("must be positive, got {}", value),
        ));
    }
    Ok(())
}

/// Validate that a value is non-negative (>= 0) and finite.
///
/// # Example
/// ```
/// use vmdtune_motion::validation::validate_non_negative;
///
/// assert!(validate_non_negative("position", 0.0).is_ok());
/// assert!(validate_non_negative("position", -0.1).is_err());
/// ```
pub fn validate_non_negative(name: &str, value: f64) -> MotionResult<()> {
    if !value.is_finite() {
        return Err(MotionError::invalid_config(
            name,
            format!("must be finite, got {}", value),
        ));
    }
    if value < 0.0 {
        return Err(MotionError::invalid_config(
            name,
            format!("must be non-negative, got {}", value),
        ));
    }
    Ok(())
}

/// Validate that an integer lies in `[min, max]`.
pub fn validate_int_range(name: &str, value: i64, min: i64, max: i64) -> MotionResult<()> {
    if value < min || value > max {
        return Err(MotionError::invalid_config(
            name,
            format!("must be in [{}, {}], got {}", min, max, value),
        ));
    }
    Ok(())
}
