//! Synthesizes a single keyframe between two bracketing keyframes.

use crate::bezier::BezierCurve;
use crate::error::{MotionError, MotionResult};
use crate::keyframe::{BoneKeyframe, Keyframe, MorphKeyframe};

/// Linear time fraction of `target` inside the open segment `(head, tail)`.
///
/// Fails with [`MotionError::FrameOutsideSegment`] unless
/// `head < target < tail`.
pub fn segment_fraction(head: u32, tail: u32, target: u32) -> MotionResult<f64> {
    if target <= head || target >= tail {
        return Err(MotionError::FrameOutsideSegment {
            frame: target,
            head,
            tail,
        });
    }
    Ok((target - head) as f64 / (tail - head) as f64)
}

/// Bone keyframe at `target_frame` between `head` and `tail`.
///
/// With `use_bezier`, each of x, y, z and rotation eases the linear fraction
/// through the tail keyframe's curve for that axis. The result carries the
/// default interpolation block.
pub fn interpolate_frame(
    head: &BoneKeyframe,
    tail: &BoneKeyframe,
    target_frame: u32,
    use_bezier: bool,
) -> MotionResult<BoneKeyframe> {
    let t = segment_fraction(head.frame, tail.frame, target_frame)?;
    Ok(BoneKeyframe::blend(head, tail, t, use_bezier, target_frame))
}

/// Morph keyframe at `target_frame` between `head` and `tail`, optionally
/// eased through `ease`.
pub fn interpolate_morph(
    head: &MorphKeyframe,
    tail: &MorphKeyframe,
    target_frame: u32,
    ease: Option<BezierCurve>,
) -> MotionResult<MorphKeyframe> {
    let t = segment_fraction(head.frame, tail.frame, target_frame)?;
    Ok(MorphKeyframe::blend_eased(head, tail, t, ease, target_frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::{Axis, BoneInterpolation};
    use crate::math::{Quat, Vec3};
    use std::f64::consts::FRAC_PI_2;

    fn segment() -> (BoneKeyframe, BoneKeyframe) {
        let head = BoneKeyframe::new(10, Vec3::new(0.0, 0.0, 0.0), Quat::IDENTITY);
        let tail = BoneKeyframe::new(
            20,
            Vec3::new(10.0, -10.0, 5.0),
            Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), FRAC_PI_2),
        );
        (head, tail)
    }

    #[test]
    fn test_linear_midpoint() {
        let (head, tail) = segment();
        let mid = interpolate_frame(&head, &tail, 15, false).unwrap();
        assert_eq!(mid.frame, 15);
        assert_eq!(mid.position, Vec3::new(5.0, -5.0, 2.5));
        let expected = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), FRAC_PI_2 / 2.0);
        assert!(mid.rotation.angle_between(expected) < 1e-6);
        assert_eq!(mid.interpolation, BoneInterpolation::default());
    }

    #[test]
    fn test_default_curves_match_linear() {
        let (head, tail) = segment();
        for frame in 11..20 {
            let eased = interpolate_frame(&head, &tail, frame, true).unwrap();
            let linear = interpolate_frame(&head, &tail, frame, false).unwrap();
            assert_eq!(eased, linear);
        }
    }

    #[test]
    fn test_bezier_uses_tail_curve_per_axis() {
        let (head, tail) = segment();
        let tail = tail.with_curve(Axis::Y, BezierCurve::new(127, 0, 127, 0));
        let mid = interpolate_frame(&head, &tail, 15, true).unwrap();
        assert_eq!(mid.position.x, 5.0);
        // Strong ease-in keeps y near the head value.
        assert!(mid.position.y > -5.0);
        assert_eq!(mid.position.z, 2.5);
    }

    #[test]
    fn test_target_outside_segment_is_error() {
        let (head, tail) = segment();
        for frame in [0, 10, 20, 25] {
            let err = interpolate_frame(&head, &tail, frame, false).unwrap_err();
            assert_eq!(
                err,
                MotionError::FrameOutsideSegment {
                    frame,
                    head: 10,
                    tail: 20
                }
            );
        }
    }

    #[test]
    fn test_morph_with_and_without_ease() {
        let head = MorphKeyframe::new(0, 0.0);
        let tail = MorphKeyframe::new(10, 1.0);
        let linear = interpolate_morph(&head, &tail, 3, None).unwrap();
        assert!((linear.weight - 0.3).abs() < 1e-12);

        let eased =
            interpolate_morph(&head, &tail, 3, Some(BezierCurve::new(64, 0, 127, 64))).unwrap();
        assert!(eased.weight < linear.weight);
        assert!(interpolate_morph(&head, &tail, 10, None).is_err());
    }
}
