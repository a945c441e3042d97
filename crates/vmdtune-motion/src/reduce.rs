//! Error-bounded keyframe decimation.

use serde::{Deserialize, Serialize};

use crate::error::MotionResult;
use crate::keyframe::{BoneKeyframe, Keyframe, MorphKeyframe};
use crate::validation::validate_non_negative;

/// Largest deviation a dropped keyframe may have from the reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ReductionThresholds {
    /// Euclidean position distance.
    pub position: f64,
    /// Rotation angle in degrees.
    pub rotation_deg: f64,
    /// Absolute morph weight difference.
    pub morph: f64,
}

impl Default for ReductionThresholds {
    fn default() -> Self {
        Self {
            position: 0.5,
            rotation_deg: 3.0,
            morph: 0.1,
        }
    }
}

impl ReductionThresholds {
    pub fn validate(&self) -> MotionResult<()> {
        validate_non_negative("reduction.position", self.position)?;
        validate_non_negative("reduction.rotation_deg", self.rotation_deg)?;
        validate_non_negative("reduction.morph", self.morph)?;
        Ok(())
    }
}

/// Keyframes whose deviation from a reconstruction can be measured against
/// [`ReductionThresholds`].
pub trait Reducible: Keyframe {
    /// Deviation from `baseline` divided by the matching threshold. Values
    /// above 1 exceed the threshold. For bones this is the larger of the
    /// position and rotation ratios.
    fn excess(&self, baseline: &Self, thresholds: &ReductionThresholds) -> f64;
}

impl Reducible for BoneKeyframe {
    fn excess(&self, baseline: &Self, thresholds: &ReductionThresholds) -> f64 {
        let position = self.position.distance(baseline.position);
        let rotation = self.rotation.angle_between(baseline.rotation).to_degrees();
        ratio(position, thresholds.position).max(ratio(rotation, thresholds.rotation_deg))
    }
}

impl Reducible for MorphKeyframe {
    fn excess(&self, baseline: &Self, thresholds: &ReductionThresholds) -> f64 {
        ratio((self.weight - baseline.weight).abs(), thresholds.morph)
    }
}

/// `deviation / threshold`; a zero threshold tolerates only zero deviation.
fn ratio(deviation: f64, threshold: f64) -> f64 {
    if threshold > 0.0 {
        deviation / threshold
    } else if deviation > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Indices of `dense[lo..=hi]` that survive decimation, ascending.
///
/// Both endpoints are always kept. Each range is checked against the
/// straight (linear or slerp) reconstruction between its anchors; the worst
/// sample is kept and both halves are examined in turn when it exceeds the
/// thresholds, otherwise every inner sample is dropped. `hi` is clamped to the
/// last index.
pub fn reduce_indices<K: Reducible>(
    dense: &[K],
    lo: usize,
    hi: usize,
    thresholds: &ReductionThresholds,
) -> Vec<usize> {
    if dense.is_empty() || lo >= dense.len() {
        return Vec::new();
    }
    let hi = hi.min(dense.len() - 1);
    if hi <= lo {
        return vec![lo];
    }

    let mut keep = vec![false; dense.len()];
    keep[lo] = true;
    keep[hi] = true;

    let mut pending = vec![(lo, hi)];
    while let Some((a, b)) = pending.pop() {
        if b <= a + 1 {
            continue;
        }
        let (head, tail) = (&dense[a], &dense[b]);
        let span = tail.frame().saturating_sub(head.frame()).max(1) as f64;

        let mut worst: Option<(usize, f64)> = None;
        for (i, sample) in dense.iter().enumerate().take(b).skip(a + 1) {
            let t = sample.frame().saturating_sub(head.frame()) as f64 / span;
            let baseline = K::blend(head, tail, t, false, sample.frame());
            let excess = sample.excess(&baseline, thresholds);
            if worst.map_or(true, |(_, w)| excess > w) {
                worst = Some((i, excess));
            }
        }

        if let Some((i, excess)) = worst {
            if excess > 1.0 {
                keep[i] = true;
                pending.push((a, i));
                pending.push((i, b));
            }
        }
    }

    (lo..=hi).filter(|&i| keep[i]).collect()
}

/// Keyframes of `dense[lo..=hi]` that survive decimation.
///
/// See [`reduce_indices`].
pub fn reduce<K: Reducible>(
    dense: &[K],
    lo: usize,
    hi: usize,
    thresholds: &ReductionThresholds,
) -> Vec<K> {
    reduce_indices(dense, lo, hi, thresholds)
        .into_iter()
        .map(|i| dense[i].clone())
        .collect()
}
