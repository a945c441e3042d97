//! Fitting ease-curve control points to an observed dense curve.
//!
//! Each of x, y, z and rotation is fitted on its own. The dense samples
//! between the head and tail keyframes are first reduced to an ease problem,
//! pairs `(t, u)` of linear time fraction and observed eased fraction, so a
//! single search serves every axis. Squared error in the original units is the
//! squared ease error times a per-axis constant, so both share a minimizer.
//!
//! The ease value is linear in `y1` and `y2` once `x1` and `x2` are fixed, so
//! the search runs over `(x1, x2)` only and solves the `y` pair by least
//! squares for every candidate:
//!
//! 1. a coarse `(x1, x2)` grid at [`SearchBudget::coarse_step`];
//! 2. the best [`SearchBudget::seeds`] grid points are refined by a pattern
//!    search with halving steps;
//! 3. equal costs are broken towards smaller control values.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bezier::{bernstein_weights, solve_parameter, BezierCurve, CONTROL_MAX};
use crate::error::{MotionError, MotionResult};
use crate::keyframe::{Axis, BoneKeyframe};
use crate::math::{normalize_rotation, Quat};
use crate::validation::validate_int_range;

/// An axis moving less than this between head and tail is left linear.
const FLAT_EPSILON: f64 = 1e-9;

/// Per-sample margin by which a fit must beat the linear curve to replace it.
const LINEAR_PREFERENCE: f64 = 1e-10;

/// Determinant below which the least-squares system for `y1`, `y2` is
/// treated as singular.
const SINGULAR_EPSILON: f64 = 1e-18;

/// Iteration bounds for the control-point search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SearchBudget {
    /// Spacing of the coarse `(x1, x2)` grid, in control units.
    pub coarse_step: u8,
    /// Number of coarse candidates refined by the pattern search.
    pub seeds: usize,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            coarse_step: 8,
            seeds: 4,
        }
    }
}

impl SearchBudget {
    pub fn validate(&self) -> MotionResult<()> {
        validate_int_range(
            "search.coarse_step",
            self.coarse_step as i64,
            1,
            CONTROL_MAX as i64,
        )?;
        if self.seeds == 0 {
            return Err(MotionError::invalid_config(
                "search.seeds",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Fits ease curves for every axis of `target_tail` with the default budget.
///
/// See [`optimize_bezier_parameter_with`].
pub fn optimize_bezier_parameter(
    target_tail: &mut BoneKeyframe,
    dense: &[BoneKeyframe],
    head_frame: u32,
    tail_frame: u32,
) -> MotionResult<()> {
    optimize_bezier_parameter_with(
        target_tail,
        dense,
        head_frame,
        tail_frame,
        &SearchBudget::default(),
    )
}

/// Fits the ease curves of `target_tail` so that interpolating from the dense
/// sample at `head_frame` to `target_tail` reproduces `dense` on every frame
/// strictly between `head_frame` and `tail_frame`.
///
/// `dense` must hold one keyframe per frame over a range covering
/// `[head_frame, tail_frame]`. Only the 16 control bytes of the interpolation
/// block are written. Axes that do not move, or that the linear curve already
/// fits as well as any candidate, get [`BezierCurve::LINEAR`].
pub fn optimize_bezier_parameter_with(
    target_tail: &mut BoneKeyframe,
    dense: &[BoneKeyframe],
    head_frame: u32,
    tail_frame: u32,
    budget: &SearchBudget,
) -> MotionResult<()> {
    let head = *dense_sample(dense, head_frame)?;
    let interior = (head_frame.saturating_add(1)..tail_frame)
        .map(|frame| dense_sample(dense, frame).copied())
        .collect::<MotionResult<Vec<_>>>()?;
    let span = tail_frame.saturating_sub(head_frame).max(1) as f64;
    let fractions: Vec<f64> = interior
        .iter()
        .map(|k| (k.frame - head_frame) as f64 / span)
        .collect();

    for axis in Axis::ALL {
        let observed = match axis {
            Axis::Rotation => rotation_fractions(head.rotation, target_tail.rotation, &interior),
            _ => position_fractions(axis, &head, target_tail, &interior),
        };
        let curve = match observed {
            Some(us) if !us.is_empty() => {
                let samples: Vec<(f64, f64)> =
                    fractions.iter().copied().zip(us).collect();
                fit_ease_curve(&samples, budget)
            }
            _ => BezierCurve::LINEAR,
        };
        tracing::trace!(
            axis = axis.as_str(),
            head_frame,
            tail_frame,
            curve = ?curve.to_array(),
            "fitted ease curve"
        );
        target_tail.interpolation.set_curve(axis, curve);
    }
    Ok(())
}

/// Best control points for ease samples `(t, u)`, or the linear curve when no
/// candidate beats it by a clear margin.
pub fn fit_ease_curve(samples: &[(f64, f64)], budget: &SearchBudget) -> BezierCurve {
    if samples.is_empty() {
        return BezierCurve::LINEAR;
    }
    let mut search = EaseSearch::new(samples);
    let best = search.run(budget);
    let linear_cost = search.cost(BezierCurve::LINEAR);
    if best.cost < linear_cost - LINEAR_PREFERENCE * samples.len() as f64 {
        best.curve
    } else {
        BezierCurve::LINEAR
    }
}

fn dense_sample(dense: &[BoneKeyframe], frame: u32) -> MotionResult<&BoneKeyframe> {
    let first = dense
        .first()
        .ok_or(MotionError::MissingSample { frame })?
        .frame;
    frame
        .checked_sub(first)
        .and_then(|offset| dense.get(offset as usize))
        .filter(|k| k.frame == frame)
        .ok_or(MotionError::MissingSample { frame })
}

fn position_fractions(
    axis: Axis,
    head: &BoneKeyframe,
    tail: &BoneKeyframe,
    interior: &[BoneKeyframe],
) -> Option<Vec<f64>> {
    let from = axis.component(&head.position)?;
    let delta = axis.component(&tail.position)? - from;
    if delta.abs() < FLAT_EPSILON {
        return None;
    }
    interior
        .iter()
        .map(|k| axis.component(&k.position).map(|v| (v - from) / delta))
        .collect()
}

/// Arc position of each sample along the great circle from `q0` to `q1`, as a
/// fraction of the full arc.
fn rotation_fractions(q0: Quat, q1: Quat, interior: &[BoneKeyframe]) -> Option<Vec<f64>> {
    let q0 = normalize_rotation(q0);
    let q1 = normalize_rotation(q1);
    let q1 = if q0.dot(q1) < 0.0 { -q1 } else { q1 };

    let d = q0.dot(q1);
    let perp = q1 - q0 * d;
    let perp_len = perp.length();
    let omega = perp_len.atan2(d);
    if omega < FLAT_EPSILON {
        return None;
    }
    let e1 = perp * (1.0 / perp_len);

    Some(
        interior
            .iter()
            .map(|k| {
                let q = normalize_rotation(k.rotation);
                let q = if q.dot(q0) < 0.0 { -q } else { q };
                q.dot(e1).atan2(q.dot(q0)) / omega
            })
            .collect(),
    )
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    cost: f64,
    curve: BezierCurve,
}

impl Candidate {
    fn rank(&self, other: &Candidate) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.curve.to_array().cmp(&other.curve.to_array()))
    }

    fn beats(&self, other: &Candidate) -> bool {
        self.rank(other) == Ordering::Less
    }
}

struct EaseSearch<'a> {
    samples: &'a [(f64, f64)],
    solved: HashMap<(u8, u8), Candidate>,
}

impl<'a> EaseSearch<'a> {
    fn new(samples: &'a [(f64, f64)]) -> Self {
        Self {
            samples,
            solved: HashMap::new(),
        }
    }

    fn cost(&self, curve: BezierCurve) -> f64 {
        self.samples
            .iter()
            .map(|&(t, u)| {
                let e = curve.ease(t) - u;
                e * e
            })
            .sum()
    }

    fn run(&mut self, budget: &SearchBudget) -> Candidate {
        let step = budget.coarse_step.clamp(1, CONTROL_MAX);
        let mut grid: Vec<u8> = (0..=CONTROL_MAX).step_by(step as usize).collect();
        if grid.last() != Some(&CONTROL_MAX) {
            grid.push(CONTROL_MAX);
        }

        let pairs: Vec<(u8, u8)> = grid
            .iter()
            .flat_map(|&x1| grid.iter().map(move |&x2| (x1, x2)))
            .collect();
        let mut coarse: Vec<Candidate> = pairs
            .into_iter()
            .map(|(x1, x2)| self.solve_y(x1, x2))
            .collect();
        coarse.sort_by(Candidate::rank);

        let mut best = coarse[0];
        for &seed in coarse.iter().take(budget.seeds.max(1)) {
            let refined = self.refine(seed, step / 2);
            if refined.beats(&best) {
                best = refined;
            }
        }
        best
    }

    /// Pattern search over `(x1, x2)` from `seed`, halving the step each time
    /// no neighbour improves.
    fn refine(&mut self, seed: Candidate, mut step: u8) -> Candidate {
        let mut best = seed;
        while step >= 1 {
            loop {
                let mut current = best;
                for d1 in [-1i16, 0, 1] {
                    for d2 in [-1i16, 0, 1] {
                        if d1 == 0 && d2 == 0 {
                            continue;
                        }
                        let x1 = offset(best.curve.x1, d1 * step as i16);
                        let x2 = offset(best.curve.x2, d2 * step as i16);
                        let candidate = self.solve_y(x1, x2);
                        if candidate.beats(&current) {
                            current = candidate;
                        }
                    }
                }
                if current.beats(&best) {
                    best = current;
                } else {
                    break;
                }
            }
            step /= 2;
        }
        best
    }

    /// Best integer `(y1, y2)` for fixed `(x1, x2)`.
    ///
    /// The least-squares optimum is solved from the 2x2 normal equations,
    /// clamped to the control range, and the best of its floor/ceil
    /// neighbours is kept.
    fn solve_y(&mut self, x1: u8, x2: u8) -> Candidate {
        if let Some(hit) = self.solved.get(&(x1, x2)) {
            return *hit;
        }

        let scale = CONTROL_MAX as f64;
        let (nx1, nx2) = (x1 as f64 / scale, x2 as f64 / scale);
        let (mut saa, mut sab, mut sbb, mut sar, mut sbr) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for &(t_lin, u) in self.samples {
            let t = solve_parameter(nx1, nx2, t_lin);
            let (a, b, c) = bernstein_weights(t);
            let r = u - c;
            saa += a * a;
            sab += a * b;
            sbb += b * b;
            sar += a * r;
            sbr += b * r;
        }
        let det = saa * sbb - sab * sab;
        let (y1, y2) = if det.abs() < SINGULAR_EPSILON {
            (nx1, nx2)
        } else {
            ((sar * sbb - sbr * sab) / det, (saa * sbr - sab * sar) / det)
        };

        let mut best: Option<Candidate> = None;
        for ya in rounding_neighbours(y1 * scale) {
            for yb in rounding_neighbours(y2 * scale) {
                let curve = BezierCurve::new(x1, ya, x2, yb);
                let candidate = Candidate {
                    cost: self.cost(curve),
                    curve,
                };
                if best.map_or(true, |b| candidate.beats(&b)) {
                    best = Some(candidate);
                }
            }
        }
        let best = best.unwrap_or(Candidate {
            cost: f64::INFINITY,
            curve: BezierCurve::LINEAR,
        });
        self.solved.insert((x1, x2), best);
        best
    }
}

fn offset(value: u8, delta: i16) -> u8 {
    (value as i16 + delta).clamp(0, CONTROL_MAX as i16) as u8
}

/// Floor and ceiling of `value` after clamping to the control range.
fn rounding_neighbours(value: f64) -> [u8; 2] {
    let max = CONTROL_MAX as f64;
    let clamped = if value.is_finite() { value.clamp(0.0, max) } else { 0.0 };
    let lo = clamped.floor() as u8;
    [lo, lo.saturating_add(1).min(CONTROL_MAX)]
}
