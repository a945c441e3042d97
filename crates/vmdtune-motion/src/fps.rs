//! Frame-rate conversion of a channel timeline.

use crate::error::MotionResult;
use crate::keyframe::Keyframe;
use crate::validation::validate_positive;

/// Distance from an integer within which a source time counts as that frame.
const FRAME_EPSILON: f64 = 1e-9;

/// Retimes `keyframes` sampled at `fps_in` onto a timeline at `fps_out`.
///
/// Output frame `k` maps to source time `s = k * fps_in / fps_out`. A source
/// keyframe sitting exactly at `s` is copied with all of its data and
/// re-stamped with `k`; otherwise the keyframe is synthesized from the
/// bracketing pair.
///
/// The output starts at `floor(first * fps_out / fps_in)`, so the first input
/// keyframe is always emitted verbatim, on the output frame at or before its
/// own time. It ends at the last `k` whose source time lies within the input
/// span.
///
/// A channel spanning `[0, N - 1]` yields `floor((N - 1) * fps_out / fps_in) + 1`
/// keyframes.
pub fn change_fps<K: Keyframe>(
    keyframes: &[K],
    fps_in: f64,
    fps_out: f64,
    use_bezier: bool,
) -> MotionResult<Vec<K>> {
    validate_positive("fps_in", fps_in)?;
    validate_positive("fps_out", fps_out)?;

    let (Some(first), Some(last)) = (keyframes.first(), keyframes.last()) else {
        return Ok(Vec::new());
    };

    let ratio = fps_out / fps_in;
    let k_start = (first.frame() as f64 * ratio + FRAME_EPSILON).floor().max(0.0) as u32;
    let k_end = (last.frame() as f64 * ratio + FRAME_EPSILON).floor() as u32;
    if k_end < k_start {
        return Ok(Vec::new());
    }

    let mut out = Vec::with_capacity((k_end - k_start) as usize + 1);
    for k in k_start..=k_end {
        let s = k as f64 * fps_in / fps_out;
        out.push(sample_at(keyframes, s, k, use_bezier));
    }

    tracing::debug!(
        input = keyframes.len(),
        output = out.len(),
        fps_in,
        fps_out,
        "changed frame rate"
    );
    Ok(out)
}

/// Keyframe at source time `s`, stamped with `frame`.
fn sample_at<K: Keyframe>(keyframes: &[K], s: f64, frame: u32, use_bezier: bool) -> K {
    let nearest = s.round();
    if (s - nearest).abs() < FRAME_EPSILON && nearest >= 0.0 {
        let target = nearest as u32;
        if let Ok(idx) = keyframes.binary_search_by_key(&target, |k| k.frame()) {
            let mut copy = keyframes[idx].clone();
            copy.set_frame(frame);
            return copy;
        }
    }

    // First keyframe strictly after s.
    let idx = keyframes.partition_point(|k| (k.frame() as f64) <= s);
    let endpoint = if idx == 0 {
        Some(0)
    } else if idx >= keyframes.len() {
        Some(keyframes.len() - 1)
    } else {
        None
    };
    if let Some(i) = endpoint {
        let mut copy = keyframes[i].clone();
        copy.set_frame(frame);
        return copy;
    }

    let (head, tail) = (&keyframes[idx - 1], &keyframes[idx]);
    let t = (s - head.frame() as f64) / (tail.frame() - head.frame()) as f64;
    K::blend(head, tail, t, use_bezier, frame)
}
