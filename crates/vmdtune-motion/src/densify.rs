//! Gap filling: sparse keyframes to one sample per integer frame.

use crate::keyframe::Keyframe;

/// Expands `keyframes` to one keyframe per frame over `[first, last]`.
///
/// Input keyframes are emitted unchanged. Every missing frame between two
/// neighbours is synthesized from them, with Bezier easing when `use_bezier`
/// is set. Input must be ascending by frame.
pub fn densify<K: Keyframe>(keyframes: &[K], use_bezier: bool) -> Vec<K> {
    let Some(first) = keyframes.first() else {
        return Vec::new();
    };
    let span = keyframes
        .last()
        .map_or(0, |last| last.frame().saturating_sub(first.frame()));

    let mut dense = Vec::with_capacity(span as usize + 1);
    dense.push(first.clone());
    for pair in keyframes.windows(2) {
        let (head, tail) = (&pair[0], &pair[1]);
        let gap = tail.frame() - head.frame();
        for frame in head.frame() + 1..tail.frame() {
            let t = (frame - head.frame()) as f64 / gap as f64;
            dense.push(K::blend(head, tail, t, use_bezier, frame));
        }
        dense.push(tail.clone());
    }
    dense
}
