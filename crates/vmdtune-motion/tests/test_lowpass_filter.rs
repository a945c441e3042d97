//! Low-pass filter behaviour on realistic dense series.

use vmdtune_motion::lowpass_filter;

fn jittery(n: usize) -> Vec<f64> {
    // Slow motion plus a deterministic high-frequency wobble.
    (0..n)
        .map(|i| {
            let t = i as f64 / 30.0;
            (t * 1.3).sin() * 4.0 + 0.3 * ((i * 7919) % 13) as f64 / 13.0
        })
        .collect()
}

fn energy_of_difference(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[test]
fn test_second_pass_changes_less_than_first() {
    let original = jittery(257);
    let mut once = original.clone();
    lowpass_filter(&mut once, 5.0, 30.0);
    let mut twice = once.clone();
    lowpass_filter(&mut twice, 5.0, 30.0);

    let first = energy_of_difference(&original, &once);
    let second = energy_of_difference(&once, &twice);
    assert!(first > 0.0);
    assert!(second < first);
}

#[test]
fn test_mean_is_preserved() {
    let original = jittery(100);
    let mut filtered = original.clone();
    lowpass_filter(&mut filtered, 3.0, 30.0);
    let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
    assert!((mean(&original) - mean(&filtered)).abs() < 1e-9);
}

#[test]
fn test_length_unchanged_for_odd_and_single() {
    let mut odd = jittery(31);
    lowpass_filter(&mut odd, 5.0, 30.0);
    assert_eq!(odd.len(), 31);

    let mut single = vec![1.25];
    lowpass_filter(&mut single, 5.0, 30.0);
    assert!((single[0] - 1.25).abs() < 1e-12);
}

#[test]
fn test_sampling_rate_scales_cutoff() {
    // The same series filtered at a higher sampling rate keeps fewer bins.
    let original = jittery(120);
    let mut at_30 = original.clone();
    lowpass_filter(&mut at_30, 5.0, 30.0);
    let mut at_60 = original.clone();
    lowpass_filter(&mut at_60, 5.0, 60.0);
    assert!(energy_of_difference(&original, &at_60) > energy_of_difference(&original, &at_30));
}
