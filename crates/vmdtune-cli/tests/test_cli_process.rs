//! Runs the process and inspect commands against VMD files on disk.

use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::tempdir;
use vmdtune_cli::channels::bone_to_record;
use vmdtune_cli::commands::{inspect, process};
use vmdtune_cli::config::{load_config, ConfigOverrides};
use vmdtune_motion::{BoneKeyframe, ChannelName, Quat, Vec3};
use vmdtune_vmd::{name_field, Motion, MorphRecord};

fn morph(name: &str, frame: u32, weight: f32) -> MorphRecord {
    MorphRecord {
        name: name_field(name),
        frame,
        weight,
    }
}

fn sample_motion() -> Motion {
    let arm = ChannelName::new("arm");
    let mut motion = Motion::new(b"sample model");
    motion.bones = vec![
        bone_to_record(&arm, &BoneKeyframe::new(0, Vec3::ZERO, Quat::IDENTITY)),
        bone_to_record(&arm, &BoneKeyframe::new(10, Vec3::new(5.0, 0.0, 0.0), Quat::IDENTITY)),
        bone_to_record(&arm, &BoneKeyframe::new(20, Vec3::new(5.0, 5.0, 0.0), Quat::IDENTITY)),
    ];
    motion.morphs = vec![
        morph("blink", 0, 0.0),
        morph("blink", 5, 1.0),
        morph("blink", 10, 0.0),
        morph("dup", 3, 0.2),
        morph("dup", 3, 0.8),
    ];
    motion.trailer = vec![1, 2, 3, 4];
    motion
}

fn write_motion(path: &Path, motion: &Motion) {
    std::fs::write(path, motion.to_bytes().unwrap()).unwrap();
}

fn read_motion(path: &Path) -> Motion {
    Motion::from_bytes(&std::fs::read(path).unwrap()).unwrap()
}

fn no_filter() -> ConfigOverrides {
    ConfigOverrides {
        no_filter: true,
        ..ConfigOverrides::default()
    }
}

#[test]
fn test_process_keeps_endpoints_and_trailer() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.vmd");
    let output = dir.path().join("out.vmd");
    let original = sample_motion();
    write_motion(&input, &original);

    let config = load_config(None, &no_filter()).unwrap();
    let report = process::process_file(&input, &output, &config).unwrap();
    let result = read_motion(&output);

    assert_eq!(result.model_name, original.model_name);
    assert_eq!(result.trailer, original.trailer);

    let first = result.bones.first().unwrap();
    let last = result.bones.last().unwrap();
    assert_eq!((first.frame, first.position), (0, [0.0, 0.0, 0.0]));
    assert_eq!((last.frame, last.position), (20, [5.0, 5.0, 0.0]));

    let blink: Vec<u32> = result
        .morphs
        .iter()
        .filter(|m| m.name == name_field("blink"))
        .map(|m| m.frame)
        .collect();
    assert_eq!(blink.first(), Some(&0));
    assert_eq!(blink.last(), Some(&10));

    // Duplicate frames make the channel malformed; it is written back as is.
    let dup: Vec<f32> = result
        .morphs
        .iter()
        .filter(|m| m.name == name_field("dup"))
        .map(|m| m.weight)
        .collect();
    assert_eq!(dup, vec![0.2, 0.8]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "dup");
    assert_eq!(report.channels.len(), 2);
}

#[test]
fn test_process_resamples_to_target_rate() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.vmd");
    let output = dir.path().join("out.vmd");
    write_motion(&input, &sample_motion());

    let overrides = ConfigOverrides {
        no_filter: true,
        no_reduce: true,
        fps_out: Some(60.0),
        ..ConfigOverrides::default()
    };
    let config = load_config(None, &overrides).unwrap();
    process::process_file(&input, &output, &config).unwrap();

    let result = read_motion(&output);
    let frames: Vec<u32> = result.bones.iter().map(|b| b.frame).collect();
    assert_eq!(frames, (0..=40).collect::<Vec<_>>());
}

#[test]
fn test_invalid_config_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.vmd");
    let output = dir.path().join("out.vmd");
    let config_path = dir.path().join("tune.json");
    write_motion(&input, &sample_motion());
    std::fs::write(&config_path, r#"{"source_fps": 0}"#).unwrap();

    let result = process::run(
        &input,
        &output,
        Some(config_path.as_path()),
        &ConfigOverrides::default(),
        false,
    );
    assert!(result.is_err());
    assert!(!output.exists());

    // JSON mode reports the failure instead of returning it.
    let result = process::run(
        &input,
        &output,
        Some(config_path.as_path()),
        &ConfigOverrides::default(),
        true,
    );
    assert!(result.is_ok());
    assert!(!output.exists());
}

#[test]
fn test_truncated_input_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.vmd");
    let output = dir.path().join("out.vmd");
    let bytes = sample_motion().to_bytes().unwrap();
    std::fs::write(&input, &bytes[..80]).unwrap();

    let err = process::run(&input, &output, None, &no_filter(), false).unwrap_err();
    assert!(format!("{:#}", err).contains("in.vmd"));
    assert!(!output.exists());
}

#[test]
fn test_inspect_summarizes_channels() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.vmd");
    write_motion(&input, &sample_motion());

    assert!(inspect::run(&input, false).is_ok());
    assert!(inspect::run(&input, true).is_ok());

    let channels = vmdtune_cli::channels::group_channels(&read_motion(&input));
    let summaries: Vec<_> = channels.iter().map(inspect::summarize).collect();
    let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["arm", "blink", "dup"]);
    assert_eq!(summaries[0].keyframes, 3);
    assert_eq!(summaries[0].first_frame, Some(0));
    assert_eq!(summaries[0].last_frame, Some(20));
}
