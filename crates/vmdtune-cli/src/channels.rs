//! Conversion between VMD records and engine channels.
//!
//! Records are grouped by the bytes of their name up to the first NUL and
//! stably sorted by frame. Channels come out ordered by those bytes, bones
//! before morphs. The engine works in `f64`; records store `f32`.

use std::collections::BTreeMap;

use vmdtune_motion::{
    normalize_rotation, BoneInterpolation, BoneKeyframe, Channel, ChannelName, MorphKeyframe, Quat,
    Track, Vec3,
};
use vmdtune_vmd::{BoneRecord, Motion, MorphRecord};

/// Groups the bone and morph records of `motion` into channels.
pub fn group_channels(motion: &Motion) -> Vec<Channel> {
    let mut bones: BTreeMap<Vec<u8>, Track<BoneKeyframe>> = BTreeMap::new();
    for record in &motion.bones {
        let name = ChannelName::from_field(record.name);
        bones
            .entry(name.key().to_vec())
            .or_insert_with(|| Track::new(name, Vec::new()))
            .keyframes
            .push(bone_from_record(record));
    }

    let mut morphs: BTreeMap<Vec<u8>, Track<MorphKeyframe>> = BTreeMap::new();
    for record in &motion.morphs {
        let name = ChannelName::from_field(record.name);
        morphs
            .entry(name.key().to_vec())
            .or_insert_with(|| Track::new(name, Vec::new()))
            .keyframes
            .push(morph_from_record(record));
    }

    let bones = bones.into_values().map(|mut track| {
        track.keyframes.sort_by_key(|k| k.frame);
        Channel::Bone(track)
    });
    let morphs = morphs.into_values().map(|mut track| {
        track.keyframes.sort_by_key(|k| k.frame);
        Channel::Morph(track)
    });
    bones.chain(morphs).collect()
}

/// Replaces the bone and morph records of `motion` with `channels`.
///
/// Header fields and the trailer are left untouched.
pub fn store_channels(motion: &mut Motion, channels: &[Channel]) {
    motion.bones.clear();
    motion.morphs.clear();
    for channel in channels {
        match channel {
            Channel::Bone(track) => motion
                .bones
                .extend(track.keyframes.iter().map(|k| bone_to_record(&track.name, k))),
            Channel::Morph(track) => motion
                .morphs
                .extend(track.keyframes.iter().map(|k| morph_to_record(&track.name, k))),
        }
    }
}

/// Converts a bone record, normalizing its rotation. A zero or non-finite
/// rotation reads as the identity.
pub fn bone_from_record(record: &BoneRecord) -> BoneKeyframe {
    let [px, py, pz] = record.position.map(f64::from);
    let [qx, qy, qz, qw] = record.rotation.map(f64::from);
    BoneKeyframe {
        frame: record.frame,
        position: Vec3::new(px, py, pz),
        rotation: normalize_rotation(Quat::from_xyzw(qx, qy, qz, qw)),
        interpolation: BoneInterpolation::from_bytes(record.interpolation),
    }
}

pub fn bone_to_record(name: &ChannelName, keyframe: &BoneKeyframe) -> BoneRecord {
    let p = keyframe.position;
    let q = keyframe.rotation;
    BoneRecord {
        name: *name.field(),
        frame: keyframe.frame,
        position: [p.x as f32, p.y as f32, p.z as f32],
        rotation: [q.x as f32, q.y as f32, q.z as f32, q.w as f32],
        interpolation: *keyframe.interpolation.as_bytes(),
    }
}

pub fn morph_from_record(record: &MorphRecord) -> MorphKeyframe {
    MorphKeyframe::new(record.frame, f64::from(record.weight))
}

pub fn morph_to_record(name: &ChannelName, keyframe: &MorphKeyframe) -> MorphRecord {
    MorphRecord {
        name: *name.field(),
        frame: keyframe.frame,
        weight: keyframe.weight as f32,
    }
}
