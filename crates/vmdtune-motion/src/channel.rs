//! Named keyframe tracks and the bone/morph channel variant.

use serde::Serialize;

use crate::error::{MotionError, MotionResult};
use crate::keyframe::{BoneKeyframe, ChannelName, Keyframe, MorphKeyframe};

/// Keyframes for one named target, ascending and unique by frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Track<K> {
    pub name: ChannelName,
    pub keyframes: Vec<K>,
}

impl<K: Keyframe> Track<K> {
    /// Creates a track. Ordering is checked by [`Track::validate`].
    pub fn new(name: ChannelName, keyframes: Vec<K>) -> Self {
        Self { name, keyframes }
    }

    /// Number of keyframes.
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the track has no keyframes.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// First and last frame index, if any.
    pub fn frame_range(&self) -> Option<(u32, u32)> {
        Some((self.keyframes.first()?.frame(), self.keyframes.last()?.frame()))
    }

    /// Checks that the track is non-empty with strictly increasing frames.
    pub fn validate(&self) -> MotionResult<()> {
        if self.keyframes.is_empty() {
            return Err(MotionError::malformed(
                self.name.to_string(),
                "channel has no keyframes",
            ));
        }
        for pair in self.keyframes.windows(2) {
            let (prev, next) = (pair[0].frame(), pair[1].frame());
            if next <= prev {
                let reason = if next == prev {
                    format!("frame {} appears more than once", next)
                } else {
                    format!("frame {} follows frame {}", next, prev)
                };
                return Err(MotionError::malformed(self.name.to_string(), reason));
            }
        }
        Ok(())
    }
}

/// What kind of target a channel animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Bone,
    Morph,
}

impl ChannelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelKind::Bone => "bone",
            ChannelKind::Morph => "morph",
        }
    }
}

/// A bone or morph channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Channel {
    Bone(Track<BoneKeyframe>),
    Morph(Track<MorphKeyframe>),
}

impl Channel {
    pub fn name(&self) -> &ChannelName {
        match self {
            Channel::Bone(track) => &track.name,
            Channel::Morph(track) => &track.name,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        match self {
            Channel::Bone(_) => ChannelKind::Bone,
            Channel::Morph(_) => ChannelKind::Morph,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Channel::Bone(track) => track.len(),
            Channel::Morph(track) => track.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn frame_range(&self) -> Option<(u32, u32)> {
        match self {
            Channel::Bone(track) => track.frame_range(),
            Channel::Morph(track) => track.frame_range(),
        }
    }

    pub fn validate(&self) -> MotionResult<()> {
        match self {
            Channel::Bone(track) => track.validate(),
            Channel::Morph(track) => track.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Quat, Vec3};

    fn morph_track(frames: &[u32]) -> Track<MorphKeyframe> {
        Track::new(
            ChannelName::new("blink"),
            frames.iter().map(|&f| MorphKeyframe::new(f, 0.5)).collect(),
        )
    }

    #[test]
    fn test_valid_track() {
        let track = morph_track(&[0, 3, 10]);
        assert!(track.validate().is_ok());
        assert_eq!(track.frame_range(), Some((0, 10)));
    }

    #[test]
    fn test_empty_track_is_malformed() {
        let err = morph_track(&[]).validate().unwrap_err();
        assert_eq!(err.code(), "MOTION_002");
        assert!(err.to_string().contains("blink"));
    }

    #[test]
    fn test_duplicate_frame_is_malformed() {
        let err = morph_track(&[0, 5, 5]).validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_descending_frames_are_malformed() {
        assert!(morph_track(&[4, 2]).validate().is_err());
    }

    #[test]
    fn test_channel_accessors() {
        let bone = Channel::Bone(Track::new(
            ChannelName::new("center"),
            vec![BoneKeyframe::new(7, Vec3::ZERO, Quat::IDENTITY)],
        ));
        assert_eq!(bone.kind(), ChannelKind::Bone);
        assert_eq!(bone.name().to_string(), "center");
        assert_eq!(bone.len(), 1);
        assert_eq!(bone.frame_range(), Some((7, 7)));
        assert!(bone.validate().is_ok());
    }
}
