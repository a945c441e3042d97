//! Keyframe types for bone and morph channels.

use std::fmt;

use crate::bezier::BezierCurve;
use crate::math::{lerp, slerp, Quat, Vec3};

/// Width of the raw channel-name field.
pub const NAME_FIELD_LEN: usize = 15;

/// Size of a bone keyframe's interpolation block.
pub const INTERPOLATION_BLOCK_LEN: usize = 64;

// =============================================================================
// Channel names
// =============================================================================

/// Raw, NUL-padded channel name field.
///
/// Names are compared and grouped by the bytes before the first NUL. The
/// full field, including any bytes after the terminator, is kept so it can be
/// written back unchanged. No text decoding is attempted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelName([u8; NAME_FIELD_LEN]);

impl ChannelName {
    /// Wraps a raw name field.
    pub const fn from_field(field: [u8; NAME_FIELD_LEN]) -> Self {
        Self(field)
    }

    /// Builds a name field from text, truncating to the field width.
    pub fn new(name: &str) -> Self {
        let mut field = [0u8; NAME_FIELD_LEN];
        let bytes = name.as_bytes();
        let len = bytes.len().min(NAME_FIELD_LEN);
        field[..len].copy_from_slice(&bytes[..len]);
        Self(field)
    }

    /// The identifying bytes (up to the first NUL).
    pub fn key(&self) -> &[u8] {
        let end = self
            .0
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_FIELD_LEN);
        &self.0[..end]
    }

    /// The full raw field.
    pub fn field(&self) -> &[u8; NAME_FIELD_LEN] {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.key()))
    }
}

impl fmt::Debug for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelName({:?})", String::from_utf8_lossy(self.key()))
    }
}

// =============================================================================
// Interpolation block
// =============================================================================

/// One of the four independently eased components of a bone keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    Rotation,
}

impl Axis {
    /// All axes in block order.
    pub const ALL: [Axis; 4] = [Axis::X, Axis::Y, Axis::Z, Axis::Rotation];

    /// The three position axes.
    pub const POSITION: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Column of this axis inside a block row.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::Rotation => 3,
        }
    }

    /// Position component along this axis. `Rotation` has none.
    pub fn component(self, v: &Vec3) -> Option<f64> {
        match self {
            Axis::X => Some(v.x),
            Axis::Y => Some(v.y),
            Axis::Z => Some(v.z),
            Axis::Rotation => None,
        }
    }

    /// Overwrites the position component along this axis. No-op for `Rotation`.
    pub fn set_component(self, v: &mut Vec3, value: f64) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
            Axis::Rotation => {}
        }
    }

    /// Lowercase name used in logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::Rotation => "rotation",
        }
    }
}

/// The 64-byte interpolation block of a bone keyframe.
///
/// Byte `4 * p + a` holds control coordinate `p` (x1, y1, x2, y2) of axis `a`
/// (x, y, z, rotation). The remaining 48 bytes are opaque and preserved.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoneInterpolation([u8; INTERPOLATION_BLOCK_LEN]);

impl Default for BoneInterpolation {
    fn default() -> Self {
        let mut block = Self([0u8; INTERPOLATION_BLOCK_LEN]);
        for axis in Axis::ALL {
            block.set_curve(axis, BezierCurve::LINEAR);
        }
        block
    }
}

impl BoneInterpolation {
    /// Wraps a raw block.
    pub const fn from_bytes(bytes: [u8; INTERPOLATION_BLOCK_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw block.
    pub fn as_bytes(&self) -> &[u8; INTERPOLATION_BLOCK_LEN] {
        &self.0
    }

    /// The ease curve stored for `axis`.
    pub fn curve(&self, axis: Axis) -> BezierCurve {
        let a = axis.index();
        BezierCurve::new(self.0[a], self.0[4 + a], self.0[8 + a], self.0[12 + a])
    }

    /// Overwrites the four control bytes of `axis`.
    pub fn set_curve(&mut self, axis: Axis, curve: BezierCurve) {
        let a = axis.index();
        let [x1, y1, x2, y2] = curve.to_array();
        self.0[a] = x1;
        self.0[4 + a] = y1;
        self.0[8 + a] = x2;
        self.0[12 + a] = y2;
    }
}

impl fmt::Debug for BoneInterpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoneInterpolation")
            .field("x", &self.curve(Axis::X).to_array())
            .field("y", &self.curve(Axis::Y).to_array())
            .field("z", &self.curve(Axis::Z).to_array())
            .field("rotation", &self.curve(Axis::Rotation).to_array())
            .finish()
    }
}

// =============================================================================
// Keyframes
// =============================================================================

/// Behaviour shared by bone and morph keyframes.
pub trait Keyframe: Clone {
    /// Frame index on the channel timeline.
    fn frame(&self) -> u32;

    /// Moves the keyframe to another frame index.
    fn set_frame(&mut self, frame: u32);

    /// Synthesizes the keyframe at linear fraction `t` of the segment
    /// `head -> tail`, stamped with `frame`.
    fn blend(head: &Self, tail: &Self, t: f64, use_bezier: bool, frame: u32) -> Self;
}

/// Bone transform keyframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneKeyframe {
    pub frame: u32,
    pub position: Vec3,
    pub rotation: Quat,
    pub interpolation: BoneInterpolation,
}

impl BoneKeyframe {
    /// Creates a keyframe with the linear interpolation block.
    pub fn new(frame: u32, position: Vec3, rotation: Quat) -> Self {
        Self {
            frame,
            position,
            rotation,
            interpolation: BoneInterpolation::default(),
        }
    }

    /// Builder-style setter for one axis curve.
    pub fn with_curve(mut self, axis: Axis, curve: BezierCurve) -> Self {
        self.interpolation.set_curve(axis, curve);
        self
    }

    /// Eased fractions for x, y, z and rotation when this keyframe is the
    /// tail of a segment.
    pub fn eased_fractions(&self, t: f64, use_bezier: bool) -> [f64; 4] {
        if use_bezier {
            Axis::ALL.map(|axis| self.interpolation.curve(axis).ease(t))
        } else {
            [t; 4]
        }
    }
}

impl Keyframe for BoneKeyframe {
    fn frame(&self) -> u32 {
        self.frame
    }

    fn set_frame(&mut self, frame: u32) {
        self.frame = frame;
    }

    fn blend(head: &Self, tail: &Self, t: f64, use_bezier: bool, frame: u32) -> Self {
        let [fx, fy, fz, fr] = tail.eased_fractions(t, use_bezier);
        let position = Vec3::new(
            lerp(head.position, tail.position, fx).x,
            lerp(head.position, tail.position, fy).y,
            lerp(head.position, tail.position, fz).z,
        );
        Self::new(frame, position, slerp(head.rotation, tail.rotation, fr))
    }
}

/// Morph weight keyframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphKeyframe {
    pub frame: u32,
    pub weight: f64,
}

impl MorphKeyframe {
    /// Creates a morph keyframe.
    pub fn new(frame: u32, weight: f64) -> Self {
        Self { frame, weight }
    }

    /// Weight at fraction `t`, eased through `curve` when one is supplied.
    pub fn blend_eased(
        head: &Self,
        tail: &Self,
        t: f64,
        curve: Option<BezierCurve>,
        frame: u32,
    ) -> Self {
        let t = curve.map_or(t, |c| c.ease(t));
        Self::new(frame, head.weight + (tail.weight - head.weight) * t)
    }
}

impl Keyframe for MorphKeyframe {
    fn frame(&self) -> u32 {
        self.frame
    }

    fn set_frame(&mut self, frame: u32) {
        self.frame = frame;
    }

    fn blend(head: &Self, tail: &Self, t: f64, _use_bezier: bool, frame: u32) -> Self {
        // Morph keyframes carry no ease curve of their own.
        Self::blend_eased(head, tail, t, None, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_channel_name_key_stops_at_nul() {
        let mut field = [0u8; NAME_FIELD_LEN];
        field[..6].copy_from_slice(b"center");
        field[8] = 0xFD; // garbage after the terminator
        let name = ChannelName::from_field(field);
        assert_eq!(name.key(), b"center");
        assert_eq!(name.field()[8], 0xFD);
        assert_eq!(name.to_string(), "center");
    }

    #[test]
    fn test_channel_name_truncates() {
        let name = ChannelName::new("a_really_long_bone_name");
        assert_eq!(name.key().len(), NAME_FIELD_LEN);
    }

    #[test]
    fn test_interpolation_layout() {
        let mut block = BoneInterpolation::default();
        block.set_curve(Axis::X, BezierCurve::new(10, 100, 110, 30));
        block.set_curve(Axis::Rotation, BezierCurve::new(20, 5, 90, 127));
        let bytes = block.as_bytes();
        assert_eq!([bytes[0], bytes[4], bytes[8], bytes[12]], [10, 100, 110, 30]);
        assert_eq!([bytes[3], bytes[7], bytes[11], bytes[15]], [20, 5, 90, 127]);
        assert_eq!(block.curve(Axis::Y), BezierCurve::LINEAR);
        assert!(bytes[16..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_set_curve_preserves_opaque_bytes() {
        let mut raw = [7u8; INTERPOLATION_BLOCK_LEN];
        raw[0] = 1;
        let mut block = BoneInterpolation::from_bytes(raw);
        block.set_curve(Axis::Z, BezierCurve::LINEAR);
        assert_eq!(&block.as_bytes()[16..], &raw[16..]);
        assert_eq!(block.as_bytes()[0], 1);
    }

    #[test]
    fn test_bone_blend_eases_axes_independently() {
        let head = BoneKeyframe::new(0, Vec3::ZERO, Quat::IDENTITY);
        let tail = BoneKeyframe::new(10, Vec3::new(10.0, 10.0, 10.0), Quat::IDENTITY)
            .with_curve(Axis::X, BezierCurve::new(64, 0, 127, 64));
        let mid = BoneKeyframe::blend(&head, &tail, 0.5, true, 5);
        assert_eq!(mid.frame, 5);
        assert!(mid.position.x < 5.0);
        assert_eq!(mid.position.y, 5.0);
        assert_eq!(mid.position.z, 5.0);
        assert_eq!(mid.interpolation, BoneInterpolation::default());

        let linear = BoneKeyframe::blend(&head, &tail, 0.5, false, 5);
        assert_eq!(linear.position, Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_morph_blend() {
        let head = MorphKeyframe::new(0, 1.0);
        let tail = MorphKeyframe::new(4, 0.0);
        let m = MorphKeyframe::blend(&head, &tail, 0.25, true, 1);
        assert_eq!(m, MorphKeyframe::new(1, 0.75));
    }
}
