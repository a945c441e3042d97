//! Bone and morph keyframe records.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{VmdError, VmdResult};
use crate::header::{INTERPOLATION_LEN, NAME_LEN};

/// One bone keyframe as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneRecord {
    /// Raw, NUL-padded bone name.
    pub name: [u8; NAME_LEN],
    pub frame: u32,
    pub position: [f32; 3],
    /// Rotation quaternion as (x, y, z, w).
    pub rotation: [f32; 4],
    pub interpolation: [u8; INTERPOLATION_LEN],
}

impl BoneRecord {
    pub fn read<R: Read>(reader: &mut R) -> VmdResult<Self> {
        Self::read_fields(reader).map_err(VmdError::while_reading("bone"))
    }

    fn read_fields<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut name = [0u8; NAME_LEN];
        reader.read_exact(&mut name)?;
        let frame = reader.read_u32::<LittleEndian>()?;
        let mut position = [0f32; 3];
        reader.read_f32_into::<LittleEndian>(&mut position)?;
        let mut rotation = [0f32; 4];
        reader.read_f32_into::<LittleEndian>(&mut rotation)?;
        let mut interpolation = [0u8; INTERPOLATION_LEN];
        reader.read_exact(&mut interpolation)?;
        Ok(Self {
            name,
            frame,
            position,
            rotation,
            interpolation,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> VmdResult<()> {
        writer.write_all(&self.name)?;
        writer.write_u32::<LittleEndian>(self.frame)?;
        for v in self.position {
            writer.write_f32::<LittleEndian>(v)?;
        }
        for v in self.rotation {
            writer.write_f32::<LittleEndian>(v)?;
        }
        writer.write_all(&self.interpolation)?;
        Ok(())
    }
}

/// One morph keyframe as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphRecord {
    /// Raw, NUL-padded morph name.
    pub name: [u8; NAME_LEN],
    pub frame: u32,
    pub weight: f32,
}

impl MorphRecord {
    pub fn read<R: Read>(reader: &mut R) -> VmdResult<Self> {
        Self::read_fields(reader).map_err(VmdError::while_reading("morph"))
    }

    fn read_fields<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut name = [0u8; NAME_LEN];
        reader.read_exact(&mut name)?;
        let frame = reader.read_u32::<LittleEndian>()?;
        let weight = reader.read_f32::<LittleEndian>()?;
        Ok(Self {
            name,
            frame,
            weight,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> VmdResult<()> {
        writer.write_all(&self.name)?;
        writer.write_u32::<LittleEndian>(self.frame)?;
        writer.write_f32::<LittleEndian>(self.weight)?;
        Ok(())
    }
}

/// Builds a NUL-padded name field from text, truncating to the field width.
pub fn name_field(name: &str) -> [u8; NAME_LEN] {
    let mut field = [0u8; NAME_LEN];
    let bytes = name.as_bytes();
    let len = bytes.len().min(NAME_LEN);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{BONE_RECORD_LEN, MORPH_RECORD_LEN};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn sample_bone() -> BoneRecord {
        let mut interpolation = [0u8; INTERPOLATION_LEN];
        for (i, b) in interpolation.iter_mut().enumerate() {
            *b = i as u8;
        }
        BoneRecord {
            name: name_field("center"),
            frame: 42,
            position: [1.5, -2.0, 0.25],
            rotation: [0.0, 0.38268343, 0.0, 0.9238795],
            interpolation,
        }
    }

    #[test]
    fn test_bone_layout() {
        let mut buf = Vec::new();
        sample_bone().write(&mut buf).unwrap();
        assert_eq!(buf.len(), BONE_RECORD_LEN);
        assert_eq!(&buf[..6], b"center");
        assert_eq!(&buf[15..19], &42u32.to_le_bytes());
        assert_eq!(&buf[19..23], &1.5f32.to_le_bytes());
        assert_eq!(buf[47], 0);
        assert_eq!(buf[110], 63);

        let back = BoneRecord::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(back, sample_bone());
    }

    #[test]
    fn test_morph_layout() {
        let record = MorphRecord {
            name: name_field("blink"),
            frame: 7,
            weight: 0.5,
        };
        let mut buf = Vec::new();
        record.write(&mut buf).unwrap();
        assert_eq!(buf.len(), MORPH_RECORD_LEN);
        assert_eq!(&buf[19..23], &0.5f32.to_le_bytes());
        assert_eq!(MorphRecord::read(&mut Cursor::new(&buf)).unwrap(), record);
    }

    #[test]
    fn test_short_bone_record_is_truncated() {
        let mut buf = Vec::new();
        sample_bone().write(&mut buf).unwrap();
        buf.truncate(100);
        let err = BoneRecord::read(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, VmdError::Truncated { section: "bone" }));
    }

    #[test]
    fn test_name_field_truncates() {
        let field = name_field("a_very_long_morph_name");
        assert_eq!(&field, b"a_very_long_mor");
    }
}
