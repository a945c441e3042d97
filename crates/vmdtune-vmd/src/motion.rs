//! Whole-file VMD reading and writing.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{VmdError, VmdResult};
use crate::header::{
    until_nul, VmdVersion, BONE_RECORD_LEN, MORPH_RECORD_LEN, SIGNATURE_LEN,
};
use crate::record::{BoneRecord, MorphRecord};

/// A parsed VMD file.
///
/// Bone and morph sections are decoded. Everything after the morph section
/// (camera, light, self-shadow and IK data) is kept as raw bytes and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub version: VmdVersion,
    /// Raw signature field, including any bytes after the NUL terminator.
    pub signature: [u8; SIGNATURE_LEN],
    /// Raw model name field.
    pub model_name: Vec<u8>,
    pub bones: Vec<BoneRecord>,
    pub morphs: Vec<MorphRecord>,
    /// Unparsed sections following the morphs.
    pub trailer: Vec<u8>,
}

impl Motion {
    /// Creates an empty current-version motion for `model_name`.
    pub fn new(model_name: &[u8]) -> Self {
        let version = VmdVersion::V2;
        let mut name = model_name.to_vec();
        name.resize(version.model_name_len(), 0);
        Self {
            version,
            signature: version.signature_field(),
            model_name: name,
            bones: Vec::new(),
            morphs: Vec::new(),
            trailer: Vec::new(),
        }
    }

    /// Reads a whole motion from `reader`.
    pub fn read<R: Read>(reader: &mut R) -> VmdResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Parses a motion from an in-memory file image.
    pub fn from_bytes(bytes: &[u8]) -> VmdResult<Self> {
        let mut cursor = Cursor::new(bytes);

        let mut signature = [0u8; SIGNATURE_LEN];
        cursor
            .read_exact(&mut signature)
            .map_err(VmdError::while_reading("header"))?;
        let version = VmdVersion::detect(&signature).ok_or_else(|| VmdError::InvalidSignature {
            found: String::from_utf8_lossy(until_nul(&signature)).into_owned(),
        })?;

        let mut model_name = vec![0u8; version.model_name_len()];
        cursor
            .read_exact(&mut model_name)
            .map_err(VmdError::while_reading("header"))?;

        let bone_count = read_count(&mut cursor, "bone", BONE_RECORD_LEN)?;
        let bones = (0..bone_count)
            .map(|_| BoneRecord::read(&mut cursor))
            .collect::<VmdResult<Vec<_>>>()?;

        // Old files may end right after the bone section.
        let morphs = if remaining(&cursor) == 0 {
            Vec::new()
        } else {
            let morph_count = read_count(&mut cursor, "morph", MORPH_RECORD_LEN)?;
            (0..morph_count)
                .map(|_| MorphRecord::read(&mut cursor))
                .collect::<VmdResult<Vec<_>>>()?
        };

        let mut trailer = Vec::new();
        cursor.read_to_end(&mut trailer)?;

        Ok(Self {
            version,
            signature,
            model_name,
            bones,
            morphs,
            trailer,
        })
    }

    /// Writes the motion to `writer`.
    ///
    /// The model name is padded or cut to the version's field width. A morph
    /// count is always written, even when the source file had none.
    pub fn write<W: Write>(&self, writer: &mut W) -> VmdResult<()> {
        writer.write_all(&self.signature)?;

        let mut name = self.model_name.clone();
        name.resize(self.version.model_name_len(), 0);
        writer.write_all(&name)?;

        writer.write_u32::<LittleEndian>(count_field("bone", self.bones.len())?)?;
        for bone in &self.bones {
            bone.write(writer)?;
        }

        writer.write_u32::<LittleEndian>(count_field("morph", self.morphs.len())?)?;
        for morph in &self.morphs {
            morph.write(writer)?;
        }

        writer.write_all(&self.trailer)?;
        Ok(())
    }

    /// Serializes the motion to a byte vector.
    pub fn to_bytes(&self) -> VmdResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write(&mut buf)?;
        Ok(buf)
    }
}

fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    cursor.get_ref().len().saturating_sub(cursor.position() as usize)
}

/// Reads a section's record count, rejecting counts the rest of the file
/// cannot hold.
fn read_count(
    cursor: &mut Cursor<&[u8]>,
    section: &'static str,
    record_len: usize,
) -> VmdResult<usize> {
    let count = cursor
        .read_u32::<LittleEndian>()
        .map_err(VmdError::while_reading(section))? as usize;
    if count.saturating_mul(record_len) > remaining(cursor) {
        return Err(VmdError::Truncated { section });
    }
    Ok(count)
}

fn count_field(section: &'static str, count: usize) -> VmdResult<u32> {
    u32::try_from(count).map_err(|_| VmdError::TooManyRecords { section, count })
}
