//! VMD signature and layout constants.

/// Width of the signature field.
pub const SIGNATURE_LEN: usize = 30;

/// Signature text of current files.
pub const SIGNATURE_V2: &[u8] = b"Vocaloid Motion Data 0002";

/// Signature text of legacy files.
pub const SIGNATURE_LEGACY: &[u8] = b"Vocaloid Motion Data file";

/// Width of a bone or morph name field.
pub const NAME_LEN: usize = 15;

/// Width of a bone record's interpolation block.
pub const INTERPOLATION_LEN: usize = 64;

/// Size of one bone record.
pub const BONE_RECORD_LEN: usize = NAME_LEN + 4 + 3 * 4 + 4 * 4 + INTERPOLATION_LEN;

/// Size of one morph record.
pub const MORPH_RECORD_LEN: usize = NAME_LEN + 4 + 4;

/// Format generation, identified by the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmdVersion {
    /// "Vocaloid Motion Data 0002", 20-byte model name.
    V2,
    /// "Vocaloid Motion Data file", 10-byte model name.
    Legacy,
}

impl VmdVersion {
    /// Width of the model name field following the signature.
    pub fn model_name_len(self) -> usize {
        match self {
            VmdVersion::V2 => 20,
            VmdVersion::Legacy => 10,
        }
    }

    /// Signature text for this version.
    pub fn signature_text(self) -> &'static [u8] {
        match self {
            VmdVersion::V2 => SIGNATURE_V2,
            VmdVersion::Legacy => SIGNATURE_LEGACY,
        }
    }

    /// NUL-padded signature field for this version.
    pub fn signature_field(self) -> [u8; SIGNATURE_LEN] {
        let mut field = [0u8; SIGNATURE_LEN];
        let text = self.signature_text();
        field[..text.len()].copy_from_slice(text);
        field
    }

    /// Identifies the version from a raw signature field.
    ///
    /// Only the bytes before the first NUL are compared.
    pub fn detect(field: &[u8]) -> Option<VmdVersion> {
        let text = until_nul(field);
        if text == SIGNATURE_V2 {
            Some(VmdVersion::V2)
        } else if text == SIGNATURE_LEGACY {
            Some(VmdVersion::Legacy)
        } else {
            None
        }
    }
}

/// Bytes before the first NUL.
pub fn until_nul(field: &[u8]) -> &[u8] {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    &field[..end]
}
