//! Error types for VMD reading and writing.

use std::io;

use thiserror::Error;

/// Result type for VMD operations.
pub type VmdResult<T> = Result<T, VmdError>;

/// Errors raised by the VMD reader and writer.
#[derive(Debug, Error)]
pub enum VmdError {
    /// The file does not start with a known VMD signature.
    #[error("not a VMD file: unrecognized signature {found:?}")]
    InvalidSignature {
        /// Signature text up to the first NUL, decoded lossily.
        found: String,
    },

    /// The file ends in the middle of a section.
    #[error("VMD file truncated in {section} section")]
    Truncated {
        /// Section being read when the data ran out.
        section: &'static str,
    },

    /// A section has more records than the format can count.
    #[error("too many {section} records: {count}")]
    TooManyRecords {
        /// Section being written.
        section: &'static str,
        /// Number of records.
        count: usize,
    },

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl VmdError {
    /// Returns the stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            VmdError::InvalidSignature { .. } => "VMD_001",
            VmdError::Truncated { .. } => "VMD_002",
            VmdError::TooManyRecords { .. } => "VMD_003",
            VmdError::Io(_) => "VMD_004",
        }
    }

    /// Maps an early end of input to [`VmdError::Truncated`] for `section`.
    pub(crate) fn while_reading(section: &'static str) -> impl FnOnce(io::Error) -> VmdError {
        move |err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                VmdError::Truncated { section }
            } else {
                VmdError::Io(err)
            }
        }
    }
}
