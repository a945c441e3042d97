//! vmdtune VMD Container
//!
//! Reader and writer for the VMD binary motion format (little endian).
//!
//! # Layout
//!
//! | field | size |
//! |---|---|
//! | signature | 30 bytes, `"Vocaloid Motion Data 0002"` or the legacy `"Vocaloid Motion Data file"` |
//! | model name | 20 bytes (10 for legacy files) |
//! | bone count, bone records | u32, 111 bytes each |
//! | morph count, morph records | u32, 23 bytes each |
//! | camera, light, self-shadow, IK | kept as an opaque trailer |
//!
//! Names are raw byte fields and are never decoded.
//!
//! # Example
//!
//! ```
//! use vmdtune_vmd::{Motion, MorphRecord, name_field};
//!
//! let mut motion = Motion::new(b"model");
//! motion.morphs.push(MorphRecord { name: name_field("blink"), frame: 0, weight: 1.0 });
//! let bytes = motion.to_bytes().unwrap();
//! assert_eq!(Motion::from_bytes(&bytes).unwrap(), motion);
//! ```

pub mod error;
pub mod header;
pub mod motion;
pub mod record;

pub use error::{VmdError, VmdResult};
pub use header::{VmdVersion, INTERPOLATION_LEN, NAME_LEN};
pub use motion::Motion;
pub use record::{name_field, BoneRecord, MorphRecord};
