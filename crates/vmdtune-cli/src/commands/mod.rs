//! Command implementations for the vmdtune CLI.

pub mod inspect;
pub mod json_output;
pub mod process;
