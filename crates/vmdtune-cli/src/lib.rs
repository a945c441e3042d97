//! vmdtune CLI library.
//!
//! This crate provides the pieces behind the `vmdtune` binary: grouping VMD
//! records into channels, loading pipeline configs, logging setup and the
//! `process` / `inspect` commands.

pub mod channels;
pub mod commands;
pub mod config;
pub mod logging;
