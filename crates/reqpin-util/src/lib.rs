//! Shared utilities for reqpin.
//!
//! This crate provides cross-cutting concerns used by the other reqpin
//! crates: the unified error type, filesystem and output routing helpers,
//! and terminal status lines.

pub mod errors;
pub mod fs;
pub mod progress;
