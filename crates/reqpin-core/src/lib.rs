//! Core data types for reqpin.
//!
//! This crate defines the values the merge engine works on: package names,
//! version specifiers, source links, provenance and the [`Requirement`]
//! itself, together with the parsers that produce them from requirement
//! lines, requirements/constraints files and environment markers, and the
//! user configuration.
//!
//! This crate is intentionally free of merge logic and network I/O.
//!
//! [`Requirement`]: requirement::Requirement

pub mod config;
pub mod link;
pub mod marker;
pub mod parse;
pub mod reqfile;
pub mod requirement;
pub mod specifier;
