//! Requirement reconciliation engine.
//!
//! A [`MergeSession`] folds a stream of requirements (direct, transitive and
//! constraints) into one authoritative requirement per package name, records
//! which requirement introduced which dependency, and rejects conflicts it
//! cannot reconcile. It never solves version ranges and never fetches
//! anything; the [`Backend`] answers the only questions that need outside
//! knowledge.
//!
//! [`MergeSession`]: merge::MergeSession
//! [`Backend`]: backend::Backend

pub mod backend;
pub mod conflict;
pub mod graph;
pub mod merge;
pub mod registry;
pub mod render;
