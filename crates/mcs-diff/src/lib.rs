//! Structural diff engine for Minecraft server status documents.
//!
//! Compares two nested key-value documents (typically an expected status
//! fixture and a live status response) and produces a hierarchical report
//! of every key where they disagree.
//!
//! # Key Types
//!
//! - [`Document`] / [`Value`] -- Tree-shaped status document model
//! - [`Difference`] -- Leaf-level mismatch for one key
//! - [`SubDifference`] -- Mismatches nested under one key whose values are both documents
//! - [`DiffResult`] -- Ordered list of top-level mismatches
//! - [`compare`] / [`compare_json`] -- The comparison entry points

pub mod diff;
pub mod document;
pub mod engine;
pub mod error;

pub use diff::{DiffEntry, DiffResult, Difference, SubDifference};
pub use document::{Document, Value};
pub use engine::{compare, compare_json};
pub use error::{DiffError, Result};
