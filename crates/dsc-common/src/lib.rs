//! Common types and utilities for the dsc descriptor model.
//!
//! This crate provides foundational types used across all dsc crates:
//! - String interning (`Atom`, `ShardedInterner`)
//! - Centralized limits and thresholds
//! - Per-compilation options (`ModelOptions`)

// String interning for declaration names
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Centralized limits and thresholds
pub mod limits;

// Options loaded from JSON, defaulting to `limits`
pub mod options;
pub use options::ModelOptions;
