//! Core types and configuration for the triage priority engine.
//!
//! This crate provides the shared data model (priority levels, cues,
//! derivation results), error handling, and configuration used across
//! the triage workspace.

/// Configuration types and file persistence.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Core data types for cues, signals, and derivation results.
pub mod types;

pub use config::{ClassifierConfig, StoreConfig, TemporalConfig, TriageConfig};
pub use error::{Error, Result};
pub use types::{PriorityCue, PriorityLevel, PriorityResult, Signals};
