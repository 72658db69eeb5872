//! Priority derivation engine.
//!
//! Combines lexical cue scanning, temporal extraction, and score
//! synthesis into a local heuristic path, and wraps it together with
//! the remote classifier behind a single orchestrator entry point.

/// User cue storage and registry operations.
pub mod cues;
/// Local heuristic analyzer wiring.
pub mod local;
/// Remote-first orchestration with local fallback.
pub mod orchestrator;
/// Built-in and user cue matching.
pub mod scanner;
/// Score synthesis from lexical and temporal signals.
pub mod synth;
/// Due date and duration extraction.
pub mod temporal;

pub use cues::{CueRegistry, CueStore, JsonFileStore, MemoryStore};
pub use local::LocalAnalyzer;
pub use orchestrator::{Classifier, PriorityOrchestrator};
pub use scanner::{ScanOutcome, scan};
pub use synth::{Synthesis, synthesize};
pub use temporal::{FallbackParser, FullParser, TemporalParser};
