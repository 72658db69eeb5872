//! Command-line argument definitions.

use clap::{Parser, Subcommand};

/// Derive task priorities from natural language.
#[derive(Debug, Parser)]
#[command(name = "triage", version, about)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify task text and print the derived priority.
    Classify {
        /// The task text to classify.
        text: String,
        /// Skip the remote classifier and use local heuristics only.
        #[arg(long)]
        local: bool,
        /// Pin the clock to an RFC 3339 timestamp instead of now.
        #[arg(long)]
        now: Option<String>,
        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Manage user priority cues.
    #[command(subcommand)]
    Cues(CueCommand),
    /// Check whether the classification server is reachable.
    Health,
    /// Ask the classification server to preload its model.
    Warmup,
}

/// Cue management commands.
#[derive(Debug, Subcommand)]
pub enum CueCommand {
    /// List all stored cues.
    List,
    /// Add a cue, or update the level of an existing phrase.
    Add {
        /// Phrase to match as a whole word, case-insensitively.
        phrase: String,
        /// Priority level the phrase nudges towards.
        #[arg(long, default_value = "medium")]
        level: String,
    },
    /// Remove a cue by phrase.
    Remove {
        /// Phrase of the cue to remove.
        phrase: String,
    },
}
