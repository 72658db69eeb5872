//! Command handlers for CLI operations.
#![allow(clippy::print_stdout, reason = "CLI output goes to stdout")]

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use tracing::warn;
use triage_core::{PriorityLevel, PriorityResult, TriageConfig};
use triage_engine::PriorityOrchestrator;
use triage_remote::RemoteClassifier;

use crate::cli::{Cli, Command, CueCommand};

/// Routes a parsed command to its handler.
///
/// # Errors
/// Returns an error if configuration cannot be resolved or a store or
/// network operation fails.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = TriageConfig::load_or_create().unwrap_or_else(|error| {
        warn!("failed to load config, using defaults: {error}");
        TriageConfig::default()
    });

    match cli.command {
        Command::Classify {
            text,
            local,
            now,
            json,
        } => handle_classify(&config, &text, local, now.as_deref(), json).await,
        Command::Cues(command) => handle_cues(&config, command),
        Command::Health => handle_health(&config).await,
        Command::Warmup => handle_warmup(&config).await,
    }
}

/// Runs one derivation and prints the result.
async fn handle_classify(
    config: &TriageConfig,
    text: &str,
    local_only: bool,
    now: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut config = config.clone();
    if local_only {
        config.classifier.enabled = false;
    }

    let orchestrator = PriorityOrchestrator::new(&config)?;
    let result = match now {
        Some(stamp) => {
            let pinned: DateTime<Utc> = stamp
                .parse()
                .with_context(|| format!("invalid RFC 3339 timestamp: {stamp}"))?;
            orchestrator.derive_priority_at(text, pinned).await
        }
        None => orchestrator.derive_priority(text).await,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

/// Human-readable result output.
fn print_result(result: &PriorityResult) {
    println!("label:     {}", result.label);
    println!("score:     {:.3}", result.score);
    match result.due {
        Some(due) => println!("due:       {}", due.to_rfc3339()),
        None => println!("due:       none"),
    }
    println!("rationale: {}", result.rationale);
}

/// Cue registry management.
fn handle_cues(config: &TriageConfig, command: CueCommand) -> Result<()> {
    let orchestrator = PriorityOrchestrator::new(config)?;

    let cues = match command {
        CueCommand::List => orchestrator.list_cues(),
        CueCommand::Add { phrase, level } => {
            orchestrator.add_cue(&phrase, PriorityLevel::parse_lenient(&level))?
        }
        CueCommand::Remove { phrase } => orchestrator.remove_cue(&phrase)?,
    };

    if cues.is_empty() {
        println!("no cues stored");
    }
    for cue in cues {
        println!("{:8} {}", cue.level.to_string(), cue.phrase);
    }
    Ok(())
}

/// Health check against the classification server.
async fn handle_health(config: &TriageConfig) -> Result<()> {
    let classifier = RemoteClassifier::new(&config.classifier);
    match classifier.health().await {
        Ok(true) => println!("ok: {}", classifier.base_url()),
        Ok(false) => println!("unhealthy: {}", classifier.base_url()),
        Err(error) => println!("unreachable: {error}"),
    }
    Ok(())
}

/// Model warmup against the classification server.
async fn handle_warmup(config: &TriageConfig) -> Result<()> {
    let classifier = RemoteClassifier::new(&config.classifier);
    classifier.warmup().await?;
    println!("warmup requested");
    Ok(())
}
