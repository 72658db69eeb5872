//! Remote-first priority derivation with transparent local fallback.

use core::result::Result as CoreResult;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use triage_core::{PriorityCue, PriorityLevel, PriorityResult, Result, TriageConfig};
use triage_remote::{ClassificationFailure, RemoteClassifier};

use crate::cues::{CueRegistry, JsonFileStore};
use crate::local::LocalAnalyzer;

/// Seam over the remote classification call, so tests can substitute
/// canned outcomes for the HTTP client.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Attempts one remote classification.
    ///
    /// # Errors
    ///
    /// Returns a [`ClassificationFailure`] describing why no result
    /// was produced.
    async fn classify(&self, text: &str) -> CoreResult<PriorityResult, ClassificationFailure>;
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> CoreResult<PriorityResult, ClassificationFailure> {
        Self::classify(self, text).await
    }
}

/// The public entry point for priority derivation.
///
/// Always attempts the remote classifier first (when enabled), and on
/// any failure falls back synchronously to the local heuristic path
/// with the same `now`. Exactly one result is returned per call; the
/// fallback chain absorbs every internal failure condition.
pub struct PriorityOrchestrator {
    /// Remote classification seam; `None` disables the remote path.
    classifier: Option<Arc<dyn Classifier>>,
    /// Local heuristic path.
    local: LocalAnalyzer,
    /// Registry shared with the local path, exposed for cue management.
    registry: CueRegistry,
}

impl PriorityOrchestrator {
    /// Creates an orchestrator from configuration, with a JSON file
    /// cue store at the configured path.
    ///
    /// # Errors
    ///
    /// Returns an error if the cue store location cannot be resolved.
    pub fn new(config: &TriageConfig) -> Result<Self> {
        let store = Arc::new(JsonFileStore::new(config.cues_path()?));
        let registry = CueRegistry::new(store);

        let classifier: Option<Arc<dyn Classifier>> = config
            .classifier
            .enabled
            .then(|| Arc::new(RemoteClassifier::new(&config.classifier)) as Arc<dyn Classifier>);

        Ok(Self {
            classifier,
            local: LocalAnalyzer::new(registry.clone(), &config.temporal),
            registry,
        })
    }

    /// Creates a purely local orchestrator over the given registry.
    pub fn local_only(registry: CueRegistry, config: &TriageConfig) -> Self {
        Self {
            classifier: None,
            local: LocalAnalyzer::new(registry.clone(), &config.temporal),
            registry,
        }
    }

    /// Sets a custom classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Sets a custom local analyzer.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: LocalAnalyzer) -> Self {
        self.local = analyzer;
        self
    }

    /// Derives a priority for task text against the current time.
    pub async fn derive_priority(&self, text: &str) -> PriorityResult {
        self.derive_priority_at(text, Utc::now()).await
    }

    /// Derives a priority against a pinned clock.
    ///
    /// The remote path is attempted first and strictly precedes the
    /// local fallback; the two never run concurrently.
    pub async fn derive_priority_at(&self, text: &str, now: DateTime<Utc>) -> PriorityResult {
        if let Some(classifier) = &self.classifier {
            match classifier.classify(text).await {
                Ok(result) => {
                    debug!(label = %result.label, "remote classification succeeded");
                    return result;
                }
                Err(failure) => log_fallback(&failure),
            }
        }

        self.local.derive(text, now)
    }

    /// Returns all stored cues.
    pub fn list_cues(&self) -> Vec<PriorityCue> {
        self.registry.list()
    }

    /// Adds or updates a cue.
    ///
    /// # Errors
    ///
    /// Returns an error if the cue store cannot be written.
    pub fn add_cue(&self, phrase: &str, level: PriorityLevel) -> Result<Vec<PriorityCue>> {
        self.registry.add(phrase, level)
    }

    /// Removes a cue by phrase.
    ///
    /// # Errors
    ///
    /// Returns an error if the cue store cannot be written.
    pub fn remove_cue(&self, phrase: &str) -> Result<Vec<PriorityCue>> {
        self.registry.remove(phrase)
    }

    /// Replaces the entire cue list.
    ///
    /// # Errors
    ///
    /// Returns an error if the cue store cannot be written.
    pub fn replace_all_cues(&self, cues: &[PriorityCue]) -> Result<Vec<PriorityCue>> {
        self.registry.save_all(cues)
    }
}

/// Logs why the remote path produced no result; every variant leads to
/// the local fallback, but the conditions stay distinct in the logs.
fn log_fallback(failure: &ClassificationFailure) {
    match failure {
        ClassificationFailure::ModelLoading => {
            warn!("classifier model still loading, using local heuristics");
        }
        ClassificationFailure::Timeout => {
            warn!("classification timed out, using local heuristics");
        }
        ClassificationFailure::Upstream { status } => {
            warn!(status, "classifier upstream error, using local heuristics");
        }
        ClassificationFailure::Transport(reason) => {
            warn!(%reason, "classifier unreachable, using local heuristics");
        }
        ClassificationFailure::MalformedResponse(body) => {
            warn!(%body, "unusable classifier response, using local heuristics");
        }
    }
}
