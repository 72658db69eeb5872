//! User cue storage and the registry operating on it.
//!
//! The registry is an injected service around a [`CueStore`]; the cue
//! set is an enhancement rather than a core requirement, so a corrupt
//! or missing store always loads as an empty list instead of failing.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use tracing::debug;
use triage_core::{Error, PriorityCue, PriorityLevel, Result};

/// Persistence seam for user cues.
///
/// Implementations must treat unreadable or malformed data as an
/// empty cue set; only writes may fail.
pub trait CueStore: Send + Sync {
    /// Loads all stored cues in stored order.
    fn load(&self) -> Vec<PriorityCue>;

    /// Persists the full replacement list.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn save(&self, cues: &[PriorityCue]) -> Result<()>;
}

/// On-disk cue record shape.
///
/// Tolerates the legacy `{phrase, w}` layout, which carried a raw
/// signed weight instead of a level.
#[derive(Debug, Deserialize)]
struct StoredCue {
    /// The cue phrase.
    phrase: Option<String>,
    /// Current level field.
    level: Option<String>,
    /// Legacy signed weight field.
    #[serde(rename = "w")]
    weight: Option<f64>,
}

impl StoredCue {
    /// Normalizes one stored record, dropping malformed entries.
    fn normalize(self) -> Option<PriorityCue> {
        let phrase = self.phrase?.trim().to_owned();
        if phrase.is_empty() {
            return None;
        }

        let level = match (self.level, self.weight) {
            (Some(level), _) => PriorityLevel::parse_lenient(&level),
            (None, Some(weight)) => PriorityLevel::from_weight(weight),
            (None, None) => PriorityLevel::Medium,
        };

        Some(PriorityCue { phrase, level })
    }
}

/// Cue store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Path of the JSON record.
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CueStore for JsonFileStore {
    fn load(&self) -> Vec<PriorityCue> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<StoredCue>>(&raw) {
            Ok(stored) => stored
                .into_iter()
                .filter_map(StoredCue::normalize)
                .collect(),
            Err(error) => {
                debug!(path = %self.path.display(), %error, "cue store unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    fn save(&self, cues: &[PriorityCue]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|error| Error::Store(format!("create store directory: {error}")))?;
        }
        let contents = serde_json::to_string_pretty(cues)?;
        fs::write(&self.path, contents)
            .map_err(|error| Error::Store(format!("write cue store: {error}")))?;
        Ok(())
    }
}

/// In-process cue store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Current cue list.
    cues: Mutex<Vec<PriorityCue>>,
}

impl CueStore for MemoryStore {
    fn load(&self) -> Vec<PriorityCue> {
        self.cues.lock().map_or_else(|_| Vec::new(), |cues| cues.clone())
    }

    fn save(&self, cues: &[PriorityCue]) -> Result<()> {
        let mut guard = self
            .cues
            .lock()
            .map_err(|_| Error::Store("memory store poisoned".to_owned()))?;
        *guard = cues.to_vec();
        Ok(())
    }
}

/// Registry of user priority nudges.
///
/// Phrases are trimmed and case-insensitively unique; updating an
/// existing phrase replaces its level in place without moving it.
#[derive(Clone)]
pub struct CueRegistry {
    /// Backing store.
    store: Arc<dyn CueStore>,
}

impl CueRegistry {
    /// Creates a registry over the given store.
    pub fn new(store: Arc<dyn CueStore>) -> Self {
        Self { store }
    }

    /// Creates a registry over an in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    /// Returns all stored cues in stored order.
    pub fn list(&self) -> Vec<PriorityCue> {
        self.store.load()
    }

    /// Adds a cue, or updates the level of an existing phrase in place.
    ///
    /// An empty phrase is a no-op and returns the list unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn add(&self, phrase: &str, level: PriorityLevel) -> Result<Vec<PriorityCue>> {
        let mut cues = self.store.load();
        let trimmed = phrase.trim();
        if trimmed.is_empty() {
            return Ok(cues);
        }

        let needle = trimmed.to_lowercase();
        match cues
            .iter_mut()
            .find(|cue| cue.phrase.to_lowercase() == needle)
        {
            Some(existing) => {
                existing.phrase = trimmed.to_owned();
                existing.level = level;
            }
            None => cues.push(PriorityCue::new(trimmed, level)),
        }

        self.store.save(&cues)?;
        Ok(cues)
    }

    /// Removes the cue whose phrase matches case-insensitively.
    ///
    /// No-op if the phrase is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn remove(&self, phrase: &str) -> Result<Vec<PriorityCue>> {
        let needle = phrase.trim().to_lowercase();
        let mut cues = self.store.load();
        cues.retain(|cue| cue.phrase.to_lowercase() != needle);
        self.store.save(&cues)?;
        Ok(cues)
    }

    /// Normalizes and persists an entire replacement list.
    ///
    /// Entries are trimmed, blank phrases dropped, and duplicates
    /// collapsed case-insensitively (the later level wins, the earlier
    /// position is kept).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn save_all(&self, cues: &[PriorityCue]) -> Result<Vec<PriorityCue>> {
        let mut normalized: Vec<PriorityCue> = Vec::new();
        for cue in cues {
            let trimmed = cue.phrase.trim();
            if trimmed.is_empty() {
                continue;
            }
            let needle = trimmed.to_lowercase();
            match normalized
                .iter_mut()
                .find(|existing| existing.phrase.to_lowercase() == needle)
            {
                Some(existing) => existing.level = cue.level,
                None => normalized.push(PriorityCue::new(trimmed, cue.level)),
            }
        }

        self.store.save(&normalized)?;
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CueRegistry {
        CueRegistry::in_memory()
    }

    #[test]
    fn test_add_and_list() {
        let registry = registry();
        let cues = registry
            .add("blocker", PriorityLevel::High)
            .unwrap_or_default();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].phrase, "blocker");
        assert_eq!(registry.list(), cues);
    }

    #[test]
    fn test_add_is_idempotent() {
        let registry = registry();
        let first = registry
            .add("blocker", PriorityLevel::High)
            .unwrap_or_default();
        let second = registry
            .add("blocker", PriorityLevel::High)
            .unwrap_or_default();
        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_duplicate_phrase_updates_in_place() {
        let registry = registry();
        let _first = registry.add("blocker", PriorityLevel::High);
        let _second = registry.add("review", PriorityLevel::Medium);
        let cues = registry
            .add("BLOCKER", PriorityLevel::Low)
            .unwrap_or_default();

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].level, PriorityLevel::Low);
        assert_eq!(cues[1].phrase, "review");
    }

    #[test]
    fn test_empty_phrase_is_noop() {
        let registry = registry();
        let _seed = registry.add("blocker", PriorityLevel::High);
        let cues = registry.add("   ", PriorityLevel::Low).unwrap_or_default();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].level, PriorityLevel::High);
    }

    #[test]
    fn test_remove_case_insensitive() {
        let registry = registry();
        let _seed = registry.add("Blocker", PriorityLevel::High);
        let cues = registry.remove("blocker").unwrap_or_default();
        assert!(cues.is_empty());
    }

    #[test]
    fn test_save_all_dedupes_and_trims() {
        let registry = registry();
        let cues = registry
            .save_all(&[
                PriorityCue::new("  blocker ", PriorityLevel::High),
                PriorityCue::new("", PriorityLevel::Low),
                PriorityCue::new("Blocker", PriorityLevel::Low),
                PriorityCue::new("ping", PriorityLevel::Medium),
            ])
            .unwrap_or_default();

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].phrase, "blocker");
        assert_eq!(cues[0].level, PriorityLevel::Low);
        assert_eq!(cues[1].phrase, "ping");
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("tempdir failed: {error}"),
        };
        let path = dir.path().join("cues.json");
        if let Err(error) = fs::write(&path, "{not valid json") {
            panic!("write failed: {error}");
        }

        let store = JsonFileStore::new(&path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let store = JsonFileStore::new("/definitely/not/a/real/path.json");
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_legacy_weight_record_migrates() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("tempdir failed: {error}"),
        };
        let path = dir.path().join("cues.json");
        let legacy = "[{\"phrase\": \"blocker\", \"w\": 0.66}, \
                      {\"phrase\": \"someday\", \"w\": -0.66}, \
                      {\"phrase\": \"ping\", \"w\": 0.1}, \
                      {\"phrase\": \"  \", \"w\": 0.5}, \
                      {\"w\": 0.5}]";
        if let Err(error) = fs::write(&path, legacy) {
            panic!("write failed: {error}");
        }

        let store = JsonFileStore::new(&path);
        let cues = store.load();
        assert_eq!(cues.len(), 3);
        assert_eq!(cues[0].level, PriorityLevel::High);
        assert_eq!(cues[1].level, PriorityLevel::Low);
        assert_eq!(cues[2].level, PriorityLevel::Medium);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("tempdir failed: {error}"),
        };
        let store = Arc::new(JsonFileStore::new(dir.path().join("cues.json")));
        let registry = CueRegistry::new(Arc::clone(&store) as Arc<dyn CueStore>);

        let _saved = registry.add("blocker", PriorityLevel::High);
        let reloaded = JsonFileStore::new(dir.path().join("cues.json")).load();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].phrase, "blocker");
        assert_eq!(reloaded[0].level, PriorityLevel::High);
    }
}
