use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ScenarioDelta, ScenarioEntry, ScenarioKey, ScenarioStat};

/// Keyed scenario statistics. Lifetime and persistence belong to the caller.
pub trait ScenarioStore {
    /// Fold one decision into its scenario and return the updated stat.
    fn apply(&mut self, delta: &ScenarioDelta) -> ScenarioStat;

    fn get(&self, key: &ScenarioKey) -> Option<ScenarioStat>;

    /// All scenarios, ordered by key
    fn entries(&self) -> Vec<ScenarioEntry>;

    fn reset(&mut self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    stats: HashMap<ScenarioKey, ScenarioStat>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a previous export. Later duplicates win.
    pub fn from_entries(entries: impl IntoIterator<Item = ScenarioEntry>) -> Self {
        Self {
            stats: entries.into_iter().map(|e| (e.key, e.stat)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

impl ScenarioStore for MemoryStore {
    fn apply(&mut self, delta: &ScenarioDelta) -> ScenarioStat {
        let stat = self
            .stats
            .entry(delta.key)
            .or_insert_with(|| ScenarioStat::new(delta.optimal_action));
        stat.apply(delta);
        stat.clone()
    }

    fn get(&self, key: &ScenarioKey) -> Option<ScenarioStat> {
        self.stats.get(key).cloned()
    }

    fn entries(&self) -> Vec<ScenarioEntry> {
        let mut entries: Vec<ScenarioEntry> = self
            .stats
            .iter()
            .map(|(key, stat)| ScenarioEntry {
                key: *key,
                stat: stat.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    fn reset(&mut self) {
        self.stats.clear();
    }
}

/// Thread-safe handle over a [`MemoryStore`]. Clones share the same
/// statistics; each update holds the lock for the whole read-modify-write.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<MemoryStore>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_store(store: MemoryStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryStore> {
        // Updates never leave a stat half-written
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ScenarioStore for SharedStore {
    fn apply(&mut self, delta: &ScenarioDelta) -> ScenarioStat {
        self.lock().apply(delta)
    }

    fn get(&self, key: &ScenarioKey) -> Option<ScenarioStat> {
        self.lock().get(key)
    }

    fn entries(&self) -> Vec<ScenarioEntry> {
        self.lock().entries()
    }

    fn reset(&mut self) {
        self.lock().reset();
    }
}
