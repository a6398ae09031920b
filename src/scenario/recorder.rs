use serde::{Deserialize, Serialize};

use super::{ScenarioDelta, ScenarioEntry, ScenarioStat, ScenarioStore};
use crate::strategy::{Action, Capabilities};
use crate::Card;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionReport {
    pub delta: ScenarioDelta,
    /// Scenario aggregate after this decision
    pub stat: ScenarioStat,
}

impl DecisionReport {
    pub fn was_optimal(&self) -> bool {
        self.delta.correct
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracySummary {
    pub scenarios: usize,
    pub decisions: u32,
    pub correct: u32,
    pub accuracy: f64,
}

/// Compares taken actions with basic strategy and keeps per-scenario
/// accuracy in an injected store.
#[derive(Debug, Clone, Default)]
pub struct Recorder<S> {
    store: S,
}

impl<S: ScenarioStore> Recorder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// `cards` must be the hand before the action was applied. Returns
    /// `None`, recording nothing, for an empty hand or missing up-card.
    pub fn record_decision(
        &mut self,
        cards: &[Card],
        up_card: Option<&Card>,
        capabilities: Capabilities,
        action_taken: Action,
    ) -> Option<DecisionReport> {
        let delta = ScenarioDelta::compute(cards, up_card, capabilities, action_taken)?;
        let stat = self.store.apply(&delta);

        log::debug!(
            "{}: took {}, optimal {} ({}/{})",
            delta.key,
            delta.action_taken,
            delta.optimal_action,
            stat.correct_count,
            stat.occurrence_count
        );

        Some(DecisionReport { delta, stat })
    }

    pub fn summary(&self) -> AccuracySummary {
        let entries = self.store.entries();
        let decisions: u32 = entries.iter().map(|e| e.stat.occurrence_count).sum();
        let correct: u32 = entries.iter().map(|e| e.stat.correct_count).sum();
        let accuracy = if decisions == 0 {
            0.0
        } else {
            correct as f64 / decisions as f64
        };

        AccuracySummary {
            scenarios: entries.len(),
            decisions,
            correct,
            accuracy,
        }
    }

    /// Lowest accuracy first; among equals, the most played first.
    pub fn weakest(&self, limit: usize) -> Vec<ScenarioEntry> {
        let mut entries = self.store.entries();
        entries.sort_by(|a, b| {
            a.stat
                .accuracy()
                .total_cmp(&b.stat.accuracy())
                .then(b.stat.occurrence_count.cmp(&a.stat.occurrence_count))
                .then(a.key.cmp(&b.key))
        });
        entries.truncate(limit);
        entries
    }

    pub fn reset(&mut self) {
        self.store.reset();
    }
}
