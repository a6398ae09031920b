use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::strategy::{optimal_action, Action, Capabilities};
use crate::{Card, HandShape, Rank};

mod recorder;
mod store;

pub use recorder::{AccuracySummary, DecisionReport, Recorder};
pub use store::{MemoryStore, ScenarioStore, SharedStore};

/// Hand shape crossed with the dealer's up-card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScenarioKey {
    pub shape: HandShape,
    pub dealer: Rank,
}

impl ScenarioKey {
    pub fn new(shape: HandShape, dealer: Rank) -> Self {
        Self { shape, dealer }
    }

    pub fn of(cards: &[Card], up_card: &Card) -> Self {
        Self::new(HandShape::of(cards), up_card.rank)
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.shape, self.dealer)
    }
}

/// One observed decision, ready to be folded into a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub key: ScenarioKey,
    pub action_taken: Action,
    pub optimal_action: Action,
    pub correct: bool,
}

impl ScenarioDelta {
    /// Judge `action_taken` against basic strategy for the hand as it was
    /// when the decision was made. Empty hands and a missing up-card have
    /// no scenario and yield `None`.
    pub fn compute(
        cards: &[Card],
        up_card: Option<&Card>,
        capabilities: Capabilities,
        action_taken: Action,
    ) -> Option<Self> {
        let up_card = up_card?;
        if cards.is_empty() {
            return None;
        }

        let optimal = optimal_action(cards, Some(up_card), capabilities);
        Some(Self {
            key: ScenarioKey::of(cards, up_card),
            action_taken,
            optimal_action: optimal,
            correct: action_taken == optimal,
        })
    }
}

/// Aggregate accuracy for one scenario. Only ever grows until reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStat {
    pub occurrence_count: u32,
    pub action_frequency: BTreeMap<Action, u32>,
    pub optimal_action: Action,
    pub correct_count: u32,
}

impl ScenarioStat {
    pub fn new(optimal_action: Action) -> Self {
        Self {
            occurrence_count: 0,
            action_frequency: BTreeMap::new(),
            optimal_action,
            correct_count: 0,
        }
    }

    pub fn apply(&mut self, delta: &ScenarioDelta) {
        self.occurrence_count += 1;
        *self.action_frequency.entry(delta.action_taken).or_insert(0) += 1;
        // Capabilities can differ between visits; keep the latest verdict
        self.optimal_action = delta.optimal_action;
        if delta.correct {
            self.correct_count += 1;
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.occurrence_count == 0 {
            return 0.0;
        }
        self.correct_count as f64 / self.occurrence_count as f64
    }

    pub fn most_frequent_action(&self) -> Option<Action> {
        self.action_frequency
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(&action, _)| action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioEntry {
    pub key: ScenarioKey,
    pub stat: ScenarioStat,
}
