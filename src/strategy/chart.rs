use serde::{Deserialize, Serialize};

use super::{optimal_action, Action, Capabilities};
use crate::{Card, HandShape, Rank};

/// Dealer up-cards in chart column order
pub const DEALER_UP_CARDS: [Rank; 10] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Ace,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRow {
    pub shape: HandShape,
    /// One action per entry of [`DEALER_UP_CARDS`]
    pub actions: [Action; 10],
}

impl ChartRow {
    fn build(shape: HandShape, capabilities: Capabilities) -> Self {
        let hand = shape.synthetic_hand();
        let actions = DEALER_UP_CARDS.map(|up| {
            let up_card = Card::from(up);
            optimal_action(&hand.cards, Some(&up_card), capabilities)
        });
        Self { shape, actions }
    }

    pub fn action_against(&self, dealer: Rank) -> Option<Action> {
        let dealer_value = dealer.value();
        DEALER_UP_CARDS
            .iter()
            .position(|up| up.value() == dealer_value)
            .map(|i| self.actions[i])
    }
}

/// Basic strategy reference table built from synthetic two-card hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyChart {
    pub capabilities: Capabilities,
    pub hard: Vec<ChartRow>,
    pub soft: Vec<ChartRow>,
    pub pairs: Vec<ChartRow>,
}

impl StrategyChart {
    pub fn build(capabilities: Capabilities) -> Self {
        let hard = (5..=20)
            .map(|total| ChartRow::build(HandShape::Hard(total), capabilities))
            .collect();
        let soft = (13..=20)
            .map(|total| ChartRow::build(HandShape::Soft(total), capabilities))
            .collect();
        let pairs = DEALER_UP_CARDS
            .iter()
            .map(|&rank| ChartRow::build(HandShape::Pair(rank), capabilities))
            .collect();

        Self {
            capabilities,
            hard,
            soft,
            pairs,
        }
    }

    pub fn lookup(&self, shape: HandShape, dealer: Rank) -> Option<Action> {
        // Ten-valued pairs share the Ten row
        let shape = match shape {
            HandShape::Pair(rank) if rank.value() == 10 => HandShape::Pair(Rank::Ten),
            other => other,
        };
        self.rows()
            .find(|row| row.shape == shape)
            .and_then(|row| row.action_against(dealer))
    }

    pub fn rows(&self) -> impl Iterator<Item = &ChartRow> {
        self.hard.iter().chain(self.soft.iter()).chain(self.pairs.iter())
    }

    /// Text grid with one letter per cell: H, S, D, P or R.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let header: String = DEALER_UP_CARDS
            .iter()
            .map(|up| format!("{:>3}", up.label()))
            .collect();

        for (title, rows) in [("Hard", &self.hard), ("Soft", &self.soft), ("Pairs", &self.pairs)] {
            out.push_str(&format!("{title:<10}{header}\n"));
            for row in rows {
                let cells: String =
                    row.actions.iter().map(|a| format!("{:>3}", a.code())).collect();
                out.push_str(&format!("{:<10}{cells}\n", row.shape.to_string()));
            }
            out.push('\n');
        }

        out
    }
}
