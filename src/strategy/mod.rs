use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hand::{hand_total, is_pair, is_soft};
use crate::{Card, Rank};

mod chart;

pub use chart::{ChartRow, StrategyChart, DEALER_UP_CARDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
    Surrender,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Hit,
        Action::Stand,
        Action::Double,
        Action::Split,
        Action::Surrender,
    ];

    /// Single-letter chart code
    pub fn code(&self) -> char {
        match self {
            Action::Hit => 'H',
            Action::Stand => 'S',
            Action::Double => 'D',
            Action::Split => 'P',
            Action::Surrender => 'R',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Hit => "hit",
            Action::Stand => "stand",
            Action::Double => "double",
            Action::Split => "split",
            Action::Surrender => "surrender",
        };
        f.write_str(name)
    }
}

/// What the caller's game state currently permits. Not validated here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    pub can_double: bool,
    pub can_split: bool,
    pub can_surrender: bool,
}

impl Capabilities {
    pub const fn all() -> Self {
        Self {
            can_double: true,
            can_split: true,
            can_surrender: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            can_double: false,
            can_split: false,
            can_surrender: false,
        }
    }
}

/// Get the optimal action based on basic strategy.
///
/// Pairs are considered before soft and hard totals; an unsplit pair falls
/// through to the total-based rules. A missing up-card or an empty hand
/// yields [`Action::Hit`].
pub fn optimal_action(
    player_cards: &[Card],
    dealer_up_card: Option<&Card>,
    capabilities: Capabilities,
) -> Action {
    let Some(up_card) = dealer_up_card else {
        return Action::Hit;
    };
    if player_cards.is_empty() {
        return Action::Hit;
    }

    let dealer = up_card.value();

    if capabilities.can_split
        && is_pair(player_cards)
        && should_split(player_cards[0].rank, dealer)
    {
        return Action::Split;
    }

    let total = hand_total(player_cards);
    if is_soft(player_cards) {
        soft_action(total, dealer, capabilities.can_double)
    } else {
        let can_surrender = capabilities.can_surrender && player_cards.len() == 2;
        hard_action(total, dealer, capabilities.can_double, can_surrender)
    }
}

fn should_split(rank: Rank, dealer: u8) -> bool {
    match rank {
        Rank::Ace | Rank::Eight => true,
        Rank::Nine => !matches!(dealer, 7 | 10 | 11),
        Rank::Seven | Rank::Two | Rank::Three => dealer <= 7,
        Rank::Six => dealer <= 6,
        Rank::Four => matches!(dealer, 5 | 6),
        // Fives and tens play on their totals
        _ => false,
    }
}

fn soft_action(total: u8, dealer: u8, can_double: bool) -> Action {
    match total {
        19.. => Action::Stand,
        18 if can_double && (3..=6).contains(&dealer) => Action::Double,
        18 if dealer >= 9 => Action::Hit,
        18 => Action::Stand,
        17 if can_double && (3..=6).contains(&dealer) => Action::Double,
        15 | 16 if can_double && (4..=6).contains(&dealer) => Action::Double,
        13 | 14 if can_double && (5..=6).contains(&dealer) => Action::Double,
        _ => Action::Hit,
    }
}

fn hard_action(total: u8, dealer: u8, can_double: bool, can_surrender: bool) -> Action {
    match total {
        17.. => Action::Stand,
        13..=16 if dealer <= 6 => Action::Stand,
        12 if (4..=6).contains(&dealer) => Action::Stand,
        11 if can_double => Action::Double,
        10 if can_double && dealer <= 9 => Action::Double,
        9 if can_double && (3..=6).contains(&dealer) => Action::Double,
        16 if can_surrender && dealer >= 9 => Action::Surrender,
        15 if can_surrender && dealer == 10 => Action::Surrender,
        _ => Action::Hit,
    }
}
