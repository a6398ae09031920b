use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Card, Rank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandOutcome {
    Win,
    Loss,
    Push,
    Blackjack,
    Bust,
    Surrender,
}

/// Total plus the number of aces still counted as 11 after demotion.
fn evaluate(cards: &[Card]) -> (u16, u8) {
    let mut total: u16 = 0;
    let mut aces: u8 = 0;

    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        total += card.value() as u16;
    }

    // Demote aces from 11 to 1 until the hand stops busting
    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    (total, aces)
}

/// Calculate the value of a blackjack hand. An empty hand is worth 0.
pub fn hand_total(cards: &[Card]) -> u8 {
    let (total, _) = evaluate(cards);
    total.min(u8::MAX as u16) as u8
}

/// Check if a hand is soft (an ace is still counted as 11)
pub fn is_soft(cards: &[Card]) -> bool {
    let (_, soft_aces) = evaluate(cards);
    soft_aces > 0
}

/// Exactly two cards of identical rank. K-K is a pair, K-Q is not.
pub fn is_pair(cards: &[Card]) -> bool {
    cards.len() == 2 && cards[0].rank == cards[1].rank
}

/// Two-card 21
pub fn is_natural(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_total(cards) == 21
}

pub fn is_busted(cards: &[Card]) -> bool {
    hand_total(cards) > 21
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Spades of the given ranks. Suits never matter to valuation or strategy.
    pub fn from_ranks(ranks: &[Rank]) -> Self {
        Self {
            cards: ranks.iter().copied().map(Card::from).collect(),
        }
    }

    pub fn total(&self) -> u8 {
        hand_total(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft(&self.cards)
    }

    pub fn is_pair(&self) -> bool {
        is_pair(&self.cards)
    }

    pub fn is_natural(&self) -> bool {
        is_natural(&self.cards)
    }

    pub fn is_busted(&self) -> bool {
        is_busted(&self.cards)
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn first(&self) -> Option<&Card> {
        self.cards.first()
    }
}

/// Strategy-relevant shape of a hand. Different cards with the same shape
/// compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum HandShape {
    Pair(Rank),
    Soft(u8),
    Hard(u8),
}

impl HandShape {
    pub fn of(cards: &[Card]) -> Self {
        if is_pair(cards) {
            HandShape::Pair(cards[0].rank)
        } else if is_soft(cards) {
            HandShape::Soft(hand_total(cards))
        } else {
            HandShape::Hard(hand_total(cards))
        }
    }

    /// Smallest hand with this shape, for keying into the strategy chart.
    /// Soft totals clamp to 13..=21 and hard totals to 5..=21: hard 4 and
    /// soft 12 only exist as the pairs 2-2 and A-A.
    pub fn synthetic_hand(&self) -> Hand {
        match *self {
            HandShape::Pair(rank) => Hand::from_ranks(&[rank, rank]),
            HandShape::Soft(total) => {
                let kicker = total.clamp(13, 21) - 11;
                Hand::from_ranks(&[Rank::Ace, Rank::from_value(kicker).unwrap_or(Rank::Ace)])
            }
            HandShape::Hard(total) => match total.clamp(5, 21) {
                // Two ten-valued cards of different rank so it is not a pair
                20 => Hand::from_ranks(&[Rank::Ten, Rank::King]),
                21 => Hand::from_ranks(&[Rank::Ten, Rank::King, Rank::Ace]),
                total => {
                    let high = (total - 2).min(10);
                    let low = total - high;
                    Hand::from_ranks(&[
                        Rank::from_value(low).unwrap_or(Rank::Two),
                        Rank::from_value(high).unwrap_or(Rank::Ten),
                    ])
                }
            },
        }
    }

    pub fn total(&self) -> u8 {
        match *self {
            HandShape::Pair(rank) => hand_total(&Hand::from_ranks(&[rank, rank]).cards),
            HandShape::Soft(total) | HandShape::Hard(total) => total,
        }
    }
}

impl fmt::Display for HandShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandShape::Pair(rank) => write!(f, "pair:{}", rank),
            HandShape::Soft(total) => write!(f, "soft:{}", total),
            HandShape::Hard(total) => write!(f, "hard:{}", total),
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(Card::to_display).collect();
        write!(f, "[{}] ({})", cards.join(" "), self.total())
    }
}
