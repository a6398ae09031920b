use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{Card, Hand, RoundConfig};

/// Sequential source of cards. `None` means the supply is exhausted.
pub trait CardSupply {
    fn draw(&mut self) -> Option<Card>;

    /// Cards left, when the supply knows
    fn remaining(&self) -> Option<usize> {
        None
    }
}

impl<S: CardSupply + ?Sized> CardSupply for &mut S {
    fn draw(&mut self) -> Option<Card> {
        (**self).draw()
    }

    fn remaining(&self) -> Option<usize> {
        (**self).remaining()
    }
}

/// Pre-supplied, finite run of cards drawn front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackedSupply {
    cards: VecDeque<Card>,
}

impl StackedSupply {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardSupply for StackedSupply {
    fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.cards.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealerState {
    Drawing,
    Done,
}

/// Dealer draws below 17, and on soft 17 when the rules say so.
pub fn dealer_should_hit(cards: &[Card], config: &RoundConfig) -> bool {
    let value = crate::hand_total(cards);
    if value < 17 {
        return true;
    }
    value == 17 && config.dealer_hits_soft_17 && crate::is_soft(cards)
}

/// Forced dealer play, one draw per [`DealerPlay::step`].
#[derive(Debug, Clone)]
pub struct DealerPlay {
    hand: Hand,
    state: DealerState,
    config: RoundConfig,
}

impl DealerPlay {
    pub fn new(hand: Hand, config: RoundConfig) -> Self {
        let state = if dealer_should_hit(&hand.cards, &config) {
            DealerState::Drawing
        } else {
            DealerState::Done
        };
        Self {
            hand,
            state,
            config,
        }
    }

    pub fn state(&self) -> DealerState {
        self.state
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    /// Draw at most one card and re-evaluate. An empty supply ends play.
    pub fn step<S: CardSupply + ?Sized>(&mut self, supply: &mut S) -> DealerState {
        if self.state == DealerState::Done {
            return self.state;
        }

        match supply.draw() {
            Some(card) => {
                self.hand.add_card(card);
                log::debug!("dealer draws {card}, total {}", self.hand.total());
                if !dealer_should_hit(&self.hand.cards, &self.config) {
                    self.state = DealerState::Done;
                }
            }
            None => {
                log::warn!(
                    "card supply exhausted, dealer stops on {}",
                    self.hand.total()
                );
                self.state = DealerState::Done;
            }
        }

        self.state
    }

    pub fn run<S: CardSupply + ?Sized>(mut self, supply: &mut S) -> Hand {
        while self.step(supply) == DealerState::Drawing {}
        log::debug!("dealer done on {}", self.hand);
        self.hand
    }
}

/// Play the dealer's hand to completion.
pub fn play_dealer<S: CardSupply + ?Sized>(
    hand: Hand,
    config: &RoundConfig,
    supply: &mut S,
) -> Hand {
    DealerPlay::new(hand, *config).run(supply)
}
