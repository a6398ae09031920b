use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{Card, CardSupply};

/// Enough cards for the longest possible single-player round with splits.
pub const DEFAULT_CUT_CARD: usize = 52;

/// Shuffled multi-deck shoe.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: Vec<Card>,
    num_decks: u8,
    cut_card: usize,
}

impl Shoe {
    pub fn new<R: Rng + ?Sized>(num_decks: u8, rng: &mut R) -> Self {
        let num_decks = num_decks.max(1);
        let mut cards: Vec<Card> = (0..num_decks as usize)
            .flat_map(|_| (0..52).filter_map(Card::from_index))
            .collect();
        cards.shuffle(rng);
        // Drawn from the back
        Self {
            cards,
            num_decks,
            cut_card: DEFAULT_CUT_CARD.min(num_decks as usize * 26),
        }
    }

    /// Reproducible shoe for simulations and tests
    pub fn seeded(num_decks: u8, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::new(num_decks, &mut rng)
    }

    pub fn with_cut_card(mut self, cut_card: usize) -> Self {
        self.cut_card = cut_card;
        self
    }

    pub fn num_decks(&self) -> u8 {
        self.num_decks
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// True once the cut card is reached; reshuffle before the next round.
    pub fn needs_reshuffle(&self) -> bool {
        self.cards.len() < self.cut_card
    }
}

impl CardSupply for Shoe {
    fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.cards.len())
    }
}
