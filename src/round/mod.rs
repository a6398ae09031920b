use serde::{Deserialize, Serialize};

use crate::resolve::{resolve_seats, sanitize_amount, RoundResult, Seat};
use crate::strategy::{optimal_action, Action, Capabilities};
use crate::{Card, CardSupply, Error, Hand, Result, RoundConfig};

/// Split hands included
pub const MAX_HANDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandStatus {
    Active,
    Stood,
    Doubled,
    Busted,
    Surrendered,
}

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    PlayerTurn,
    DealerTurn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerHand {
    pub hand: Hand,
    pub bet: f64,
    pub status: HandStatus,
}

impl PlayerHand {
    fn new(hand: Hand, bet: f64) -> Self {
        Self {
            hand,
            bet,
            status: HandStatus::Active,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status != HandStatus::Active
    }
}

/// Everything the engine needs to advise on a decision, frozen at the
/// moment it was asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionPoint {
    pub hand: Hand,
    pub up_card: Option<Card>,
    pub capabilities: Capabilities,
}

/// One player's round. Each action leaves `self` untouched and returns the
/// next state, so a failed action never corrupts the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub hands: Vec<PlayerHand>,
    pub dealer_hand: Hand,
    /// Money off the table; open bets are already deducted
    pub bankroll: f64,
    pub active_hand_index: usize,
    pub split: bool,
}

impl RoundState {
    /// Place the opening bet against an already dealt hand.
    pub fn open(bankroll: f64, bet: f64, player_hand: Hand, dealer_hand: Hand) -> Result<Self> {
        if !bet.is_finite() || bet <= 0.0 {
            return Err(Error::InvalidBet(bet));
        }
        let bankroll = sanitize_amount(bankroll);
        if bet > bankroll {
            return Err(Error::InsufficientBankroll {
                needed: bet,
                available: bankroll,
            });
        }

        let mut state = Self {
            hands: vec![PlayerHand::new(player_hand, bet)],
            dealer_hand,
            bankroll: bankroll - bet,
            active_hand_index: 0,
            split: false,
        };
        state.advance();
        Ok(state)
    }

    pub fn phase(&self) -> RoundPhase {
        if self.active_hand().is_some() {
            RoundPhase::PlayerTurn
        } else {
            RoundPhase::DealerTurn
        }
    }

    pub fn active_hand(&self) -> Option<&PlayerHand> {
        self.hands
            .get(self.active_hand_index)
            .filter(|h| h.status == HandStatus::Active)
    }

    pub fn up_card(&self) -> Option<&Card> {
        self.dealer_hand.first()
    }

    pub fn bets(&self) -> Vec<f64> {
        self.hands.iter().map(|h| h.bet).collect()
    }

    pub fn capabilities(&self, config: &RoundConfig) -> Capabilities {
        let Some(active) = self.active_hand() else {
            return Capabilities::none();
        };

        let two_cards = active.hand.len() == 2;
        let covers_bet = self.bankroll >= active.bet;

        Capabilities {
            can_double: two_cards && covers_bet,
            can_split: active.hand.is_pair() && covers_bet && self.hands.len() < MAX_HANDS,
            // No surrender after a split
            can_surrender: config.surrender_allowed && self.hands.len() == 1 && two_cards,
        }
    }

    pub fn decision_point(&self, config: &RoundConfig) -> Option<DecisionPoint> {
        let active = self.active_hand()?;
        Some(DecisionPoint {
            hand: active.hand.clone(),
            up_card: self.up_card().copied(),
            capabilities: self.capabilities(config),
        })
    }

    /// Basic strategy for the active hand
    pub fn advise(&self, config: &RoundConfig) -> Option<Action> {
        let point = self.decision_point(config)?;
        Some(optimal_action(
            &point.hand.cards,
            point.up_card.as_ref(),
            point.capabilities,
        ))
    }

    pub fn apply<S: CardSupply + ?Sized>(
        &self,
        action: Action,
        config: &RoundConfig,
        supply: &mut S,
    ) -> Result<Self> {
        match action {
            Action::Hit => self.hit(supply),
            Action::Stand => self.stand(),
            Action::Double => self.double(config, supply),
            Action::Split => self.split(config, supply),
            Action::Surrender => self.surrender(config),
        }
    }

    pub fn hit<S: CardSupply + ?Sized>(&self, supply: &mut S) -> Result<Self> {
        let index = self.require_active()?;
        let mut next = self.clone();
        let card = supply.draw().ok_or(Error::SupplyExhausted)?;
        next.hands[index].hand.add_card(card);
        next.advance();
        Ok(next)
    }

    pub fn stand(&self) -> Result<Self> {
        let index = self.require_active()?;
        let mut next = self.clone();
        next.hands[index].status = HandStatus::Stood;
        next.advance();
        Ok(next)
    }

    /// Double only this hand's bet, take exactly one card, and stand.
    pub fn double<S: CardSupply + ?Sized>(
        &self,
        config: &RoundConfig,
        supply: &mut S,
    ) -> Result<Self> {
        let index = self.require_active()?;
        if !self.capabilities(config).can_double {
            return Err(Error::ActionNotAllowed(Action::Double));
        }

        let mut next = self.clone();
        let card = supply.draw().ok_or(Error::SupplyExhausted)?;
        let entry = &mut next.hands[index];
        next.bankroll -= entry.bet;
        entry.bet *= 2.0;
        entry.hand.add_card(card);
        entry.status = if entry.hand.is_busted() {
            HandStatus::Busted
        } else {
            HandStatus::Doubled
        };
        next.advance();
        Ok(next)
    }

    /// Move the second card into a new hand with a matching bet, then deal
    /// one card to each. Split aces get one card each and stand.
    pub fn split<S: CardSupply + ?Sized>(
        &self,
        config: &RoundConfig,
        supply: &mut S,
    ) -> Result<Self> {
        let index = self.require_active()?;
        if !self.capabilities(config).can_split {
            return Err(Error::ActionNotAllowed(Action::Split));
        }
        // Both cards or neither
        if supply.remaining().is_some_and(|n| n < 2) {
            return Err(Error::SupplyExhausted);
        }

        let mut next = self.clone();
        let original = &mut next.hands[index];
        let second = original.hand.cards.pop().ok_or(Error::ActionNotAllowed(Action::Split))?;
        let bet = original.bet;
        let aces = second.is_ace();

        original.hand.add_card(supply.draw().ok_or(Error::SupplyExhausted)?);
        let mut new_hand = Hand::from_cards(vec![second]);
        new_hand.add_card(supply.draw().ok_or(Error::SupplyExhausted)?);

        next.hands.push(PlayerHand::new(new_hand, bet));
        next.bankroll -= bet;
        next.split = true;

        if aces {
            next.hands[index].status = HandStatus::Stood;
            if let Some(last) = next.hands.last_mut() {
                last.status = HandStatus::Stood;
            }
        }

        log::debug!("split hand {index} into {} hands", next.hands.len());
        next.advance();
        Ok(next)
    }

    /// Give up the hand and take half the stake back immediately.
    pub fn surrender(&self, config: &RoundConfig) -> Result<Self> {
        let index = self.require_active()?;
        if !self.capabilities(config).can_surrender {
            return Err(Error::ActionNotAllowed(Action::Surrender));
        }

        let mut next = self.clone();
        let entry = &mut next.hands[index];
        next.bankroll += entry.bet / 2.0;
        entry.status = HandStatus::Surrendered;
        next.advance();
        Ok(next)
    }

    /// Play out the dealer and settle. Hands still active stand where they are.
    pub fn resolve<S: CardSupply + ?Sized>(
        self,
        config: &RoundConfig,
        supply: &mut S,
    ) -> RoundResult {
        let seats: Vec<Seat<'_>> = self
            .hands
            .iter()
            .map(|h| Seat {
                cards: &h.hand.cards,
                bet: h.bet,
                surrendered: h.status == HandStatus::Surrendered,
            })
            .collect();

        let initial_deal = !self.split && self.hands.len() == 1 && self.hands[0].hand.len() == 2;
        resolve_seats(
            &seats,
            initial_deal,
            self.dealer_hand.clone(),
            self.bankroll,
            config,
            supply,
        )
    }

    fn require_active(&self) -> Result<usize> {
        self.active_hand()
            .map(|_| self.active_hand_index)
            .ok_or(Error::RoundComplete)
    }

    /// Close out a busted or 21 hand and move to the next playable one.
    fn advance(&mut self) {
        while let Some(entry) = self.hands.get_mut(self.active_hand_index) {
            if entry.status == HandStatus::Active {
                match entry.hand.total() {
                    22.. => entry.status = HandStatus::Busted,
                    21 => entry.status = HandStatus::Stood,
                    _ => return,
                }
            }
            self.active_hand_index += 1;
        }
    }
}

#[cfg(test)]
mod tests;
