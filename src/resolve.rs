use serde::{Deserialize, Serialize};

use crate::dealer::play_dealer;
use crate::hand::{hand_total, is_natural};
use crate::{Card, CardSupply, Hand, HandOutcome, RoundConfig};

/// Settlement of a single player hand. `payout` is stake-inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub outcome: HandOutcome,
    pub bet: f64,
    pub player_total: u8,
    pub payout: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub bankroll: f64,
    /// One entry per player hand, in input order
    pub outcomes: Vec<Settlement>,
    pub dealer_hand: Hand,
    pub dealer_value: u8,
}

impl RoundResult {
    pub fn total_payout(&self) -> f64 {
        self.outcomes.iter().map(|s| s.payout).sum()
    }
}

/// A player hand as seen by settlement.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Seat<'a> {
    pub cards: &'a [Card],
    pub bet: f64,
    pub surrendered: bool,
}

/// Non-finite or negative amounts count as zero.
pub(crate) fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Play out the dealer and settle every player hand.
///
/// `bankroll` excludes the bets already on the table. Bets pair with hands by
/// index; a missing bet counts as zero. The dealer draws from `supply` until
/// the rules say stop or the supply runs out.
pub fn resolve_round<S: CardSupply + ?Sized>(
    player_hands: &[Hand],
    dealer_hand: Hand,
    bankroll: f64,
    bets: &[f64],
    config: &RoundConfig,
    supply: &mut S,
) -> RoundResult {
    let seats: Vec<Seat<'_>> = player_hands
        .iter()
        .enumerate()
        .map(|(i, hand)| Seat {
            cards: &hand.cards,
            bet: bets.get(i).copied().unwrap_or(0.0),
            surrendered: false,
        })
        .collect();

    let initial_deal = player_hands.len() == 1 && player_hands[0].len() == 2;
    resolve_seats(&seats, initial_deal, dealer_hand, bankroll, config, supply)
}

pub(crate) fn resolve_seats<S: CardSupply + ?Sized>(
    seats: &[Seat<'_>],
    initial_deal: bool,
    dealer_hand: Hand,
    bankroll: f64,
    config: &RoundConfig,
    supply: &mut S,
) -> RoundResult {
    // Only the final sum is clamped; a negative bankroll offsets payouts
    let bankroll = if bankroll.is_finite() { bankroll } else { 0.0 };

    if initial_deal && config.evaluate_naturals {
        let natural = seats
            .first()
            .and_then(|seat| settle_natural(seat, &dealer_hand, bankroll, config));
        if let Some(result) = natural {
            return result;
        }
    }

    let dealer_hand = if !seats.is_empty() && seats.iter().all(|s| s.surrendered) {
        dealer_hand
    } else {
        play_dealer(dealer_hand, config, supply)
    };
    let dealer_value = dealer_hand.total();

    let outcomes: Vec<Settlement> = seats
        .iter()
        .map(|seat| {
            if seat.surrendered {
                // Half the stake went back when the hand was given up
                Settlement {
                    outcome: HandOutcome::Surrender,
                    bet: sanitize_amount(seat.bet),
                    player_total: hand_total(seat.cards),
                    payout: 0.0,
                }
            } else {
                settle_hand(seat.cards, seat.bet, dealer_value)
            }
        })
        .collect();

    finish(bankroll, outcomes, dealer_hand)
}

/// Player natural settles before the dealer draws. Anything else falls
/// through to normal settlement.
fn settle_natural(
    seat: &Seat<'_>,
    dealer_hand: &Hand,
    bankroll: f64,
    config: &RoundConfig,
) -> Option<RoundResult> {
    if seat.surrendered || !is_natural(seat.cards) {
        return None;
    }

    let bet = sanitize_amount(seat.bet);
    let settlement = if dealer_hand.is_natural() {
        Settlement {
            outcome: HandOutcome::Push,
            bet,
            player_total: 21,
            payout: bet,
        }
    } else {
        Settlement {
            outcome: HandOutcome::Blackjack,
            bet,
            player_total: 21,
            payout: config.blackjack_payout.calculate_payout(bet),
        }
    };

    Some(finish(bankroll, vec![settlement], dealer_hand.clone()))
}

/// Normal settlement of one hand against the dealer's final total.
pub fn settle_hand(cards: &[Card], bet: f64, dealer_value: u8) -> Settlement {
    let bet = sanitize_amount(bet);
    let player_total = hand_total(cards);

    let (outcome, payout) = if player_total > 21 {
        (HandOutcome::Bust, 0.0)
    } else if dealer_value > 21 || player_total > dealer_value {
        (HandOutcome::Win, 2.0 * bet)
    } else if player_total < dealer_value {
        (HandOutcome::Loss, 0.0)
    } else {
        (HandOutcome::Push, bet)
    };

    Settlement {
        outcome,
        bet,
        player_total,
        payout,
    }
}

fn finish(bankroll: f64, outcomes: Vec<Settlement>, dealer_hand: Hand) -> RoundResult {
    let payouts: f64 = outcomes.iter().map(|s| s.payout).sum();
    let dealer_value = dealer_hand.total();

    for (i, s) in outcomes.iter().enumerate() {
        log::debug!(
            "hand {i}: {:?} with {} vs dealer {dealer_value}, bet {} pays {}",
            s.outcome,
            s.player_total,
            s.bet,
            s.payout
        );
    }

    RoundResult {
        bankroll: (bankroll + payouts).max(0.0),
        outcomes,
        dealer_hand,
        dealer_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rank::*;
    use crate::{Rank, StackedSupply};

    fn supply(ranks: &[Rank]) -> StackedSupply {
        StackedSupply::new(ranks.iter().map(|&r| Card::from(r)))
    }

    #[test]
    fn test_win_against_drawing_dealer() {
        let mut cards = supply(&[Five, Ten]);
        let result = resolve_round(
            &[Hand::from_ranks(&[Ten, King])],
            Hand::from_ranks(&[Six, Seven]),
            975.0,
            &[25.0],
            &RoundConfig::default(),
            &mut cards,
        );
        assert_eq!(result.dealer_value, 18);
        assert_eq!(result.outcomes[0].outcome, HandOutcome::Win);
        assert_eq!(result.outcomes[0].payout, 50.0);
        assert_eq!(result.bankroll, 1025.0);
    }

    #[test]
    fn test_player_natural_pays_bonus() {
        let mut cards = supply(&[Five]);
        let result = resolve_round(
            &[Hand::from_ranks(&[Ace, King])],
            Hand::from_ranks(&[Six, Nine]),
            975.0,
            &[25.0],
            &RoundConfig::default(),
            &mut cards,
        );
        assert_eq!(result.outcomes[0].outcome, HandOutcome::Blackjack);
        assert_eq!(result.outcomes[0].payout, 62.5);
        assert_eq!(result.bankroll, 1037.5);
        // Dealer never draws against a natural
        assert_eq!(result.dealer_hand.len(), 2);
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn test_both_naturals_push() {
        let result = resolve_round(
            &[Hand::from_ranks(&[Ace, Queen])],
            Hand::from_ranks(&[King, Ace]),
            100.0,
            &[10.0],
            &RoundConfig::default(),
            &mut StackedSupply::empty(),
        );
        assert_eq!(result.outcomes[0].outcome, HandOutcome::Push);
        assert_eq!(result.outcomes[0].payout, 10.0);
        assert_eq!(result.bankroll, 110.0);
    }

    #[test]
    fn test_dealer_natural_beats_two_card_hand() {
        let result = resolve_round(
            &[Hand::from_ranks(&[Ten, Nine])],
            Hand::from_ranks(&[Ace, King]),
            100.0,
            &[10.0],
            &RoundConfig::default(),
            &mut StackedSupply::empty(),
        );
        assert_eq!(result.outcomes[0].outcome, HandOutcome::Loss);
        assert_eq!(result.bankroll, 100.0);
    }

    #[test]
    fn test_naturals_disabled_settle_normally() {
        let config = RoundConfig {
            evaluate_naturals: false,
            ..RoundConfig::default()
        };
        let mut cards = supply(&[Four]);
        let result = resolve_round(
            &[Hand::from_ranks(&[Ace, King])],
            Hand::from_ranks(&[Six, Nine]),
            0.0,
            &[10.0],
            &config,
            &mut cards,
        );
        // Dealer 19, player 21
        assert_eq!(result.outcomes[0].outcome, HandOutcome::Win);
        assert_eq!(result.outcomes[0].payout, 20.0);
    }

    #[test]
    fn test_split_twenty_one_is_not_natural() {
        let mut cards = supply(&[Two]);
        let result = resolve_round(
            &[Hand::from_ranks(&[Ace, King]), Hand::from_ranks(&[Ace, Five])],
            Hand::from_ranks(&[Ten, Seven]),
            0.0,
            &[10.0, 10.0],
            &RoundConfig::default(),
            &mut cards,
        );
        assert_eq!(result.outcomes[0].outcome, HandOutcome::Win);
        assert_eq!(result.outcomes[0].payout, 20.0);
        assert_eq!(result.outcomes[1].outcome, HandOutcome::Loss);
    }

    #[test]
    fn test_multi_card_twenty_one_is_not_natural() {
        let result = resolve_round(
            &[Hand::from_ranks(&[Seven, Seven, Seven])],
            Hand::from_ranks(&[Ten, Eight]),
            0.0,
            &[10.0],
            &RoundConfig::default(),
            &mut StackedSupply::empty(),
        );
        assert_eq!(result.outcomes[0].outcome, HandOutcome::Win);
        assert_eq!(result.outcomes[0].payout, 20.0);
    }

    #[test]
    fn test_bust_loses_even_when_dealer_busts() {
        let mut cards = supply(&[King]);
        let result = resolve_round(
            &[Hand::from_ranks(&[Ten, Six, Nine])],
            Hand::from_ranks(&[Ten, Six]),
            50.0,
            &[10.0],
            &RoundConfig::default(),
            &mut cards,
        );
        assert!(result.dealer_value > 21);
        assert_eq!(result.outcomes[0].outcome, HandOutcome::Bust);
        assert_eq!(result.outcomes[0].payout, 0.0);
        assert_eq!(result.outcomes[0].player_total, 25);
        assert_eq!(result.bankroll, 50.0);
    }

    #[test]
    fn test_push_returns_stake() {
        let result = resolve_round(
            &[Hand::from_ranks(&[Ten, Eight])],
            Hand::from_ranks(&[Nine, Nine]),
            0.0,
            &[15.0],
            &RoundConfig::default(),
            &mut StackedSupply::empty(),
        );
        assert_eq!(result.outcomes[0].outcome, HandOutcome::Push);
        assert_eq!(result.outcomes[0].payout, 15.0);
    }

    #[test]
    fn test_each_hand_uses_its_own_bet() {
        let result = resolve_round(
            &[
                Hand::from_ranks(&[Eight, Ten]),
                Hand::from_ranks(&[Eight, Three, Nine]),
                Hand::from_ranks(&[Eight, Nine]),
            ],
            Hand::from_ranks(&[Ten, Eight]),
            0.0,
            &[10.0, 20.0, 10.0],
            &RoundConfig::default(),
            &mut StackedSupply::empty(),
        );
        let outcomes: Vec<HandOutcome> = result.outcomes.iter().map(|s| s.outcome).collect();
        assert_eq!(outcomes, vec![HandOutcome::Push, HandOutcome::Win, HandOutcome::Loss]);
        assert_eq!(result.total_payout(), 10.0 + 40.0);
    }

    #[test]
    fn test_supply_exhaustion_settles_with_current_total() {
        let result = resolve_round(
            &[Hand::from_ranks(&[Ten, Five])],
            Hand::from_ranks(&[Six, Seven]),
            0.0,
            &[10.0],
            &RoundConfig::default(),
            &mut StackedSupply::empty(),
        );
        assert_eq!(result.dealer_value, 13);
        assert_eq!(result.outcomes[0].outcome, HandOutcome::Win);
    }

    #[test]
    fn test_invalid_bets_count_as_zero() {
        let result = resolve_round(
            &[Hand::from_ranks(&[Ten, Nine]), Hand::from_ranks(&[Ten, Nine])],
            Hand::from_ranks(&[Ten, Seven]),
            10.0,
            &[-5.0],
            &RoundConfig::default(),
            &mut StackedSupply::empty(),
        );
        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.outcomes[0].bet, 0.0);
        assert_eq!(result.outcomes[1].bet, 0.0);
        assert_eq!(result.bankroll, 10.0);
    }

    #[test]
    fn test_bankroll_never_negative() {
        let result = resolve_round(
            &[Hand::from_ranks(&[Ten, Two])],
            Hand::from_ranks(&[Ten, Nine]),
            -40.0,
            &[10.0],
            &RoundConfig::default(),
            &mut StackedSupply::empty(),
        );
        assert_eq!(result.bankroll, 0.0);
    }

    #[test]
    fn test_negative_bankroll_offsets_payout() {
        let result = resolve_round(
            &[Hand::from_ranks(&[Ten, King])],
            Hand::from_ranks(&[Ten, Eight]),
            -40.0,
            &[25.0],
            &RoundConfig::default(),
            &mut StackedSupply::empty(),
        );
        assert_eq!(result.outcomes[0].payout, 50.0);
        assert_eq!(result.bankroll, 10.0);

        let result = resolve_round(
            &[Hand::from_ranks(&[Ten, King])],
            Hand::from_ranks(&[Ten, Eight]),
            f64::NAN,
            &[25.0],
            &RoundConfig::default(),
            &mut StackedSupply::empty(),
        );
        assert_eq!(result.bankroll, 50.0);
    }

    #[test]
    fn test_payout_is_zero_bet_or_double_bet() {
        for dealer in [[Ten, Seven], [Ten, Eight], [Ten, Nine], [Ten, Ten]] {
            let result = resolve_round(
                &[Hand::from_ranks(&[Ten, Eight])],
                Hand::from_ranks(&dealer),
                0.0,
                &[7.0],
                &RoundConfig::default(),
                &mut StackedSupply::empty(),
            );
            let s = result.outcomes[0];
            let expected = match s.outcome {
                HandOutcome::Win => 14.0,
                HandOutcome::Push => 7.0,
                HandOutcome::Loss => 0.0,
                other => panic!("unexpected outcome {other:?}"),
            };
            assert_eq!(s.payout, expected);
        }
    }
}
