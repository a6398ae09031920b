use super::*;
use crate::Rank::*;
use crate::{HandOutcome, Rank, StackedSupply};

fn supply(ranks: &[Rank]) -> StackedSupply {
    StackedSupply::new(ranks.iter().map(|&r| Card::from(r)))
}

fn open(player: &[Rank], dealer: &[Rank]) -> RoundState {
    RoundState::open(1000.0, 25.0, Hand::from_ranks(player), Hand::from_ranks(dealer)).unwrap()
}

#[test]
fn test_open_deducts_bet() {
    let state = open(&[Ten, Six], &[Nine, Seven]);
    assert_eq!(state.bankroll, 975.0);
    assert_eq!(state.bets(), vec![25.0]);
    assert_eq!(state.phase(), RoundPhase::PlayerTurn);
    assert_eq!(state.up_card().map(|c| c.rank), Some(Nine));
}

#[test]
fn test_open_rejects_bad_bets() {
    let hand = || Hand::from_ranks(&[Ten, Six]);
    assert_eq!(
        RoundState::open(100.0, 0.0, hand(), hand()),
        Err(Error::InvalidBet(0.0))
    );
    assert!(RoundState::open(100.0, f64::NAN, hand(), hand()).is_err());
    assert_eq!(
        RoundState::open(10.0, 25.0, hand(), hand()),
        Err(Error::InsufficientBankroll {
            needed: 25.0,
            available: 10.0
        })
    );
}

#[test]
fn test_natural_ends_player_turn() {
    let state = open(&[Ace, King], &[Nine, Seven]);
    assert_eq!(state.phase(), RoundPhase::DealerTurn);
    assert_eq!(state.advise(&RoundConfig::default()), None);
    assert_eq!(state.hit(&mut supply(&[Two])), Err(Error::RoundComplete));
}

#[test]
fn test_capabilities() {
    let config = RoundConfig::default();
    let caps = open(&[Eight, Eight], &[Ten, Seven]).capabilities(&config);
    assert_eq!(caps, Capabilities::all());

    let caps = open(&[Ten, Six], &[Ten, Seven]).capabilities(&RoundConfig::no_surrender());
    assert!(caps.can_double);
    assert!(!caps.can_split);
    assert!(!caps.can_surrender);
}

#[test]
fn test_cannot_double_without_bankroll() {
    let player = Hand::from_ranks(&[Six, Five]);
    let state = RoundState::open(30.0, 25.0, player, Hand::from_ranks(&[Ten, Seven])).unwrap();
    let caps = state.capabilities(&RoundConfig::default());
    assert!(!caps.can_double);
    assert_eq!(
        state.double(&RoundConfig::default(), &mut supply(&[Ten])),
        Err(Error::ActionNotAllowed(Action::Double))
    );
}

#[test]
fn test_hit_then_bust_ends_turn() {
    let state = open(&[Ten, Six], &[Ten, Seven]);
    let state = state.hit(&mut supply(&[King])).unwrap();
    assert_eq!(state.hands[0].status, HandStatus::Busted);
    assert_eq!(state.phase(), RoundPhase::DealerTurn);
}

#[test]
fn test_hit_reaching_21_stands() {
    let state = open(&[Ten, Six], &[Ten, Seven]);
    let state = state.hit(&mut supply(&[Five])).unwrap();
    assert_eq!(state.hands[0].status, HandStatus::Stood);
}

#[test]
fn test_three_card_hand_cannot_double_or_surrender() {
    let state = open(&[Two, Three], &[Ten, Seven]).hit(&mut supply(&[Four])).unwrap();
    let caps = state.capabilities(&RoundConfig::default());
    assert!(!caps.can_double);
    assert!(!caps.can_surrender);
}

#[test]
fn test_failed_action_leaves_state_untouched() {
    let state = open(&[Ten, Six], &[Ten, Seven]);
    assert_eq!(state.hit(&mut StackedSupply::empty()), Err(Error::SupplyExhausted));
    assert_eq!(state.hands[0].hand.len(), 2);
    assert_eq!(state.bankroll, 975.0);
}

#[test]
fn test_double_mutates_only_that_bet() {
    let config = RoundConfig::default();
    let state = open(&[Six, Five], &[Ten, Seven]);
    let state = state.double(&config, &mut supply(&[Nine])).unwrap();
    assert_eq!(state.hands[0].bet, 50.0);
    assert_eq!(state.hands[0].status, HandStatus::Doubled);
    assert_eq!(state.hands[0].hand.len(), 3);
    assert_eq!(state.bankroll, 950.0);

    let result = state.resolve(&config, &mut StackedSupply::empty());
    assert_eq!(result.outcomes[0].outcome, HandOutcome::Win);
    assert_eq!(result.outcomes[0].payout, 100.0);
    assert_eq!(result.bankroll, 1050.0);
}

#[test]
fn test_split_appends_seeded_bet() {
    let config = RoundConfig::default();
    let state = open(&[Eight, Eight], &[Ten, Seven]);
    let state = state.split(&config, &mut supply(&[Three, King])).unwrap();

    assert_eq!(state.hands.len(), 2);
    assert_eq!(state.bets(), vec![25.0, 25.0]);
    assert_eq!(state.bankroll, 950.0);
    assert!(state.split);
    assert_eq!(state.hands[0].hand.total(), 11);
    assert_eq!(state.hands[1].hand.total(), 18);
    assert_eq!(state.active_hand_index, 0);
    // Surrender is gone once split
    assert!(!state.capabilities(&config).can_surrender);
}

#[test]
fn test_double_after_split_only_touches_active_bet() {
    let config = RoundConfig::default();
    let state = open(&[Eight, Eight], &[Ten, Seven])
        .split(&config, &mut supply(&[Three, King]))
        .unwrap()
        .double(&config, &mut supply(&[Ten]))
        .unwrap();
    assert_eq!(state.bets(), vec![50.0, 25.0]);
    assert_eq!(state.active_hand_index, 1);
    assert_eq!(state.bankroll, 925.0);
}

#[test]
fn test_split_aces_stand_after_one_card() {
    let config = RoundConfig::default();
    let state = open(&[Ace, Ace], &[Ten, Seven]);
    let state = state.split(&config, &mut supply(&[King, Five])).unwrap();
    assert_eq!(state.hands[0].status, HandStatus::Stood);
    assert_eq!(state.hands[1].status, HandStatus::Stood);
    assert_eq!(state.phase(), RoundPhase::DealerTurn);

    // Split 21 settles as a plain win
    let result = state.resolve(&config, &mut StackedSupply::empty());
    assert_eq!(result.outcomes[0].outcome, HandOutcome::Win);
    assert_eq!(result.outcomes[0].payout, 50.0);
    assert_eq!(result.outcomes[1].outcome, HandOutcome::Loss);
}

#[test]
fn test_split_limit() {
    let config = RoundConfig::default();
    let mut state = open(&[Eight, Eight], &[Ten, Seven]);
    for _ in 0..3 {
        state = state.split(&config, &mut supply(&[Eight, Two])).unwrap();
    }
    assert_eq!(state.hands.len(), MAX_HANDS);
    assert!(!state.capabilities(&config).can_split);
    assert_eq!(
        state.split(&config, &mut supply(&[Eight, Two])),
        Err(Error::ActionNotAllowed(Action::Split))
    );
}

#[test]
fn test_surrender_refunds_half() {
    let config = RoundConfig::default();
    let state = open(&[Ten, Six], &[Ten, Seven]);
    let state = state.surrender(&config).unwrap();
    assert_eq!(state.bankroll, 987.5);
    assert_eq!(state.hands[0].status, HandStatus::Surrendered);

    let mut cards = supply(&[Two]);
    let result = state.resolve(&config, &mut cards);
    assert_eq!(result.outcomes[0].outcome, HandOutcome::Surrender);
    assert_eq!(result.outcomes[0].payout, 0.0);
    assert_eq!(result.bankroll, 987.5);
    // Nothing left to play for, dealer keeps two cards
    assert_eq!(cards.len(), 1);
}

#[test]
fn test_surrender_not_allowed_by_rules() {
    let state = open(&[Ten, Six], &[Ten, Seven]);
    assert_eq!(
        state.surrender(&RoundConfig::no_surrender()),
        Err(Error::ActionNotAllowed(Action::Surrender))
    );
}

#[test]
fn test_advise_uses_capabilities() {
    let config = RoundConfig::default();
    let state = open(&[Ten, Six], &[Ten, Seven]);
    assert_eq!(state.advise(&config), Some(Action::Surrender));
    assert_eq!(state.advise(&RoundConfig::no_surrender()), Some(Action::Hit));

    let point = state.decision_point(&config).unwrap();
    assert_eq!(point.hand.total(), 16);
    assert_eq!(point.up_card.map(|c| c.rank), Some(Ten));
}

#[test]
fn test_apply_dispatches() {
    let config = RoundConfig::default();
    let state = open(&[Ten, Two], &[Six, Seven]);
    let state = state.apply(Action::Stand, &config, &mut StackedSupply::empty()).unwrap();
    assert_eq!(state.hands[0].status, HandStatus::Stood);
    assert_eq!(
        state.apply(Action::Hit, &config, &mut supply(&[Two])),
        Err(Error::RoundComplete)
    );
}

#[test]
fn test_natural_through_round_state() {
    let config = RoundConfig::default();
    let player = Hand::from_ranks(&[Ace, King]);
    let state = RoundState::open(1000.0, 25.0, player, Hand::from_ranks(&[Six, Nine])).unwrap();
    let result = state.resolve(&config, &mut StackedSupply::empty());
    assert_eq!(result.outcomes[0].outcome, HandOutcome::Blackjack);
    assert_eq!(result.bankroll, 1037.5);
}

#[test]
fn test_split_with_one_card_left_keeps_supply() {
    let config = RoundConfig::default();
    let state = open(&[Eight, Eight], &[Ten, Seven]);
    let mut cards = supply(&[Three]);

    assert_eq!(state.split(&config, &mut cards), Err(Error::SupplyExhausted));
    assert_eq!(cards.len(), 1);
    assert_eq!(state.hands.len(), 1);
}
