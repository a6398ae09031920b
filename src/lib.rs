mod card;
mod dealer;
mod error;
mod hand;
mod resolve;
mod round;
mod rules;
mod shoe;
pub mod scenario;
pub mod strategy;

pub use card::{Card, Rank, Suit};
pub use dealer::{
    dealer_should_hit, play_dealer, CardSupply, DealerPlay, DealerState, StackedSupply,
};
pub use error::{Error, Result};
pub use hand::{hand_total, is_busted, is_natural, is_pair, is_soft, Hand, HandOutcome, HandShape};
pub use resolve::{resolve_round, settle_hand, RoundResult, Settlement};
pub use round::{DecisionPoint, HandStatus, PlayerHand, RoundPhase, RoundState, MAX_HANDS};
pub use rules::{PayoutRatio, RoundConfig};
pub use scenario::{Recorder, ScenarioDelta, ScenarioKey, ScenarioStat, ScenarioStore};
pub use shoe::Shoe;
pub use strategy::{optimal_action, Action, Capabilities, StrategyChart};
