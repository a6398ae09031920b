use thiserror::Error;

use crate::strategy::Action;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown card rank: {0}")]
    UnknownRank(String),
    #[error("Payout ratio denominator cannot be zero")]
    ZeroDenominator,
    #[error("Invalid payout ratio '{0}', expected N:D (e.g. 5:2)")]
    InvalidPayoutRatio(String),
    #[error("Invalid bet: {0}")]
    InvalidBet(f64),
    #[error("Insufficient bankroll: need {needed}, have {available}")]
    InsufficientBankroll { needed: f64, available: f64 },
    #[error("{0} not allowed for the current hand")]
    ActionNotAllowed(Action),
    #[error("No hand left to play")]
    RoundComplete,
    #[error("Card supply exhausted")]
    SupplyExhausted,
}

pub type Result<T> = std::result::Result<T, Error>;
