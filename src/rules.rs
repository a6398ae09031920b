use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Stake-inclusive payout ratio: a 5:2 ratio returns 2.5x the stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u16,
    pub denominator: u16,
}

impl PayoutRatio {
    /// 3:2 winnings plus the returned stake
    pub const FIVE_TO_TWO: Self = Self {
        numerator: 5,
        denominator: 2,
    };
    /// 6:5 winnings plus the returned stake
    pub const ELEVEN_TO_FIVE: Self = Self {
        numerator: 11,
        denominator: 5,
    };
    /// Even money plus the returned stake
    pub const TWO_TO_ONE: Self = Self {
        numerator: 2,
        denominator: 1,
    };

    pub fn new(numerator: u16, denominator: u16) -> Result<Self> {
        if denominator == 0 {
            return Err(Error::ZeroDenominator);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn multiplier(&self) -> f64 {
        if self.denominator == 0 {
            return 0.0;
        }
        self.numerator as f64 / self.denominator as f64
    }

    pub fn calculate_payout(&self, stake: f64) -> f64 {
        stake * self.multiplier()
    }
}

impl Default for PayoutRatio {
    fn default() -> Self {
        Self::FIVE_TO_TWO
    }
}

/// Parses `N:D`, e.g. `5:2`.
impl FromStr for PayoutRatio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidPayoutRatio(s.to_string());
        let (num, den) = s.split_once(':').ok_or_else(invalid)?;
        let num: u16 = num.trim().parse().map_err(|_| invalid())?;
        let den: u16 = den.trim().parse().map_err(|_| invalid())?;
        Self::new(num, den)
    }
}

/// House rules for one round. Immutable once the round starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Dealer draws on soft 17
    pub dealer_hits_soft_17: bool,

    /// Player may surrender a two-card starting hand
    pub surrender_allowed: bool,

    /// Two-card 21 on an unsplit initial deal settles as a natural
    pub evaluate_naturals: bool,

    /// Stake-inclusive natural payout
    pub blackjack_payout: PayoutRatio,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::vegas_strip()
    }
}

impl RoundConfig {
    /// Dealer stands on all 17s, late surrender, 3:2 naturals
    pub fn vegas_strip() -> Self {
        Self {
            dealer_hits_soft_17: false,
            surrender_allowed: true,
            evaluate_naturals: true,
            blackjack_payout: PayoutRatio::FIVE_TO_TWO,
        }
    }

    /// Dealer hits soft 17
    pub fn h17() -> Self {
        Self {
            dealer_hits_soft_17: true,
            ..Self::vegas_strip()
        }
    }

    pub fn no_surrender() -> Self {
        Self {
            surrender_allowed: false,
            ..Self::vegas_strip()
        }
    }

    /// Hits soft 17 and pays naturals 6:5
    pub fn six_to_five() -> Self {
        Self {
            dealer_hits_soft_17: true,
            surrender_allowed: false,
            evaluate_naturals: true,
            blackjack_payout: PayoutRatio::ELEVEN_TO_FIVE,
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" | "vegas_strip" => Some(Self::vegas_strip()),
            "h17" => Some(Self::h17()),
            "no_surrender" => Some(Self::no_surrender()),
            "six_to_five" => Some(Self::six_to_five()),
            _ => None,
        }
    }
}
