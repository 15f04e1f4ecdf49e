//! Monetary value object.
//!
//! `Money` wraps a `rust_decimal::Decimal` normalized to two fraction digits
//! with banker's rounding (round-half-to-even), the usual convention for
//! currency arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Non-negative monetary amount with exactly two fraction digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    /// Fraction digits kept on every amount.
    pub const CURRENCY_SCALE: u32 = 2;

    /// Fraction digits kept on the ratio computed by [`Money::percent_of`].
    pub const DIVISION_SCALE: u32 = 4;

    /// Rounding applied to amounts and ratios alike.
    pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointNearestEven;

    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Build a `Money` from a decimal amount.
    ///
    /// Fails with `InvalidArgument` for negative amounts; otherwise rounds
    /// half-even to two fraction digits.
    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DomainError::invalid_argument(format!(
                "money must be non-negative (got {amount})"
            )));
        }

        let mut normalized = amount.round_dp_with_strategy(Self::CURRENCY_SCALE, Self::ROUNDING);
        // round_dp never widens the scale; pad so 100 displays as 100.00.
        normalized.rescale(Self::CURRENCY_SCALE);
        Ok(Self(normalized))
    }

    /// Build a `Money` from a binary floating point value.
    ///
    /// The float is converted using its shortest decimal representation
    /// before rounding, so `75.1` becomes `75.10` rather than `75.09`.
    pub fn from_f64(amount: f64) -> DomainResult<Self> {
        let decimal = Decimal::from_f64(amount).ok_or_else(|| {
            DomainError::invalid_argument(format!("{amount} is not a representable amount"))
        })?;
        Self::new(decimal)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `|a - b|` as a new `Money`.
    pub fn absolute_difference(a: Money, b: Money) -> Money {
        // Both operands are non-negative with scale 2, so the difference is too.
        Money((a.0 - b.0).abs())
    }

    /// `(self / base) * 100`, with the ratio rounded half-even to four
    /// fraction digits before scaling.
    pub fn percent_of(&self, base: Money) -> DomainResult<Decimal> {
        if base.is_zero() {
            return Err(DomainError::DivisionByZero);
        }
        let ratio = self
            .0
            .checked_div(base.0)
            .ok_or_else(|| DomainError::overflow(format!("{self} / {base}")))?
            .round_dp_with_strategy(Self::DIVISION_SCALE, Self::ROUNDING);
        ratio
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| DomainError::overflow(format!("{self} as a percent of {base}")))
    }

    /// True when `self` is at least `percent`% of `base` (inclusive).
    pub fn is_at_least_percent_of(&self, percent: Decimal, base: Money) -> DomainResult<bool> {
        Ok(self.percent_of(base)? >= percent)
    }

    /// True when `self` is at most `percent`% of `base` (inclusive).
    pub fn is_at_most_percent_of(&self, percent: Decimal, base: Money) -> DomainResult<bool> {
        Ok(self.percent_of(base)? <= percent)
    }

    pub fn is_less_than(&self, other: Money) -> bool {
        *self < other
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::invalid_argument(format!("money '{s}': {e}")))?;
        Money::new(decimal)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
