//! Red pencil promotion rules.

use core::str::FromStr;

use chrono::Duration;
use rust_decimal::Decimal;

use redpencil_core::{DomainError, DomainResult, Money};

use crate::promotion::PromotionPeriod;

/// Tunable promotion rules.
///
/// `Default` yields the canonical red pencil rules: a markdown of 5% to 30%
/// (inclusive) on a price that has been stable for 30 days, running for 30
/// days, with a 30 day cooldown after the previous promotion ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionPolicy {
    /// Smallest markdown, in percent, that starts a promotion.
    pub min_discount_percent: Decimal,
    /// Largest markdown, in percent, allowed to start or keep a promotion.
    pub max_discount_percent: Decimal,
    pub promotion_length: Duration,
    /// How long a price must stay unchanged before a markdown qualifies.
    pub stability_window: Duration,
    /// Gap required between the end of one promotion and the start of the next.
    pub cooldown: Duration,
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self {
            min_discount_percent: Decimal::from(5),
            max_discount_percent: Decimal::from(30),
            promotion_length: PromotionPeriod::natural_length(),
            stability_window: Duration::days(30),
            cooldown: Duration::days(30),
        }
    }
}

impl PromotionPolicy {
    pub const ENV_MIN_DISCOUNT_PERCENT: &'static str = "REDPENCIL_MIN_DISCOUNT_PERCENT";
    pub const ENV_MAX_DISCOUNT_PERCENT: &'static str = "REDPENCIL_MAX_DISCOUNT_PERCENT";
    pub const ENV_PROMOTION_DAYS: &'static str = "REDPENCIL_PROMOTION_DAYS";
    pub const ENV_STABILITY_DAYS: &'static str = "REDPENCIL_STABILITY_DAYS";
    pub const ENV_COOLDOWN_DAYS: &'static str = "REDPENCIL_COOLDOWN_DAYS";

    /// Longest accepted promotion length, stability window or cooldown.
    pub const MAX_WINDOW_DAYS: i64 = 36_500;

    pub fn max_window() -> Duration {
        Duration::days(Self::MAX_WINDOW_DAYS)
    }

    pub fn with_discount_range(mut self, min_percent: Decimal, max_percent: Decimal) -> Self {
        self.min_discount_percent = min_percent;
        self.max_discount_percent = max_percent;
        self
    }

    pub fn with_promotion_length(mut self, length: Duration) -> Self {
        self.promotion_length = length;
        self
    }

    pub fn with_stability_window(mut self, window: Duration) -> Self {
        self.stability_window = window;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Load rules from `REDPENCIL_*` environment variables.
    ///
    /// Unset variables keep their default; unparsable ones are rejected.
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PromotionPolicy::from_env`] over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let policy = Self {
            min_discount_percent: parse_or(
                &lookup,
                Self::ENV_MIN_DISCOUNT_PERCENT,
                defaults.min_discount_percent,
            )?,
            max_discount_percent: parse_or(
                &lookup,
                Self::ENV_MAX_DISCOUNT_PERCENT,
                defaults.max_discount_percent,
            )?,
            promotion_length: days_or(&lookup, Self::ENV_PROMOTION_DAYS, defaults.promotion_length)?,
            stability_window: days_or(&lookup, Self::ENV_STABILITY_DAYS, defaults.stability_window)?,
            cooldown: days_or(&lookup, Self::ENV_COOLDOWN_DAYS, defaults.cooldown)?,
        };

        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.min_discount_percent < Decimal::ZERO {
            return Err(DomainError::invalid_argument("minimum discount cannot be negative"));
        }
        if self.max_discount_percent >= Decimal::ONE_HUNDRED {
            return Err(DomainError::invalid_argument("maximum discount must be below 100%"));
        }
        if self.min_discount_percent > self.max_discount_percent {
            return Err(DomainError::invalid_argument(format!(
                "minimum discount ({}%) exceeds maximum discount ({}%)",
                self.min_discount_percent, self.max_discount_percent
            )));
        }
        for (name, duration) in [
            ("promotion length", self.promotion_length),
            ("stability window", self.stability_window),
            ("cooldown", self.cooldown),
        ] {
            if duration < Duration::zero() {
                return Err(DomainError::invalid_argument(format!("{name} cannot be negative")));
            }
            if duration > Self::max_window() {
                return Err(DomainError::invalid_argument(format!(
                    "{name} cannot exceed {} days",
                    Self::MAX_WINDOW_DAYS
                )));
            }
        }
        Ok(())
    }

    /// Lowest price, as a percent of the reference, still inside the band (70).
    pub fn lowest_price_percent(&self) -> Decimal {
        Decimal::ONE_HUNDRED - self.max_discount_percent
    }

    /// Highest price, as a percent of the reference, still inside the band (95).
    pub fn highest_price_percent(&self) -> Decimal {
        Decimal::ONE_HUNDRED - self.min_discount_percent
    }

    /// Whether `new_price` is a markdown of `reference` within the allowed depth.
    ///
    /// Both bounds are inclusive.
    pub fn discount_in_range(&self, new_price: Money, reference: Money) -> DomainResult<bool> {
        Ok(new_price.is_at_least_percent_of(self.lowest_price_percent(), reference)?
            && new_price.is_at_most_percent_of(self.highest_price_percent(), reference)?)
    }

    /// Whether `new_price` cuts deeper into `baseline` than the maximum discount.
    pub fn exceeds_max_discount(&self, new_price: Money, baseline: Money) -> DomainResult<bool> {
        Ok(!new_price.is_at_least_percent_of(self.lowest_price_percent(), baseline)?)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> DomainResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| DomainError::invalid_argument(format!("{key}={raw}: {e}"))),
    }
}

fn days_or<F>(lookup: &F, key: &str, default: Duration) -> DomainResult<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(_) => {
            let days: i64 = parse_or(lookup, key, 0)?;
            Duration::try_days(days)
                .ok_or_else(|| DomainError::invalid_argument(format!("{key}: {days} days is out of range")))
        }
    }
}
