//! A single red pencil promotion window.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use redpencil_core::{DomainError, DomainResult};

/// Lifecycle of one promotion: `[started_at, ends_at)`.
///
/// `ends_at` starts at the natural end and can only be pulled earlier by
/// [`PromotionPeriod::end_now`], never pushed later or before `started_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionPeriod {
    started_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

impl PromotionPeriod {
    /// Natural promotion length and the default gap required between promotions.
    pub const NATURAL_LENGTH_DAYS: i64 = 30;

    pub fn natural_length() -> Duration {
        Duration::days(Self::NATURAL_LENGTH_DAYS)
    }

    /// Start a promotion at `now` that ends naturally 30 days later.
    pub fn start(now: DateTime<Utc>) -> Self {
        Self::start_with_length(now, Self::natural_length())
    }

    /// Start a promotion at `now` running for `length`.
    ///
    /// Negative lengths are clamped to zero; an end past the calendar limit
    /// saturates at it.
    pub fn start_with_length(now: DateTime<Utc>, length: Duration) -> Self {
        Self {
            started_at: now,
            ends_at: now
                .checked_add_signed(length.max(Duration::zero()))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// A zero-length period that is already over at `now`.
    ///
    /// New products carry one of these so the cooldown rule also covers the
    /// first days after creation.
    pub fn grace(now: DateTime<Utc>) -> Self {
        Self {
            started_at: now,
            ends_at: now,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.ends_at
    }

    /// Force the promotion to end at `now`.
    ///
    /// Besides rejecting an inactive period, this also rejects a `now` before
    /// `started_at`, which would break `started_at <= ends_at`.
    pub fn end_now(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_active(now) {
            return Err(DomainError::invalid_state(
                "attempting to end a promotion that is already over",
            ));
        }
        if now < self.started_at {
            return Err(DomainError::invalid_state(
                "attempting to end a promotion before it started",
            ));
        }
        self.end_at(now);
        Ok(())
    }

    /// Unchecked variant used when replaying an already-decided end.
    pub(crate) fn end_at(&mut self, at: DateTime<Utc>) {
        self.ends_at = at.clamp(self.started_at, self.ends_at);
    }

    /// True once 30 days have passed since this period ended.
    pub fn grace_period_over(&self, now: DateTime<Utc>) -> bool {
        self.cooldown_over(now, Self::natural_length())
    }

    /// True once `cooldown` has passed since this period ended (inclusive).
    ///
    /// A cutoff before the calendar start is never over.
    pub fn cooldown_over(&self, now: DateTime<Utc>, cooldown: Duration) -> bool {
        now.checked_sub_signed(cooldown)
            .is_some_and(|cutoff| self.ends_at <= cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn start_runs_for_thirty_days() {
        let period = PromotionPeriod::start(t0());
        assert_eq!(period.started_at(), t0());
        assert_eq!(period.ends_at(), t0() + Duration::days(30));
    }

    #[test]
    fn is_active_until_natural_end() {
        let period = PromotionPeriod::start(t0());
        assert!(period.is_active(t0()));
        assert!(period.is_active(t0() + Duration::days(30) - Duration::seconds(1)));
        assert!(!period.is_active(t0() + Duration::days(30)));
    }

    #[test]
    fn end_now_shortens_the_period() {
        let mut period = PromotionPeriod::start(t0());
        let at = t0() + Duration::days(4);
        period.end_now(at).unwrap();
        assert_eq!(period.ends_at(), at);
        assert!(!period.is_active(at));
    }

    #[test]
    fn end_now_rejects_inactive_period() {
        let mut period = PromotionPeriod::start(t0());
        let err = period.end_now(t0() + Duration::days(31)).unwrap_err();
        match err {
            DomainError::InvalidState(_) => {}
            _ => panic!("Expected InvalidState for ending an expired promotion"),
        }
        assert_eq!(period.ends_at(), t0() + Duration::days(30));
    }

    #[test]
    fn end_now_rejects_instant_before_start() {
        let mut period = PromotionPeriod::start(t0());
        assert!(period.end_now(t0() - Duration::days(1)).is_err());
        assert_eq!(period.ends_at(), t0() + Duration::days(30));
    }

    #[test]
    fn end_at_never_extends() {
        let mut period = PromotionPeriod::start(t0());
        period.end_at(t0() + Duration::days(45));
        assert_eq!(period.ends_at(), t0() + Duration::days(30));
    }

    #[test]
    fn grace_period_is_never_active() {
        let grace = PromotionPeriod::grace(t0());
        assert!(!grace.is_active(t0()));
        assert!(!grace.grace_period_over(t0() + Duration::days(29)));
        assert!(grace.grace_period_over(t0() + Duration::days(30)));
    }

    #[test]
    fn cooldown_is_measured_from_forced_end() {
        let mut period = PromotionPeriod::start(t0());
        let ended = t0() + Duration::days(10);
        period.end_now(ended).unwrap();

        assert!(!period.grace_period_over(ended + Duration::days(30) - Duration::seconds(1)));
        assert!(period.grace_period_over(ended + Duration::days(30)));
    }

    #[test]
    fn calendar_limits_do_not_panic() {
        let late = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        assert_eq!(PromotionPeriod::start(late).ends_at(), DateTime::<Utc>::MAX_UTC);

        let early = PromotionPeriod::grace(DateTime::<Utc>::MIN_UTC);
        assert!(!early.cooldown_over(DateTime::<Utc>::MIN_UTC + Duration::days(1), Duration::days(30)));
    }

    #[test]
    fn custom_cooldown_is_respected() {
        let period = PromotionPeriod::grace(t0());
        assert!(!period.cooldown_over(t0() + Duration::days(6), Duration::days(7)));
        assert!(period.cooldown_over(t0() + Duration::days(7), Duration::days(7)));
    }
}
