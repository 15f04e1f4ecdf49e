use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use redpencil_core::{Aggregate, Clock, DomainError, DomainResult, Money, SystemClock};
use redpencil_events::{Event, EventEnvelope};

use crate::policy::PromotionPolicy;
use crate::promotion::PromotionPeriod;

/// Command: ChangePrice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePrice {
    pub new_price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TimelineOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineOpened {
    pub initial_price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PromotionStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionStarted {
    /// Pre-discount price that later markdowns are measured against.
    pub baseline_price: Money,
    pub promoted_price: Money,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Why a promotion was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionEndReason {
    /// The price went up or was set to the same value.
    PriceRaised,
    /// The price fell further than the maximum discount off the baseline.
    DiscountTooDeep,
}

/// Event: PromotionEnded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionEnded {
    pub reason: PromotionEndReason,
    pub new_baseline: Money,
    pub ended_at: DateTime<Utc>,
}

/// Event: PriceChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceChanged {
    pub previous_price: Money,
    pub new_price: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceTimelineEvent {
    TimelineOpened(TimelineOpened),
    PromotionStarted(PromotionStarted),
    PromotionEnded(PromotionEnded),
    PriceChanged(PriceChanged),
}

impl Event for PriceTimelineEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PriceTimelineEvent::TimelineOpened(_) => "products.timeline.opened",
            PriceTimelineEvent::PromotionStarted(_) => "products.promotion.started",
            PriceTimelineEvent::PromotionEnded(_) => "products.promotion.ended",
            PriceTimelineEvent::PriceChanged(_) => "products.price.changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PriceTimelineEvent::TimelineOpened(e) => e.occurred_at,
            PriceTimelineEvent::PromotionStarted(e) => e.started_at,
            PriceTimelineEvent::PromotionEnded(e) => e.ended_at,
            PriceTimelineEvent::PriceChanged(e) => e.occurred_at,
        }
    }
}

/// Aggregate root: one product's price history and red pencil state.
///
/// Every price change flows through [`PriceTimeline::set_price`], which decides
/// the promotion transition (end first, then start) and records it as events.
/// Queries such as [`PriceTimeline::is_promoted`] are pure reads against the
/// clock; natural expiry needs no mutation.
///
/// A timeline is single-writer. Wrap it in a lock if several callers share it.
#[derive(Debug, Clone)]
pub struct PriceTimeline<C: Clock = SystemClock> {
    clock: C,
    policy: PromotionPolicy,
    current_price: Money,
    baseline_price: Money,
    last_changed_at: DateTime<Utc>,
    current_promotion: PromotionPeriod,
    history: Vec<EventEnvelope<PriceTimelineEvent>>,
    version: u64,
}

impl<C: Clock> PriceTimeline<C> {
    /// Open a timeline at `initial_price`, stamped with `clock.now()`, under the
    /// default rules.
    ///
    /// The product starts inside a cooldown, as if a promotion had just ended,
    /// so no markdown qualifies during its first 30 days.
    pub fn create(initial_price: Money, clock: C) -> Self {
        let now = clock.now();
        Self::open(initial_price, clock, PromotionPolicy::default(), now)
    }

    /// Like [`PriceTimeline::create`] with custom rules.
    pub fn with_policy(initial_price: Money, clock: C, policy: PromotionPolicy) -> DomainResult<Self> {
        policy.validate()?;
        let now = clock.now();
        Ok(Self::open(initial_price, clock, policy, now))
    }

    /// Rehydrate a timeline from its recorded events.
    ///
    /// The first event must be `TimelineOpened` and no other may be.
    pub fn replay<I>(clock: C, policy: PromotionPolicy, events: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = PriceTimelineEvent>,
    {
        policy.validate()?;
        let mut events = events.into_iter();

        let opened = match events.next() {
            Some(PriceTimelineEvent::TimelineOpened(e)) => e,
            _ => {
                return Err(DomainError::invalid_state(
                    "price history must start with TimelineOpened",
                ));
            }
        };

        let mut timeline = Self::open(opened.initial_price, clock, policy, opened.occurred_at);
        for event in events {
            if matches!(event, PriceTimelineEvent::TimelineOpened(_)) {
                return Err(DomainError::invalid_state("timeline opened twice"));
            }
            timeline.apply(&event);
        }
        Ok(timeline)
    }

    fn open(initial_price: Money, clock: C, policy: PromotionPolicy, at: DateTime<Utc>) -> Self {
        let mut timeline = Self {
            clock,
            policy,
            current_price: initial_price,
            baseline_price: initial_price,
            last_changed_at: at,
            current_promotion: PromotionPeriod::grace(at),
            history: Vec::new(),
            version: 0,
        };
        timeline.apply(&PriceTimelineEvent::TimelineOpened(TimelineOpened {
            initial_price,
            occurred_at: at,
        }));
        timeline
    }

    pub fn price(&self) -> Money {
        self.current_price
    }

    pub fn price_update_time(&self) -> DateTime<Utc> {
        self.last_changed_at
    }

    pub fn policy(&self) -> &PromotionPolicy {
        &self.policy
    }

    /// The latest promotion period (possibly the construction grace period).
    pub fn current_promotion(&self) -> &PromotionPeriod {
        &self.current_promotion
    }

    pub fn history(&self) -> &[EventEnvelope<PriceTimelineEvent>] {
        &self.history
    }

    /// Every price the product has had, oldest first, with the instant it was set.
    pub fn price_history(&self) -> impl Iterator<Item = (DateTime<Utc>, Money)> + '_ {
        self.history.iter().filter_map(|envelope| {
            let event = envelope.payload();
            let price = match event {
                PriceTimelineEvent::TimelineOpened(e) => e.initial_price,
                PriceTimelineEvent::PriceChanged(e) => e.new_price,
                _ => return None,
            };
            Some((event.occurred_at(), price))
        })
    }

    pub fn is_promoted(&self) -> bool {
        self.is_promoted_at(self.clock.now())
    }

    pub fn is_promoted_at(&self, now: DateTime<Utc>) -> bool {
        self.current_promotion.is_active(now)
    }

    /// Reference price for discount depth: frozen while promoted, otherwise the
    /// current price.
    pub fn baseline_price(&self) -> Money {
        self.baseline_price_at(self.clock.now())
    }

    pub fn baseline_price_at(&self, now: DateTime<Utc>) -> Money {
        if self.is_promoted_at(now) {
            self.baseline_price
        } else {
            self.current_price
        }
    }

    /// Change the price at `clock.now()`.
    pub fn set_price(&mut self, new_price: Money) -> DomainResult<()> {
        let now = self.clock.now();
        self.set_price_at(new_price, now).map(|_| ())
    }

    /// Change the price at an explicit instant, returning the recorded events.
    ///
    /// On error nothing is recorded.
    pub fn set_price_at(
        &mut self,
        new_price: Money,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<PriceTimelineEvent>> {
        let command = ChangePrice {
            new_price,
            occurred_at: now,
        };
        let events = redpencil_events::execute(self, &command)?;

        for event in &events {
            match event {
                PriceTimelineEvent::PromotionStarted(e) => info!(
                    baseline = %e.baseline_price,
                    price = %e.promoted_price,
                    ends_at = %e.ends_at,
                    "red pencil promotion started"
                ),
                PriceTimelineEvent::PromotionEnded(e) => info!(
                    reason = ?e.reason,
                    baseline = %e.new_baseline,
                    at = %e.ended_at,
                    "red pencil promotion ended early"
                ),
                _ => debug!(
                    event_type = event.event_type(),
                    schema_version = event.version(),
                    at = %event.occurred_at(),
                    "price timeline event"
                ),
            }
        }
        Ok(events)
    }
}

impl<C: Clock> Aggregate for PriceTimeline<C> {
    type Command = ChangePrice;
    type Event = PriceTimelineEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            PriceTimelineEvent::TimelineOpened(e) => {
                self.current_price = e.initial_price;
                self.baseline_price = e.initial_price;
                self.last_changed_at = e.occurred_at;
                self.current_promotion = PromotionPeriod::grace(e.occurred_at);
            }
            PriceTimelineEvent::PromotionStarted(e) => {
                self.baseline_price = e.baseline_price;
                self.current_promotion =
                    PromotionPeriod::start_with_length(e.started_at, e.ends_at - e.started_at);
            }
            PriceTimelineEvent::PromotionEnded(e) => {
                self.current_promotion.end_at(e.ended_at);
                self.baseline_price = e.new_baseline;
            }
            PriceTimelineEvent::PriceChanged(e) => {
                self.current_price = e.new_price;
                self.last_changed_at = e.occurred_at;
                if !self.current_promotion.is_active(e.occurred_at) {
                    self.baseline_price = e.new_price;
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
        self.history
            .push(EventEnvelope::next(self.version, event.clone()));
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let now = command.occurred_at;
        let new_price = command.new_price;
        let mut events = Vec::with_capacity(2);

        // Ending takes priority: a change that breaks the running promotion
        // never restarts one in the same call.
        if self.current_promotion.is_active(now) {
            if let Some(reason) = self.breach_reason(new_price)? {
                events.push(PriceTimelineEvent::PromotionEnded(PromotionEnded {
                    reason,
                    new_baseline: new_price,
                    ended_at: now,
                }));
            }
        } else if self.qualifies_for_promotion(new_price, now)? {
            events.push(PriceTimelineEvent::PromotionStarted(PromotionStarted {
                baseline_price: self.current_price,
                promoted_price: new_price,
                started_at: now,
                ends_at: now
                    .checked_add_signed(self.policy.promotion_length)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            }));
        }

        events.push(PriceTimelineEvent::PriceChanged(PriceChanged {
            previous_price: self.current_price,
            new_price,
            occurred_at: now,
        }));
        Ok(events)
    }
}

impl<C: Clock> PriceTimeline<C> {
    fn breach_reason(&self, new_price: Money) -> DomainResult<Option<PromotionEndReason>> {
        if new_price >= self.current_price {
            return Ok(Some(PromotionEndReason::PriceRaised));
        }
        if self.policy.exceeds_max_discount(new_price, self.baseline_price)? {
            return Ok(Some(PromotionEndReason::DiscountTooDeep));
        }
        Ok(None)
    }

    fn qualifies_for_promotion(&self, new_price: Money, now: DateTime<Utc>) -> DomainResult<bool> {
        if new_price >= self.current_price {
            return Ok(false);
        }
        let stable = now
            .checked_sub_signed(self.policy.stability_window)
            .is_some_and(|cutoff| self.last_changed_at <= cutoff);
        if !stable {
            debug!(last_changed_at = %self.last_changed_at, "price not stable long enough");
            return Ok(false);
        }
        if !self.current_promotion.cooldown_over(now, self.policy.cooldown) {
            debug!(
                previous_end = %self.current_promotion.ends_at(),
                "previous promotion still cooling down"
            );
            return Ok(false);
        }
        // No markdown can be measured against a free product.
        if self.current_price.is_zero() {
            debug!("zero price never qualifies");
            return Ok(false);
        }

        let in_range = self.policy.discount_in_range(new_price, self.current_price)?;
        if !in_range {
            debug!(price = %new_price, reference = %self.current_price, "discount outside band");
        }
        Ok(in_range)
    }
}
