//! Products domain module: price history and red pencil promotions.
//!
//! This crate contains the promotion rules, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). Time only enters
//! through an injected [`redpencil_core::Clock`] or explicit instants.

pub mod policy;
pub mod promotion;
pub mod timeline;

pub use policy::PromotionPolicy;
pub use promotion::PromotionPeriod;
pub use timeline::{
    ChangePrice, PriceChanged, PriceTimeline, PriceTimelineEvent, PromotionEndReason,
    PromotionEnded, PromotionStarted, TimelineOpened,
};
