//! `redpencil-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, monetary values, the clock capability and the aggregate
//! execution contract.

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod money;
pub mod value_object;

pub use aggregate::Aggregate;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{DomainError, DomainResult};
pub use money::Money;
pub use value_object::ValueObject;
