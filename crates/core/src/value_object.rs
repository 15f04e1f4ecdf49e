//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new instance from the old one (e.g. `Money::absolute_difference`
/// returns a fresh `Money` rather than adjusting either operand).
///
/// The trait requires:
/// - **Clone**: value objects are values, not references
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: helpful for logging and testing
///
/// ```ignore
/// let a = Money::from_str("10.005")?;
/// let b = Money::from_str("10.00")?;
/// assert_eq!(a, b); // both normalize to 10.00
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
