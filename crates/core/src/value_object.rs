//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; two value objects with the same values
//! are equal. In this workspace the reporting period and the computed ledger
//! rows are value objects, while units, items and storages are entities.

/// Marker for immutable domain values compared by their attributes.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Period { start: DateTime<Utc>, end: DateTime<Utc> }
///
/// impl ValueObject for Period {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
