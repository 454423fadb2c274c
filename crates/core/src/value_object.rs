//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, construct a new one. Constructors are expected to enforce the
/// object's invariants, so holding a value object means holding valid data.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Slug(String);
///
/// impl ValueObject for Slug {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
