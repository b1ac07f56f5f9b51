use crate::Reflect;
use crate::ops::{DynamicRecord, Enum, List, Map, PrimitiveRef, SharedRef};

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable view of what a reflected value can do.
///
/// Obtained through [`Reflect::reflect_ref`]. Walkers dispatch on this enum
/// with a single `match`.
///
/// - `Nullable(None)` is the null sentinel (`None`, `()`).
/// - `Record`, `Dynamic` and `Opaque` carry the value itself, seen through any
///   `Box<dyn Reflect>` indirection.
pub enum ReflectRef<'a> {
    Primitive(PrimitiveRef<'a>),
    Enum(&'a dyn Enum),
    Nullable(Option<&'a dyn Reflect>),
    Shared(&'a dyn SharedRef),
    Map(&'a dyn Map),
    Dynamic(&'a dyn DynamicRecord),
    List(&'a dyn List),
    Record(&'a dyn Reflect),
    Opaque(&'a dyn Reflect),
}

impl ReflectRef<'_> {
    /// Returns `true` for the null sentinel.
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Nullable(None))
    }

    /// Returns `true` for leaves: primitives and enum values.
    #[inline]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Primitive(_) | Self::Enum(_))
    }
}
