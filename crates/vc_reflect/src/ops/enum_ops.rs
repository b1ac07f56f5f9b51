use crate::Reflect;

/// A field-less enum value.
pub trait Enum: Reflect {
    /// Returns the name of the current variant.
    fn variant_name(&self) -> &'static str;

    /// Returns the discriminant of the current variant.
    fn discriminant(&self) -> i64;
}
