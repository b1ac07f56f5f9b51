use alloc::string::String;
use alloc::vec::Vec;

use chrono::{DateTime, Utc};

// -----------------------------------------------------------------------------
// Primitive

/// An owned primitive leaf.
///
/// Narrow integers are widened to 64 bits, `f32` to `f64`. 128-bit integers
/// keep their own variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Bool(bool),
    Int(i64),
    UInt(u64),
    BigInt(i128),
    BigUInt(u128),
    Float(f64),
    Char(char),
    Str(String),
    Bytes(Vec<u8>),
    DateTime(DateTime<Utc>),
}

impl Primitive {
    /// Borrows this primitive as a [`PrimitiveRef`].
    pub fn as_primitive_ref(&self) -> PrimitiveRef<'_> {
        match self {
            Self::Bool(v) => PrimitiveRef::Bool(*v),
            Self::Int(v) => PrimitiveRef::Int(*v),
            Self::UInt(v) => PrimitiveRef::UInt(*v),
            Self::BigInt(v) => PrimitiveRef::BigInt(*v),
            Self::BigUInt(v) => PrimitiveRef::BigUInt(*v),
            Self::Float(v) => PrimitiveRef::Float(*v),
            Self::Char(v) => PrimitiveRef::Char(*v),
            Self::Str(v) => PrimitiveRef::Str(v),
            Self::Bytes(v) => PrimitiveRef::Bytes(v),
            Self::DateTime(v) => PrimitiveRef::DateTime(*v),
        }
    }
}

// -----------------------------------------------------------------------------
// PrimitiveRef

/// A borrowed primitive leaf, returned by [`ReflectRef::Primitive`].
///
/// [`ReflectRef::Primitive`]: crate::ops::ReflectRef::Primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveRef<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    BigInt(i128),
    BigUInt(u128),
    Float(f64),
    Char(char),
    Str(&'a str),
    Bytes(&'a [u8]),
    DateTime(DateTime<Utc>),
}

impl PrimitiveRef<'_> {
    /// Copies the borrowed data into an owned [`Primitive`].
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_reflect::ops::{Primitive, PrimitiveRef};
    ///
    /// assert_eq!(PrimitiveRef::Str("a").to_primitive(), Primitive::Str("a".into()));
    /// ```
    pub fn to_primitive(self) -> Primitive {
        match self {
            Self::Bool(v) => Primitive::Bool(v),
            Self::Int(v) => Primitive::Int(v),
            Self::UInt(v) => Primitive::UInt(v),
            Self::BigInt(v) => Primitive::BigInt(v),
            Self::BigUInt(v) => Primitive::BigUInt(v),
            Self::Float(v) => Primitive::Float(v),
            Self::Char(v) => Primitive::Char(v),
            Self::Str(v) => Primitive::Str(v.into()),
            Self::Bytes(v) => Primitive::Bytes(v.into()),
            Self::DateTime(v) => Primitive::DateTime(v),
        }
    }
}
