use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;
use crate::ops::Primitive;

// -----------------------------------------------------------------------------
// PrimitiveKind

/// Concrete leaf type of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Unit,
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    I128,
    U128,
    F32,
    F64,
    Char,
    String,
    Bytes,
    DateTime,
}

impl PrimitiveKind {
    /// Returns `true` for kinds whose JSON literal does not identify them:
    /// 128-bit integers are written as strings, binary blobs as base64 strings.
    #[inline]
    pub const fn is_ambiguous(self) -> bool {
        matches!(self, Self::I128 | Self::U128 | Self::Bytes)
    }

    /// Returns `true` for signed integers up to 64 bits.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::Isize)
    }

    /// Returns `true` for unsigned integers up to 64 bits.
    #[inline]
    pub const fn is_unsigned(self) -> bool {
        matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::Usize)
    }

    /// Returns `true` for `f32` and `f64`.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

// -----------------------------------------------------------------------------
// PrimitiveInfo

/// Type information of a primitive leaf.
///
/// `from_primitive` builds the value from the [`Primitive`] variant matching
/// the kind (`Int` for signed integers, `UInt` for unsigned ones, `BigInt`
/// for `i128`, ...), checking ranges. Any other variant yields `None`.
pub struct PrimitiveInfo {
    kind: PrimitiveKind,
    from_primitive: fn(Primitive) -> Option<Box<dyn Reflect>>,
}

impl PrimitiveInfo {
    /// Creates a new [`PrimitiveInfo`].
    #[inline]
    pub const fn new(
        kind: PrimitiveKind,
        from_primitive: fn(Primitive) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            kind,
            from_primitive,
        }
    }

    /// Returns the [`PrimitiveKind`].
    #[inline]
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Builds a value of this type from a primitive of the matching variant.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_reflect::{info::Typed, ops::Primitive};
    ///
    /// let info = u8::type_info().as_primitive().unwrap();
    ///
    /// assert!(info.build(Primitive::UInt(255)).is_some());
    /// assert!(info.build(Primitive::UInt(256)).is_none());
    /// ```
    #[inline]
    pub fn build(&self, value: Primitive) -> Option<Box<dyn Reflect>> {
        (self.from_primitive)(value)
    }
}

impl fmt::Debug for PrimitiveInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrimitiveInfo").field(&self.kind).finish()
    }
}
