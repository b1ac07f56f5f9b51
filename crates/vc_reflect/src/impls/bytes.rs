use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

/// A binary blob, reflected as a single primitive leaf rather than a list
/// of `u8`.
///
/// # Examples
///
/// ```
/// use vc_reflect::{Reflect, impls::Bytes, ops::{PrimitiveRef, ReflectRef}};
///
/// let blob = Bytes::from(vec![1_u8, 2]);
/// let ReflectRef::Primitive(PrimitiveRef::Bytes(raw)) = blob.reflect_ref() else {
///     unreachable!()
/// };
/// assert_eq!(raw, &[1, 2]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<Bytes> for Vec<u8> {
    #[inline]
    fn from(value: Bytes) -> Self {
        value.0
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Bytes {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
