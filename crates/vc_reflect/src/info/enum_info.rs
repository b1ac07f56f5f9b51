use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::Reflect;

// -----------------------------------------------------------------------------
// VariantInfo

/// Name and discriminant of a field-less enum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantInfo {
    name: &'static str,
    discriminant: i64,
}

impl VariantInfo {
    /// Creates a new [`VariantInfo`].
    #[inline]
    pub const fn new(name: &'static str, discriminant: i64) -> Self {
        Self { name, discriminant }
    }

    /// Returns the variant name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the discriminant value.
    #[inline]
    pub const fn discriminant(&self) -> i64 {
        self.discriminant
    }
}

// -----------------------------------------------------------------------------
// EnumInfo

/// Type information of a field-less enum.
pub struct EnumInfo {
    variants: Box<[VariantInfo]>,
    from_index: fn(usize) -> Option<Box<dyn Reflect>>,
}

impl EnumInfo {
    /// Creates a new [`EnumInfo`], `from_index` builds the variant at the
    /// given declaration index.
    pub fn new(
        variants: Vec<VariantInfo>,
        from_index: fn(usize) -> Option<Box<dyn Reflect>>,
    ) -> Self {
        Self {
            variants: variants.into_boxed_slice(),
            from_index,
        }
    }

    /// Returns the variants in declaration order.
    #[inline]
    pub fn variants(&self) -> &[VariantInfo] {
        &self.variants
    }

    /// Returns the index of the variant called `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_reflect::{derive::Reflect, info::Typed};
    ///
    /// #[derive(Reflect)]
    /// enum Mode { Fast, Slow }
    ///
    /// let info = Mode::type_info().as_enum().unwrap();
    /// assert_eq!(info.index_of_name("Slow", true), Some(1));
    /// assert_eq!(info.index_of_name("slow", true), None);
    /// assert_eq!(info.index_of_name("slow", false), Some(1));
    /// ```
    pub fn index_of_name(&self, name: &str, case_sensitive: bool) -> Option<usize> {
        self.variants.iter().position(|v| {
            if case_sensitive {
                v.name == name
            } else {
                v.name.eq_ignore_ascii_case(name)
            }
        })
    }

    /// Returns the index of the variant with the given discriminant.
    #[inline]
    pub fn index_of_discriminant(&self, discriminant: i64) -> Option<usize> {
        self.variants
            .iter()
            .position(|v| v.discriminant == discriminant)
    }

    /// Builds the variant at `index`.
    #[inline]
    pub fn build(&self, index: usize) -> Option<Box<dyn Reflect>> {
        (self.from_index)(index)
    }
}

impl fmt::Debug for EnumInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.variants.iter()).finish()
    }
}
