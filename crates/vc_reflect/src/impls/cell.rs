//! Containers for static storage of type information.
//!
//! This is usually used to implement [`Typed`](crate::info::Typed).
//!
//! ## NonGenericTypeInfoCell
//!
//! For non generic types. Internally an [`OnceLock`], almost no additional
//! expense.
//!
//! ## GenericTypeInfoCell
//!
//! The `static CELL` inside a generic function is shared by every
//! instantiation, so the cell maps each [`TypeId`] to its own leaked
//! [`TypeInfo`] (a [`TypeCache`]).
//!
//! [`TypeId`]: core::any::TypeId

use core::any::{Any, TypeId};
use std::sync::OnceLock;

use vc_utils::TypeCache;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// NonGenericTypeInfoCell

/// Container for static storage of non-generic type information.
///
/// # Example
///
/// ```
/// use vc_reflect::{
///     Reflect,
///     impls::NonGenericTypeInfoCell,
///     info::{RecordInfo, TypeInfo, TypeKind, Typed},
///     ops::ReflectRef,
/// };
///
/// #[derive(Default)]
/// struct Marker;
///
/// impl Typed for Marker {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| {
///             let kind = TypeKind::Record(RecordInfo::new(Vec::new()));
///             TypeInfo::new::<Self>("demo::Marker", "Marker", kind).with_default::<Self>()
///         })
///     }
/// }
/// # impl Reflect for Marker {
/// #     fn reflect_type_info(&self) -> &'static TypeInfo { Self::type_info() }
/// #     fn reflect_ref(&self) -> ReflectRef<'_> { ReflectRef::Record(self) }
/// # }
///
/// assert!(core::ptr::eq(Marker::type_info(), Marker::type_info()));
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, initializing it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeInfoCell

/// Container for static storage of generic type information.
///
/// # Example
///
/// ```
/// use vc_reflect::{
///     Reflect,
///     impls::GenericTypeInfoCell,
///     info::{RecordInfo, TypeInfo, TypeKind, Typed},
///     ops::ReflectRef,
/// };
///
/// #[derive(Default)]
/// struct Tagged<T>(core::marker::PhantomData<T>);
///
/// impl<T: Typed> Typed for Tagged<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| {
///             let name = format!("Tagged<{}>", T::type_info().name());
///             let kind = TypeKind::Record(RecordInfo::new(Vec::new()));
///             TypeInfo::new::<Self>(format!("demo::{name}"), name, kind)
///                 .with_generics(&[T::type_info])
///         })
///     }
/// }
/// # impl<T: Typed> Reflect for Tagged<T> {
/// #     fn reflect_type_info(&self) -> &'static TypeInfo { Self::type_info() }
/// #     fn reflect_ref(&self) -> ReflectRef<'_> { ReflectRef::Record(self) }
/// # }
///
/// assert_eq!(Tagged::<u8>::type_info().name(), "Tagged<u8>");
/// assert_eq!(Tagged::<bool>::type_info().name(), "Tagged<bool>");
/// ```
pub struct GenericTypeInfoCell(TypeCache<TypeInfo>);

impl GenericTypeInfoCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(TypeCache::new())
    }

    /// Returns the info of `G`, initializing it with `f` on first access.
    ///
    /// `f` runs outside the lock: building `Vec<Vec<u8>>` asks the same cell
    /// for `Vec<u8>`.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(
        &self,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        match self.0.get(type_id) {
            Some(info) => info,
            None => self.0.insert(type_id, f()),
        }
    }
}
