use crate::Reflect;
use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to compile-time type information.
///
/// Automatically implemented by [`#[derive(Reflect)]`](crate::derive::Reflect),
/// allowing access to type information without an instance of the type.
///
/// # Examples
///
/// ```
/// use vc_reflect::{derive::Reflect, info::{Typed, TypeInfo}};
///
/// #[derive(Reflect, Default)]
/// struct A { /* ... */ }
///
/// let info: &'static TypeInfo = <A as Typed>::type_info();
/// ```
///
/// # Manually Impl
///
/// [`NonGenericTypeInfoCell`] and [`GenericTypeInfoCell`] cache the leaked
/// [`TypeInfo`]:
///
/// ```
/// use vc_reflect::{
///     Reflect,
///     impls::NonGenericTypeInfoCell,
///     info::{PrimitiveInfo, PrimitiveKind, TypeInfo, TypeKind, Typed},
///     ops::{Primitive, PrimitiveRef, ReflectRef},
/// };
///
/// #[derive(Default)]
/// struct Meters(f64);
///
/// impl Typed for Meters {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| {
///             let kind = PrimitiveInfo::new(PrimitiveKind::F64, |p| match p {
///                 Primitive::Float(v) => Some(Box::new(Meters(v)) as Box<dyn Reflect>),
///                 _ => None,
///             });
///             TypeInfo::new::<Self>("demo::Meters", "Meters", TypeKind::Primitive(kind))
///                 .with_default::<Self>()
///         })
///     }
/// }
///
/// impl Reflect for Meters {
///     fn reflect_type_info(&self) -> &'static TypeInfo {
///         Self::type_info()
///     }
///     fn reflect_ref(&self) -> ReflectRef<'_> {
///         ReflectRef::Primitive(PrimitiveRef::Float(self.0))
///     }
/// }
///
/// assert_eq!(Meters::type_info().name(), "Meters");
/// ```
///
/// [`NonGenericTypeInfoCell`]: crate::impls::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::impls::GenericTypeInfoCell
pub trait Typed: Reflect {
    /// A static accessor to compile-time type information.
    fn type_info() -> &'static TypeInfo;
}
