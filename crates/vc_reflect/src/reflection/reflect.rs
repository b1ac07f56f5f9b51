use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::TypeInfo;
use crate::ops::{DynamicRecord, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// The foundational trait for runtime reflection in [`vc_reflect`].
///
/// Every value the codec can walk implements this trait. It exposes the
/// runtime type of the value and a closed [`ReflectRef`] view describing what
/// the value can do (be read as a primitive, iterated as a list, walked member
/// by member, ...).
///
/// # Recommendations
///
/// Use [the derive macro] rather than implementing this trait by hand:
///
/// ```
/// use vc_reflect::{derive::Reflect, info::Typed};
///
/// #[derive(Reflect, Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let info = <Point as Typed>::type_info();
/// assert_eq!(info.name(), "Point");
/// ```
///
/// # Type Identification
///
/// `Box<dyn Reflect>` is itself reflected and forwards every call to the boxed
/// value, so [`reflect_type_info`] of a box reports the inner type. Note that
/// [`Any::type_id`] on the box still returns the id of the box, use
/// [`Reflect::ty_id`] instead:
///
/// ```
/// use core::any::{Any, TypeId};
/// use vc_reflect::Reflect;
///
/// let x: Box<dyn Reflect> = 32_i32.into_boxed_reflect();
///
/// assert!(x.type_id() != TypeId::of::<i32>());
/// assert!(x.ty_id() == TypeId::of::<i32>());
/// ```
///
/// [`vc_reflect`]: crate
/// [the derive macro]: crate::derive::Reflect
/// [`reflect_type_info`]: Reflect::reflect_type_info
pub trait Reflect: Send + Sync + Any {
    /// Returns the [`TypeInfo`] of the underlying (runtime) type.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    /// Returns an immutable view of the capability of this value.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_reflect::{Reflect, ops::ReflectRef};
    ///
    /// let v = vec![1, 2, 3];
    /// let ReflectRef::List(list) = v.reflect_ref() else { unreachable!() };
    /// assert_eq!(list.len(), 3);
    /// ```
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns the mutable dynamic-record view, if this value accepts members
    /// that its type does not declare.
    #[inline]
    fn as_dynamic_record_mut(&mut self) -> Option<&mut dyn DynamicRecord> {
        None
    }

    /// Return the [`TypeId`] of the underlying type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        self.reflect_type_info().id()
    }

    /// Casts this type to a fully-reflected value.
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this type to a boxed, fully-reflected value.
    ///
    /// # Example
    ///
    /// ```
    /// use vc_reflect::Reflect;
    ///
    /// let r = 32.into_boxed_reflect();
    /// // Equal to this:
    /// // let r = Box::new(32) as Box<dyn Reflect>;
    /// ```
    #[inline(always)]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Extracts a `Self` out of a boxed reflected value.
    ///
    /// The default implementation is a plain downcast. `Box<dyn Reflect>`
    /// overrides it to accept any value unchanged.
    #[inline]
    fn take_boxed(value: Box<dyn Reflect>) -> Result<Self, Box<dyn Reflect>>
    where
        Self: Sized,
    {
        value.take::<Self>()
    }
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        <dyn Any>::is::<T>(self)
    }

    /// Downcasts the value to type `T` by reference.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vc_reflect::Reflect;
    /// let x: Box<dyn Reflect> = 10.into_boxed_reflect();
    /// assert_eq!(x.downcast_ref::<i32>(), Some(&10));
    /// ```
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self;
        match any.downcast::<T>() {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("type is already checked"),
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vc_reflect::Reflect;
    /// let x: Box<dyn Reflect> = 10.into_boxed_reflect();
    ///
    /// let x = x.take::<i32>().unwrap();
    /// assert_eq!(x, 10);
    /// ```
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("dyn Reflect")
            .field("type", &self.reflect_type_info().path())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

/// Implement `reflect_type_info` through the static [`Typed`] accessor.
///
/// [`Typed`]: crate::info::Typed
macro_rules! impl_reflect_type_info {
    () => {
        #[inline]
        fn reflect_type_info(&self) -> &'static $crate::info::TypeInfo {
            <Self as $crate::info::Typed>::type_info()
        }
    };
}

pub(crate) use impl_reflect_type_info;
