use alloc::boxed::Box;
use alloc::format;
use alloc::sync::Arc;
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{SharedInfo, TypeInfo, TypeKind, Typed};
use crate::ops::{ReflectRef, SharedRef};
use crate::reflection::impl_reflect_type_info;

// -----------------------------------------------------------------------------
// Shared

/// A reference-counted, lockable cell with identity.
///
/// Cloning a [`Shared`] clones the handle, not the content. This is the only
/// way to build a cyclic object graph out of reflected values, and the
/// codec tracks it by the address of the allocation.
///
/// # Examples
///
/// ```
/// use vc_reflect::impls::Shared;
///
/// let a = Shared::new(1_u8);
/// let b = a.clone();
/// *b.write() = 2;
///
/// assert_eq!(*a.read(), 2);
/// assert!(Shared::ptr_eq(&a, &b));
/// ```
pub struct Shared<T>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    /// Moves `value` into a new cell.
    #[inline]
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Locks the cell for reading. A poisoned lock is recovered.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the cell for writing. A poisoned lock is recovered.
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if both handles point to the same cell.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }
}

impl<T> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    #[inline]
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&*self.read()).finish()
    }
}

// -----------------------------------------------------------------------------
// Reflect

fn wrap_shared<T: Typed>(value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    T::take_boxed(value).map(|v| Box::new(Shared::new(v)) as Box<dyn Reflect>)
}

impl<T: Typed> Typed for Shared<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let inner = T::type_info();
            TypeInfo::new::<Self>(
                format!("vc_reflect::impls::Shared<{}>", inner.path()),
                format!("Shared<{}>", inner.name()),
                TypeKind::Shared(SharedInfo::new(T::type_info, wrap_shared::<T>)),
            )
            .with_generics(&[T::type_info])
        })
    }
}

impl<T: Typed> Reflect for Shared<T> {
    impl_reflect_type_info!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Shared(self)
    }
}

impl<T: Typed> SharedRef for Shared<T> {
    #[inline]
    fn identity(&self) -> usize {
        Arc::as_ptr(&self.0).addr()
    }

    fn visit(&self, visitor: &mut dyn FnMut(&dyn Reflect)) {
        let guard = self.read();
        visitor(&*guard);
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use crate::Reflect;
    use crate::impls::Shared;
    use crate::info::Typed;
    use crate::ops::ReflectRef;

    #[test]
    fn identity_follows_the_allocation() {
        let a = Shared::new(3_i32);
        let b = a.clone();
        let c = Shared::new(3_i32);

        let id = |s: &Shared<i32>| match s.reflect_ref() {
            ReflectRef::Shared(cell) => cell.identity(),
            _ => panic!("shared cells reflect as shared"),
        };
        assert_eq!(id(&a), id(&b));
        assert_ne!(id(&a), id(&c));
    }

    #[test]
    fn visit_sees_content() {
        let cell = Shared::new(9_u8);
        let ReflectRef::Shared(view) = cell.reflect_ref() else {
            panic!("shared cells reflect as shared");
        };
        let mut seen = None;
        view.visit(&mut |v| seen = v.downcast_ref::<u8>().copied());
        assert_eq!(seen, Some(9));
    }

    #[test]
    fn wrap_moves_into_new_cell() {
        let info = <Shared<u8>>::type_info().as_shared().unwrap();
        let built = info.wrap(Box::new(4_u8)).unwrap();
        let cell = built.take::<Shared<u8>>().unwrap();
        assert_eq!(*cell.read(), 4);
        assert!(info.wrap(Box::new(true)).is_err());
    }
}
