use alloc::boxed::Box;
use alloc::collections::{BTreeSet, VecDeque};
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{TypeId, type_name};
use core::hash::{BuildHasher, Hash};
use std::collections::HashSet;
use std::hash::RandomState;

use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{ListFlavor, ListInfo, TypeInfo, TypeKind, Typed};
use crate::ops::{List, ReflectRef};
use crate::reflection::impl_reflect_type_info;

/// Converts every item, `None` as soon as one has the wrong type.
fn take_items<T: Typed, C: FromIterator<T>>(items: Vec<Box<dyn Reflect>>) -> Option<C> {
    items.into_iter().map(|item| T::take_boxed(item).ok()).collect()
}

/// `", S"` for hashers other than the std default.
pub(super) fn hasher_suffix<S: 'static>() -> String {
    if TypeId::of::<S>() == TypeId::of::<RandomState>() {
        String::new()
    } else {
        format!(", {}", type_name::<S>())
    }
}

// -----------------------------------------------------------------------------
// Growable and set sequences

macro_rules! impl_list {
    ([$($generics:tt)*] $ty:ty, $path:literal, $name:literal, $flavor:ident, $suffix:expr) => {
        impl<$($generics)*> Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let element = T::type_info();
                    let suffix: String = $suffix;
                    let info = ListInfo::new(T::type_info, ListFlavor::$flavor, |items| {
                        take_items::<T, Self>(items).map(|v| Box::new(v) as Box<dyn Reflect>)
                    });
                    TypeInfo::new::<Self>(
                        format!(concat!($path, "<{}{}>"), element.path(), suffix),
                        format!(concat!($name, "<{}{}>"), element.name(), suffix),
                        TypeKind::List(info),
                    )
                    .with_generics(&[T::type_info])
                    .with_default::<Self>()
                })
            }
        }

        impl<$($generics)*> Reflect for $ty {
            impl_reflect_type_info!();

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::List(self)
            }
        }

        impl<$($generics)*> List for $ty {
            #[inline]
            fn len(&self) -> usize {
                <$ty>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                Box::new(IntoIterator::into_iter(self).map(|v| v as &dyn Reflect))
            }
        }
    };
}

impl_list!([T: Typed] Vec<T>, "alloc::vec::Vec", "Vec", Growable, String::new());
impl_list!(
    [T: Typed] VecDeque<T>,
    "alloc::collections::VecDeque",
    "VecDeque",
    Growable,
    String::new()
);
impl_list!(
    [T: Typed + Ord] BTreeSet<T>,
    "alloc::collections::BTreeSet",
    "BTreeSet",
    Set,
    String::new()
);
impl_list!(
    [T: Typed + Eq + Hash, S: BuildHasher + Default + Send + Sync + 'static] HashSet<T, S>,
    "std::collections::HashSet",
    "HashSet",
    Set,
    hasher_suffix::<S>()
);

// -----------------------------------------------------------------------------
// Box<[T]>

impl<T: Typed> Typed for Box<[T]> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let element = T::type_info();
            let info = ListInfo::new(T::type_info, ListFlavor::Array, |items| {
                let items: Vec<T> = take_items::<T, Vec<T>>(items)?;
                Some(Box::new(items.into_boxed_slice()) as Box<dyn Reflect>)
            });
            TypeInfo::new::<Self>(
                format!("alloc::boxed::Box<[{}]>", element.path()),
                format!("Box<[{}]>", element.name()),
                TypeKind::List(info),
            )
            .with_generics(&[T::type_info])
            .with_default::<Self>()
        })
    }
}

impl<T: Typed> Reflect for Box<[T]> {
    impl_reflect_type_info!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }
}

impl<T: Typed> List for Box<[T]> {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(<[T]>::iter(self).map(|v| v as &dyn Reflect))
    }
}

// -----------------------------------------------------------------------------
// [T; N]

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let element = T::type_info();
            let info = ListInfo::new(T::type_info, ListFlavor::Fixed(N), |items| {
                let items: Vec<T> = take_items::<T, Vec<T>>(items)?;
                let array: [T; N] = items.try_into().ok()?;
                Some(Box::new(array) as Box<dyn Reflect>)
            });
            TypeInfo::new::<Self>(
                format!("[{}; {N}]", element.path()),
                format!("[{}; {N}]", element.name()),
                TypeKind::List(info),
            )
            .with_generics(&[T::type_info])
        })
    }
}

impl<T: Typed, const N: usize> Reflect for [T; N] {
    impl_reflect_type_info!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }
}

impl<T: Typed, const N: usize> List for [T; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(<[T]>::iter(self).map(|v| v as &dyn Reflect))
    }
}

// -----------------------------------------------------------------------------
// Arc<[T]>

fn wrap_arc_slice<T: Typed>(backing: Box<dyn Reflect>) -> Option<Box<dyn Reflect>> {
    let items = backing.take::<Vec<T>>().ok()?;
    Some(Box::new(Arc::<[T]>::from(items)))
}

impl<T: Typed> Typed for Arc<[T]> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let element = T::type_info();
            let info = ListInfo::read_only(T::type_info, <Vec<T>>::type_info, wrap_arc_slice::<T>);
            TypeInfo::new::<Self>(
                format!("alloc::sync::Arc<[{}]>", element.path()),
                format!("Arc<[{}]>", element.name()),
                TypeKind::List(info),
            )
            .with_generics(&[T::type_info])
            .with_default::<Self>()
        })
    }
}

impl<T: Typed> Reflect for Arc<[T]> {
    impl_reflect_type_info!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }
}

impl<T: Typed> List for Arc<[T]> {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(<[T]>::iter(self).map(|v| v as &dyn Reflect))
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::{BTreeSet, VecDeque};
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use std::collections::HashSet;

    use crate::Reflect;
    use crate::info::{ListFlavor, Typed};
    use crate::ops::ReflectRef;

    fn boxed_items(values: &[i32]) -> Vec<Box<dyn Reflect>> {
        values.iter().map(|v| Box::new(*v) as Box<dyn Reflect>).collect()
    }

    #[test]
    fn flavors() {
        let flavor = |info: &crate::info::TypeInfo| info.as_list().unwrap().flavor();
        assert_eq!(flavor(<Vec<i32>>::type_info()), ListFlavor::Growable);
        assert_eq!(flavor(<BTreeSet<i32>>::type_info()), ListFlavor::Set);
        assert_eq!(flavor(<HashSet<i32>>::type_info()), ListFlavor::Set);
        assert_eq!(flavor(<Box<[i32]>>::type_info()), ListFlavor::Array);
        assert_eq!(flavor(<[i32; 3]>::type_info()), ListFlavor::Fixed(3));
        assert_eq!(flavor(<Arc<[i32]>>::type_info()), ListFlavor::ReadOnly);
    }

    #[test]
    fn nested_generics_resolve() {
        let info = <Vec<Vec<u8>>>::type_info();
        assert_eq!(info.name(), "Vec<Vec<u8>>");
        assert!(info.as_list().unwrap().element().type_is::<Vec<u8>>());
        assert_eq!(<HashSet<u8>>::type_info().name(), "HashSet<u8>");
    }

    #[test]
    fn collect_builds_container() {
        let collect = <Vec<i32>>::type_info().as_list().unwrap().collect_fn().unwrap();
        let built = collect(boxed_items(&[1, 2, 3])).unwrap();
        assert_eq!(built.take::<Vec<i32>>().unwrap(), vec![1, 2, 3]);

        let mut mixed = boxed_items(&[1]);
        mixed.push(Box::new(true));
        assert!(collect(mixed).is_none());
    }

    #[test]
    fn fixed_array_checks_length() {
        let collect = <[i32; 2]>::type_info().as_list().unwrap().collect_fn().unwrap();
        assert!(collect(boxed_items(&[1, 2])).is_some());
        assert!(collect(boxed_items(&[1, 2, 3])).is_none());
    }

    #[test]
    fn read_only_goes_through_backing() {
        let info = <Arc<[i32]>>::type_info().as_list().unwrap();
        assert!(info.collect_fn().is_none());

        let backing = info.backing().unwrap();
        assert!(backing.type_is::<Vec<i32>>());

        let collect = backing.as_list().unwrap().collect_fn().unwrap();
        let filled = collect(boxed_items(&[5, 6])).unwrap();
        let wrapped = (info.wrap_fn().unwrap())(filled).unwrap();
        let arc = wrapped.take::<Arc<[i32]>>().unwrap();
        assert_eq!(&*arc, &[5, 6]);
    }

    #[test]
    fn iterates_items() {
        let set: BTreeSet<u8> = [3, 1, 2].into_iter().collect();
        let ReflectRef::List(list) = set.reflect_ref() else {
            panic!("sets are lists");
        };
        let items: Vec<u8> = list.iter().filter_map(|v| v.downcast_ref::<u8>().copied()).collect();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn vec_and_deque_iterate_in_order() {
        let vec = vec![4_i32, 5, 6];
        let ReflectRef::List(list) = vec.reflect_ref() else {
            panic!("vectors are lists");
        };
        assert_eq!(list.len(), 3);
        let items: Vec<i32> = list
            .iter()
            .filter_map(|v| v.downcast_ref::<i32>().copied())
            .collect();
        assert_eq!(items, vec![4, 5, 6]);

        let deque: VecDeque<i32> = vec.into_iter().rev().collect();
        let ReflectRef::List(list) = deque.reflect_ref() else {
            panic!("deques are lists");
        };
        let items: Vec<i32> = list
            .iter()
            .filter_map(|v| v.downcast_ref::<i32>().copied())
            .collect();
        assert_eq!(items, vec![6, 5, 4]);
    }
}
