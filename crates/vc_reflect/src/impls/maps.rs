use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;

use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::impls::sequences::hasher_suffix;
use crate::info::{MapFlavor, MapInfo, TypeInfo, TypeKind, Typed};
use crate::ops::{Map, ReflectRef};
use crate::reflection::impl_reflect_type_info;

type Pairs = Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>;

/// Converts every pair, `None` as soon as a key or value has the wrong type.
fn take_pairs<K: Typed, V: Typed, C: FromIterator<(K, V)>>(pairs: Pairs) -> Option<C> {
    pairs
        .into_iter()
        .map(|(k, v)| Some((K::take_boxed(k).ok()?, V::take_boxed(v).ok()?)))
        .collect()
}

macro_rules! impl_map {
    ([$($generics:tt)*] $ty:ty, $path:literal, $name:literal, $flavor:ident, $suffix:expr) => {
        impl<$($generics)*> Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let (key, value) = (K::type_info(), V::type_info());
                    let suffix: String = $suffix;
                    let collect = |pairs| {
                        take_pairs::<K, V, Self>(pairs).map(|m| Box::new(m) as Box<dyn Reflect>)
                    };
                    let flavor = MapFlavor::$flavor;
                    let info = MapInfo::new(K::type_info, V::type_info, flavor, collect);
                    TypeInfo::new::<Self>(
                        format!(concat!($path, "<{}, {}{}>"), key.path(), value.path(), suffix),
                        format!(concat!($name, "<{}, {}{}>"), key.name(), value.name(), suffix),
                        TypeKind::Map(info),
                    )
                    .with_generics(&[K::type_info, V::type_info])
                    .with_default::<Self>()
                })
            }
        }

        impl<$($generics)*> Reflect for $ty {
            impl_reflect_type_info!();

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(self)
            }
        }

        impl<$($generics)*> Map for $ty {
            #[inline]
            fn len(&self) -> usize {
                <$ty>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new(<$ty>::iter(self).map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)))
            }
        }
    };
}

impl_map!(
    [K: Typed + Ord, V: Typed] BTreeMap<K, V>,
    "alloc::collections::BTreeMap",
    "BTreeMap",
    Ordered,
    String::new()
);
impl_map!(
    [K: Typed + Eq + Hash, V: Typed, S: BuildHasher + Default + Send + Sync + 'static]
    HashMap<K, V, S>,
    "std::collections::HashMap",
    "HashMap",
    Hashed,
    hasher_suffix::<S>()
);

// -----------------------------------------------------------------------------
// Arc<BTreeMap<K, V>>

fn wrap_arc_map<K: Typed + Ord, V: Typed>(backing: Box<dyn Reflect>) -> Option<Box<dyn Reflect>> {
    let map = backing.take::<BTreeMap<K, V>>().ok()?;
    Some(Box::new(Arc::new(map)))
}

impl<K: Typed + Ord, V: Typed> Typed for Arc<BTreeMap<K, V>> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let inner = <BTreeMap<K, V>>::type_info();
            let info = MapInfo::read_only(
                K::type_info,
                V::type_info,
                <BTreeMap<K, V>>::type_info,
                wrap_arc_map::<K, V>,
            );
            TypeInfo::new::<Self>(
                format!("alloc::sync::Arc<{}>", inner.path()),
                format!("Arc<{}>", inner.name()),
                TypeKind::Map(info),
            )
            .with_generics(&[K::type_info, V::type_info])
            .with_default::<Self>()
        })
    }
}

impl<K: Typed + Ord, V: Typed> Reflect for Arc<BTreeMap<K, V>> {
    impl_reflect_type_info!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Map(self)
    }
}

impl<K: Typed + Ord, V: Typed> Map for Arc<BTreeMap<K, V>> {
    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(BTreeMap::iter(self).map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)))
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use std::collections::HashMap;

    use crate::Reflect;
    use crate::info::{MapFlavor, Typed};
    use crate::ops::ReflectRef;

    #[test]
    fn names_and_flavors() {
        let info = <HashMap<String, i32>>::type_info();
        assert_eq!(info.name(), "HashMap<String, i32>");
        assert_eq!(info.as_map().unwrap().flavor(), MapFlavor::Hashed);

        let info = <Arc<BTreeMap<u8, bool>>>::type_info();
        assert_eq!(info.name(), "Arc<BTreeMap<u8, bool>>");
        assert_eq!(info.as_map().unwrap().flavor(), MapFlavor::ReadOnly);
    }

    #[test]
    fn collect_rejects_wrong_key() {
        let collect = <BTreeMap<u8, bool>>::type_info().as_map().unwrap().collect_fn().unwrap();

        let ok = vec![(Box::new(1_u8) as Box<dyn Reflect>, Box::new(true) as Box<dyn Reflect>)];
        let map = collect(ok).unwrap().take::<BTreeMap<u8, bool>>().unwrap();
        assert_eq!(map.get(&1), Some(&true));

        let bad = vec![(Box::new(1_i64) as Box<dyn Reflect>, Box::new(true) as Box<dyn Reflect>)];
        assert!(collect(bad).is_none());
    }

    #[test]
    fn iterates_entries() {
        let map: BTreeMap<String, u8> = [("a".into(), 1), ("b".into(), 2)].into_iter().collect();
        let ReflectRef::Map(view) = map.reflect_ref() else {
            panic!("maps are maps");
        };
        let keys: Vec<&str> = view
            .iter()
            .filter_map(|(k, _)| k.downcast_ref::<String>().map(String::as_str))
            .collect();
        assert_eq!(keys, ["a", "b"]);
    }
}
