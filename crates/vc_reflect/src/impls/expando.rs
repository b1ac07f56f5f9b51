use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{RecordInfo, TypeInfo, TypeKind, Typed};
use crate::ops::{DynamicRecord, ReflectRef};
use crate::reflection::impl_reflect_type_info;

/// A record made only of dynamic members, in insertion order.
///
/// Used on its own as an open object, or as the `#[reflect(extra)]` storage
/// of a `#[reflect(dynamic)]` record.
///
/// # Examples
///
/// ```
/// use vc_reflect::impls::Expando;
///
/// let mut bag = Expando::default();
/// bag.insert("a", Box::new(1_i32));
/// bag.insert("a", Box::new(2_i32));
///
/// assert_eq!(bag.len(), 1);
/// assert_eq!(bag.get("a").and_then(|v| v.downcast_ref::<i32>()), Some(&2));
/// ```
#[derive(Default)]
pub struct Expando {
    members: Vec<(String, Box<dyn Reflect>)>,
}

impl Expando {
    /// Returns the member called `name`.
    pub fn get(&self, name: &str) -> Option<&dyn Reflect> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| &**v)
    }

    /// Inserts a member, replacing the value of an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, value: Box<dyn Reflect>) {
        let name = name.into();
        match self.members.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.members.push((name, value)),
        }
    }

    /// Iterates over the members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Reflect)> {
        self.members.iter().map(|(n, v)| (n.as_str(), &**v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Debug for Expando {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Typed for Expando {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            let kind = TypeKind::Record(RecordInfo::new(Vec::new()).dynamic());
            TypeInfo::new::<Self>("vc_reflect::impls::Expando", "Expando", kind)
                .with_default::<Self>()
        })
    }
}

impl Reflect for Expando {
    impl_reflect_type_info!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Dynamic(self)
    }

    #[inline]
    fn as_dynamic_record_mut(&mut self) -> Option<&mut dyn DynamicRecord> {
        Some(self)
    }
}

impl DynamicRecord for Expando {
    fn dynamic_members(&self) -> Box<dyn Iterator<Item = (&str, &dyn Reflect)> + '_> {
        Box::new(self.iter())
    }

    #[inline]
    fn insert_dynamic(&mut self, name: String, value: Box<dyn Reflect>) {
        self.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::Reflect;
    use crate::impls::Expando;
    use crate::ops::ReflectRef;

    #[test]
    fn keeps_insertion_order() {
        let mut bag = Expando::default();
        bag.insert("z", Box::new(1_u8));
        bag.insert("a", Box::new(2_u8));
        bag.insert("z", Box::new(3_u8));

        let ReflectRef::Dynamic(view) = bag.reflect_ref() else {
            panic!("expando is dynamic");
        };
        let names: Vec<&str> = view.dynamic_members().map(|(n, _)| n).collect();
        assert_eq!(names, ["z", "a"]);
    }

    #[test]
    fn inserts_through_reflect() {
        let mut boxed: Box<dyn Reflect> = Box::new(Expando::default());
        let record = boxed.as_dynamic_record_mut().unwrap();
        record.insert_dynamic(String::from("k"), Box::new(true));

        let bag = boxed.take::<Expando>().unwrap();
        assert_eq!(bag.get("k").and_then(|v| v.downcast_ref::<bool>()), Some(&true));
    }
}
