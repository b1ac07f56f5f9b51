//! Construction plans of sequence and dictionary targets.
//!
//! Rehydration never builds a container type directly from its name: it asks
//! for a shape, which says which type actually collects the items and how
//! the result becomes the requested type. Shapes are pure functions of the
//! type and are memoized per [`TypeId`](core::any::TypeId).

use tracing::debug;
use vc_reflect::info::{CollectFn, CollectPairsFn, ListFlavor, MapFlavor, PrimitiveKind};
use vc_reflect::info::{TypeInfo, TypeKind, WrapFn};
use vc_utils::TypeCache;

// -----------------------------------------------------------------------------
// ListShape

/// How a sequence target is built.
#[derive(Debug, Clone, Copy)]
pub struct ListShape {
    /// The requested type.
    pub target: &'static TypeInfo,
    /// The type collecting the items, `target` unless read-only.
    pub backing: &'static TypeInfo,
    pub element: &'static TypeInfo,
    pub backing_kind: ListFlavor,
    pub collect: CollectFn,
    /// Converts the backing value into the read-only target.
    pub read_only_wrap: Option<WrapFn>,
    /// Number of items the backing requires, for fixed arrays.
    pub exact_len: Option<usize>,
}

fn build_list_shape(target: &'static TypeInfo) -> Option<ListShape> {
    let list = target.as_list().ok()?;
    let (backing, read_only_wrap) = match list.flavor() {
        ListFlavor::ReadOnly => (list.backing()?, Some(list.wrap_fn()?)),
        _ => (target, None),
    };
    let backing_info = backing.as_list().ok()?;
    let backing_kind = backing_info.flavor();

    Some(ListShape {
        target,
        backing,
        element: list.element(),
        backing_kind,
        collect: backing_info.collect_fn()?,
        read_only_wrap,
        exact_len: match backing_kind {
            ListFlavor::Fixed(len) => Some(len),
            _ => None,
        },
    })
}

static LIST_SHAPES: TypeCache<Option<ListShape>> = TypeCache::new();

/// Returns the memoized [`ListShape`] of a sequence type, `None` for other
/// kinds.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_json::evaluate_list_shape;
/// use vc_reflect::info::{ListFlavor, Typed};
///
/// let shape = evaluate_list_shape(<Arc<[u8]>>::type_info()).unwrap();
/// assert!(shape.backing.type_is::<Vec<u8>>());
/// assert_eq!(shape.backing_kind, ListFlavor::Growable);
/// assert!(shape.read_only_wrap.is_some());
///
/// let fixed = evaluate_list_shape(<[u8; 3]>::type_info()).unwrap();
/// assert_eq!(fixed.exact_len, Some(3));
/// ```
pub fn evaluate_list_shape(info: &'static TypeInfo) -> Option<&'static ListShape> {
    if let Some(shape) = LIST_SHAPES.get(info.id()) {
        return shape.as_ref();
    }
    let shape = build_list_shape(info);
    debug!(type_path = info.path(), supported = shape.is_some(), "list shape evaluated");
    LIST_SHAPES.insert(info.id(), shape).as_ref()
}

// -----------------------------------------------------------------------------
// DictionaryShape

/// How a dictionary target is built.
#[derive(Debug, Clone, Copy)]
pub struct DictionaryShape {
    pub target: &'static TypeInfo,
    pub backing: &'static TypeInfo,
    pub key: &'static TypeInfo,
    pub value: &'static TypeInfo,
    pub backing_kind: MapFlavor,
    pub collect: CollectPairsFn,
    pub read_only_wrap: Option<WrapFn>,
    /// `false` for pair maps, whose keys are rebuilt from their string form.
    pub string_keys: bool,
}

fn build_dictionary_shape(target: &'static TypeInfo) -> Option<DictionaryShape> {
    let map = target.as_map().ok()?;
    let (backing, read_only_wrap) = match map.flavor() {
        MapFlavor::ReadOnly => (map.backing()?, Some(map.wrap_fn()?)),
        _ => (target, None),
    };
    let backing_info = backing.as_map().ok()?;
    let key = map.key();

    Some(DictionaryShape {
        target,
        backing,
        key,
        value: map.value(),
        backing_kind: backing_info.flavor(),
        collect: backing_info.collect_fn()?,
        read_only_wrap,
        string_keys: matches!(
            key.kind(),
            TypeKind::Primitive(p) if p.kind() == PrimitiveKind::String
        ),
    })
}

static DICTIONARY_SHAPES: TypeCache<Option<DictionaryShape>> = TypeCache::new();

/// Returns the memoized [`DictionaryShape`] of a dictionary type, `None`
/// for other kinds.
pub fn evaluate_dictionary_shape(info: &'static TypeInfo) -> Option<&'static DictionaryShape> {
    if let Some(shape) = DICTIONARY_SHAPES.get(info.id()) {
        return shape.as_ref();
    }
    let shape = build_dictionary_shape(info);
    debug!(type_path = info.path(), supported = shape.is_some(), "dictionary shape evaluated");
    DICTIONARY_SHAPES.insert(info.id(), shape).as_ref()
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use std::collections::HashMap;

    use vc_reflect::info::{ListFlavor, MapFlavor, Typed};

    use super::{evaluate_dictionary_shape, evaluate_list_shape};

    #[test]
    fn list_shapes_are_memoized() {
        let info = <Vec<String>>::type_info();
        let first = evaluate_list_shape(info).unwrap();
        let second = evaluate_list_shape(info).unwrap();
        assert!(core::ptr::eq(first, second));
        assert!(first.backing.type_is::<Vec<String>>());
        assert!(first.read_only_wrap.is_none());
    }

    #[test]
    fn exact_arrays() {
        let shape = evaluate_list_shape(<Box<[i32]>>::type_info()).unwrap();
        assert_eq!(shape.backing_kind, ListFlavor::Array);
        assert_eq!(shape.exact_len, None);
    }

    #[test]
    fn non_lists_have_no_shape() {
        assert!(evaluate_list_shape(i32::type_info()).is_none());
        assert!(evaluate_dictionary_shape(<Vec<u8>>::type_info()).is_none());
    }

    #[test]
    fn dictionary_shapes() {
        let pairs = evaluate_dictionary_shape(<HashMap<u32, String>>::type_info()).unwrap();
        assert!(!pairs.string_keys);
        assert_eq!(pairs.backing_kind, MapFlavor::Hashed);

        let info = <Arc<BTreeMap<String, i32>>>::type_info();
        let read_only = evaluate_dictionary_shape(info).unwrap();
        assert!(read_only.string_keys);
        assert!(read_only.backing.type_is::<BTreeMap<String, i32>>());
        assert!(read_only.read_only_wrap.is_some());
        assert!(core::ptr::eq(read_only, evaluate_dictionary_shape(info).unwrap()));
    }
}
