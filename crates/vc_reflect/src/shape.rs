//! Memoized structural classification of types.
//!
//! [`shape_facts`] answers the questions a walker asks before dispatching on a
//! type: is it a leaf, a container, which element type does it hold, should
//! it be walked through all of its fields. The answer is computed once per
//! [`TypeId`] and leaked.
//!
//! [`TypeId`]: core::any::TypeId

use alloc::vec::Vec;

use tracing::debug;
use vc_utils::TypeCache;

use crate::info::{ListFlavor, PrimitiveKind, TypeInfo, TypeKind};
use crate::members::get_members;

// -----------------------------------------------------------------------------
// ContainerKind

/// How the content of a composite type is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Not a container: leaves, nullables, shared cells, `Any`, opaque values.
    None,
    /// A dictionary keyed by strings.
    StringMap,
    /// A dictionary with non-string keys, written with stringified keys.
    PairMap,
    /// A record carrying per-instance members.
    Dynamic,
    /// A sequence.
    Sequence,
    /// A record walked member by member.
    Record,
}

// -----------------------------------------------------------------------------
// ShapeFacts

/// Structural facts about one type.
#[derive(Debug)]
pub struct ShapeFacts {
    /// Primitives and `()`: written as a single literal.
    pub is_primitive_like: bool,
    pub is_enum: bool,
    pub is_nullable: bool,
    /// Records with positional members or no public member, walked through
    /// all of their fields.
    pub is_anonymous_like: bool,
    /// Records, including dynamic ones.
    pub is_class_like: bool,
    /// Sequences with a fixed or exact length.
    pub is_array: bool,
    /// Generic sequences and dictionaries.
    pub is_generic_collection: bool,
    pub generic_args: Vec<&'static TypeInfo>,
    /// Element type of a sequence, value type of a dictionary.
    pub element_type: Option<&'static TypeInfo>,
    pub container: ContainerKind,
}

fn classify(info: &TypeInfo) -> ShapeFacts {
    let mut facts = ShapeFacts {
        is_primitive_like: false,
        is_enum: false,
        is_nullable: false,
        is_anonymous_like: false,
        is_class_like: false,
        is_array: false,
        is_generic_collection: false,
        generic_args: info.generics().iter().map(|f| f()).collect(),
        element_type: None,
        container: ContainerKind::None,
    };

    match info.kind() {
        TypeKind::Primitive(_) => facts.is_primitive_like = true,
        TypeKind::Enum(_) => facts.is_enum = true,
        TypeKind::Nullable(_) => facts.is_nullable = true,
        TypeKind::List(list) => {
            facts.is_array = matches!(list.flavor(), ListFlavor::Array | ListFlavor::Fixed(_));
            facts.is_generic_collection = !facts.generic_args.is_empty();
            facts.element_type = Some(list.element());
            facts.container = ContainerKind::Sequence;
        }
        TypeKind::Map(map) => {
            let string_keys = matches!(
                map.key().kind(),
                TypeKind::Primitive(p) if p.kind() == PrimitiveKind::String
            );
            facts.is_generic_collection = true;
            facts.element_type = Some(map.value());
            facts.container = if string_keys {
                ContainerKind::StringMap
            } else {
                ContainerKind::PairMap
            };
        }
        TypeKind::Record(record) => {
            facts.is_class_like = true;
            facts.is_anonymous_like = record.is_tuple_like()
                || (!record.members().is_empty() && get_members(info, true).is_empty());
            facts.container = if record.is_dynamic() {
                ContainerKind::Dynamic
            } else {
                ContainerKind::Record
            };
        }
        TypeKind::Shared(_) | TypeKind::Any | TypeKind::Opaque => {}
    }

    debug!(type_path = info.path(), container = ?facts.container, "shape facts built");
    facts
}

static FACTS: TypeCache<ShapeFacts> = TypeCache::new();

/// Returns the memoized [`ShapeFacts`] of a type.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use vc_reflect::{info::Typed, shape::{ContainerKind, shape_facts}};
///
/// let facts = shape_facts(<HashMap<u32, String>>::type_info());
/// assert_eq!(facts.container, ContainerKind::PairMap);
/// assert!(facts.element_type.unwrap().type_is::<String>());
///
/// let again = shape_facts(<HashMap<u32, String>>::type_info());
/// assert!(core::ptr::eq(facts, again));
/// ```
pub fn shape_facts(info: &TypeInfo) -> &'static ShapeFacts {
    if let Some(facts) = FACTS.get(info.id()) {
        return facts;
    }
    // Built outside the lock, `classify` reads other caches.
    FACTS.insert(info.id(), classify(info))
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{ContainerKind, shape_facts};
    use crate::derive::Reflect;
    use crate::impls::Expando;
    use crate::info::Typed;

    #[derive(Reflect, Default)]
    struct Pair(i32, i32);

    #[derive(Reflect, Default)]
    struct Hidden {
        inner: u8,
    }

    #[derive(Reflect, Default)]
    pub struct Open {
        pub inner: u8,
    }

    #[test]
    fn containers() {
        assert_eq!(shape_facts(<Vec<u8>>::type_info()).container, ContainerKind::Sequence);
        assert_eq!(
            shape_facts(<BTreeMap<String, u8>>::type_info()).container,
            ContainerKind::StringMap
        );
        assert_eq!(shape_facts(Expando::type_info()).container, ContainerKind::Dynamic);
        assert_eq!(shape_facts(i32::type_info()).container, ContainerKind::None);
        assert!(shape_facts(<[u8; 2]>::type_info()).is_array);
        assert!(!shape_facts(<Vec<u8>>::type_info()).is_array);
    }

    #[test]
    fn anonymous_records() {
        assert!(shape_facts(Pair::type_info()).is_anonymous_like);
        assert!(shape_facts(Hidden::type_info()).is_anonymous_like);

        let open = shape_facts(Open::type_info());
        assert!(open.is_class_like && !open.is_anonymous_like);
        assert_eq!(open.container, ContainerKind::Record);
    }

    #[test]
    fn leaf_and_generic_flags() {
        let map = shape_facts(<BTreeMap<String, u8>>::type_info());
        assert!(map.is_generic_collection);
        assert_eq!(map.generic_args.len(), 2);
        assert!(map.generic_args[1].type_is::<u8>());
        assert!(map.element_type.unwrap().type_is::<u8>());

        assert!(shape_facts(i32::type_info()).is_primitive_like);
        assert!(shape_facts(<Option<u8>>::type_info()).is_nullable);
        assert!(shape_facts(<Option<u8>>::type_info()).generic_args[0].type_is::<u8>());
    }
}
