//! Reserved keys and the per-node tagging decision.

use vc_reflect::info::TypeInfo;

use crate::settings::{SerializeSettings, TypeNameFormat, TypeTagPolicy};

/// Key of the type name.
pub const TYPE_KEY: &str = "$type";
/// Key of a tagged primitive.
pub const VALUE_KEY: &str = "$value";
/// Key of a tagged sequence.
pub const VALUES_KEY: &str = "$values";

/// Returns `true` for `$type`, `$value` and `$values`.
#[inline]
pub fn is_reserved(key: &str) -> bool {
    matches!(key, TYPE_KEY | VALUE_KEY | VALUES_KEY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// Records and maps.
    Object,
    /// Sequences.
    Array,
    /// Primitives and enum values, `ambiguous` when the literal does not
    /// identify the type (128-bit integers, binary blobs).
    Leaf { ambiguous: bool },
}

/// Decides whether a node is prefixed with a `$type` tag.
///
/// `declared` is the declared type of the slot, `None` at the root.
pub(crate) fn wants_tag(
    settings: &SerializeSettings,
    node: NodeKind,
    runtime: &TypeInfo,
    declared: Option<&TypeInfo>,
) -> bool {
    let is_root = declared.is_none();
    let differs = declared.is_some_and(|d| d.id() != runtime.id());

    match (settings.type_tags, node) {
        (TypeTagPolicy::None, _) => false,
        (TypeTagPolicy::All, NodeKind::Object | NodeKind::Array) => true,
        (TypeTagPolicy::All, NodeKind::Leaf { ambiguous }) => is_root || ambiguous,
        (TypeTagPolicy::Objects, kind) => kind == NodeKind::Object,
        (TypeTagPolicy::Arrays, kind) => kind == NodeKind::Array,
        (TypeTagPolicy::Auto, NodeKind::Object | NodeKind::Array) => differs,
        (TypeTagPolicy::Auto, NodeKind::Leaf { ambiguous }) => differs && ambiguous,
    }
}

/// The name written in the tag of `info`.
#[inline]
pub(crate) fn type_name(settings: &SerializeSettings, info: &'static TypeInfo) -> &'static str {
    match settings.type_name_format {
        TypeNameFormat::Full => info.path(),
        TypeNameFormat::Short => info.name(),
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec::Vec;

    use vc_reflect::Reflect;
    use vc_reflect::info::Typed;

    use super::{NodeKind, wants_tag};
    use crate::{SerializeSettings, TypeTagPolicy};

    #[test]
    fn auto_tags_only_mismatches() {
        let settings = SerializeSettings::DEFAULT.with_type_tags(TypeTagPolicy::Auto);
        let any = <Box<dyn Reflect>>::type_info();
        let list = <Vec<u8>>::type_info();

        assert!(!wants_tag(&settings, NodeKind::Array, list, None));
        assert!(!wants_tag(&settings, NodeKind::Array, list, Some(list)));
        assert!(wants_tag(&settings, NodeKind::Array, list, Some(any)));
        let plain = NodeKind::Leaf { ambiguous: false };
        let ambiguous = NodeKind::Leaf { ambiguous: true };
        assert!(!wants_tag(&settings, plain, i32::type_info(), Some(any)));
        assert!(wants_tag(&settings, ambiguous, u128::type_info(), Some(any)));
    }

    #[test]
    fn all_tags_root_leaves() {
        let settings = SerializeSettings::DEFAULT.with_type_tags(TypeTagPolicy::All);
        let info = i32::type_info();

        assert!(wants_tag(&settings, NodeKind::Leaf { ambiguous: false }, info, None));
        assert!(!wants_tag(&settings, NodeKind::Leaf { ambiguous: false }, info, Some(info)));
        assert!(wants_tag(&settings, NodeKind::Object, info, Some(info)));
    }
}
