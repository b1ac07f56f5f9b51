use vc_reflect::Reflect;
use vc_reflect::info::TypeInfo;

/// A slot about to be written.
#[derive(Debug, Clone, Copy)]
pub enum Slot<'a> {
    /// A declared or dynamic member of a record.
    Member { owner: &'static TypeInfo, name: &'a str },
    /// An entry of a map, with its stringified key.
    Entry { key: &'a str },
    /// An item of a sequence.
    Item { index: usize },
}

/// Hook deciding, slot by slot, what is written.
///
/// Closures `Fn(Slot<'_>, &dyn Reflect) -> bool` qualify.
///
/// # Examples
///
/// ```
/// use vc_json::{SerializeSettings, Slot, to_json_string_with};
///
/// let filter = |slot: Slot<'_>, _: &dyn vc_reflect::Reflect| {
///     !matches!(slot, Slot::Item { index: 1 })
/// };
/// let text = to_json_string_with(&vec![1, 2, 3], &SerializeSettings::DEFAULT, &filter).unwrap();
/// assert_eq!(text, "[1,3]");
/// ```
pub trait MemberFilter: Sync {
    /// Returns `false` to skip the slot.
    fn include(&self, slot: Slot<'_>, value: &dyn Reflect) -> bool;
}

impl<F> MemberFilter for F
where
    F: Fn(Slot<'_>, &dyn Reflect) -> bool + Sync,
{
    #[inline]
    fn include(&self, slot: Slot<'_>, value: &dyn Reflect) -> bool {
        self(slot, value)
    }
}
