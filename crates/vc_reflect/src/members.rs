//! Process-wide cache of the member tables of record types.
//!
//! A [`MemberTable`] is the filtered, indexed view of the
//! [`MemberDescriptor`]s declared by a [`RecordInfo`]. Four tables are built
//! in a single pass per type (public or all fields, each with an exact and a
//! lowercased index) and cached for the lifetime of the process.
//!
//! Malformed descriptors (empty or duplicate names) are skipped and logged,
//! never raised.
//!
//! [`RecordInfo`]: crate::info::RecordInfo

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use tracing::{debug, trace, warn};
use vc_utils::TypeCache;
use vc_utils::hash::{FixedHashState, HashMap};

use crate::info::{MemberDescriptor, RecordInfo, TypeInfo, TypeKind};

// -----------------------------------------------------------------------------
// MemberTable

/// Indexed members of one record type.
pub struct MemberTable {
    members: Vec<MemberDescriptor>,
    index: HashMap<Box<str>, usize>,
    sorted: Vec<usize>,
    case_sensitive: bool,
}

#[inline]
fn fold_case(name: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive || (name.is_ascii() && !name.bytes().any(|b| b.is_ascii_uppercase())) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(name.to_lowercase())
    }
}

static EMPTY: MemberTable = MemberTable {
    members: Vec::new(),
    index: HashMap::with_hasher(FixedHashState),
    sorted: Vec::new(),
    case_sensitive: true,
};

impl MemberTable {
    fn build<'a>(
        type_path: &str,
        candidates: impl Iterator<Item = &'a MemberDescriptor>,
        case_sensitive: bool,
    ) -> Self {
        let mut members = Vec::new();
        let mut index = HashMap::default();

        for member in candidates {
            if member.name().is_empty() {
                warn!(type_path, "skipping member with an empty name");
                continue;
            }
            let key: Box<str> = fold_case(member.name(), case_sensitive).into();
            if index.contains_key(&key) {
                warn!(
                    type_path,
                    member = member.name(),
                    case_sensitive,
                    "skipping duplicate member"
                );
                continue;
            }
            index.insert(key, members.len());
            members.push(*member);
        }

        let mut sorted: Vec<usize> = (0..members.len()).collect();
        sorted.sort_by(|&a, &b| members[a].name().cmp(members[b].name()));

        Self {
            members,
            index,
            sorted,
            case_sensitive,
        }
    }

    /// Iterates over the members in declaration order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, MemberDescriptor> {
        self.members.iter()
    }

    /// Iterates over the members in lexicographic name order.
    pub fn sorted(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.sorted.iter().map(|&i| &self.members[i])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `true` if lookups compare names exactly.
    #[inline]
    pub const fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Looks a member up by name, lowercasing the probe in a
    /// case-insensitive table.
    pub fn get(&self, name: &str) -> Option<&MemberDescriptor> {
        let key = fold_case(name, self.case_sensitive);
        self.index.get(key.as_ref()).map(|&i| &self.members[i])
    }
}

impl fmt::Debug for MemberTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.members.iter().map(MemberDescriptor::name))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Cache

/// `[public exact, public folded, all exact, all folded]`
type Tables = [MemberTable; 4];

static TABLES: TypeCache<Tables> = TypeCache::new();

fn build_tables(info: &TypeInfo, record: &RecordInfo) -> Tables {
    let path = info.path();

    let usable = |m: &&MemberDescriptor| {
        let keep = !m.is_ignored() && (m.can_read() || m.can_write());
        if !keep {
            trace!(type_path = path, member = m.name(), "member excluded");
        }
        keep
    };
    let public = || record.members().iter().filter(usable).filter(|m| m.is_public());
    let all = || record.members().iter().filter(usable);

    let tables = [
        MemberTable::build(path, public(), true),
        MemberTable::build(path, public(), false),
        MemberTable::build(path, all(), true),
        MemberTable::build(path, all(), false),
    ];
    debug!(
        type_path = path,
        public = tables[0].len(),
        all = tables[2].len(),
        "member tables built"
    );
    tables
}

#[inline]
fn lookup(info: &TypeInfo, slot: usize) -> &'static MemberTable {
    match info.kind() {
        TypeKind::Record(record) => {
            &TABLES.get_or_build(info.id(), || build_tables(info, record))[slot]
        }
        _ => &EMPTY,
    }
}

/// Returns the public, readable or writable members of a record type.
///
/// Non-record types yield an empty table.
///
/// # Examples
///
/// ```
/// use vc_reflect::{derive::Reflect, info::Typed, members::get_members};
///
/// #[derive(Reflect, Default)]
/// pub struct Account {
///     pub owner: String,
///     #[reflect(ignore)]
///     pub cache: u32,
///     secret: u64,
/// }
///
/// let table = get_members(Account::type_info(), false);
/// assert_eq!(table.len(), 1);
/// assert!(table.get("OWNER").is_some());
/// ```
#[inline]
pub fn get_members(info: &TypeInfo, case_sensitive: bool) -> &'static MemberTable {
    lookup(info, usize::from(!case_sensitive))
}

/// Returns every readable or writable member, public or not.
///
/// Used for records that only carry private state (tuple structs, records
/// without any public member).
#[inline]
pub fn get_all_field_members(info: &TypeInfo, case_sensitive: bool) -> &'static MemberTable {
    lookup(info, 2 + usize::from(!case_sensitive))
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{get_all_field_members, get_members};
    use crate::derive::Reflect;
    use crate::info::Typed;

    #[allow(non_snake_case)]
    #[derive(Reflect, Default)]
    struct Mixed {
        pub zeta: u8,
        pub Alpha: String,
        #[reflect(read_only)]
        pub id: u64,
        #[reflect(ignore)]
        pub skipped: bool,
        hidden: i32,
    }

    #[allow(non_snake_case)]
    #[derive(Reflect, Default)]
    struct Clash {
        pub Name: u8,
        pub name: u8,
    }

    #[test]
    fn public_members_in_declaration_order() {
        let table = get_members(Mixed::type_info(), true);
        let names: Vec<&str> = table.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["zeta", "Alpha", "id"]);

        let sorted: Vec<&str> = table.sorted().map(|m| m.name()).collect();
        assert_eq!(sorted, ["Alpha", "id", "zeta"]);
    }

    #[test]
    fn all_fields_include_private() {
        let table = get_all_field_members(Mixed::type_info(), true);
        assert_eq!(table.len(), 4);
        assert!(table.get("hidden").is_some());
    }

    #[test]
    fn case_folding() {
        let exact = get_members(Mixed::type_info(), true);
        assert!(exact.get("alpha").is_none());

        let folded = get_members(Mixed::type_info(), false);
        assert_eq!(folded.get("ALPHA").map(|m| m.name()), Some("Alpha"));
    }

    #[test]
    fn duplicates_only_collide_when_folded() {
        assert_eq!(get_members(Clash::type_info(), true).len(), 2);
        assert_eq!(get_members(Clash::type_info(), false).len(), 1);
    }

    #[test]
    fn cache_hits_are_shared() {
        let a = get_members(Mixed::type_info(), true);
        let b = get_members(Mixed::type_info(), true);
        assert!(core::ptr::eq(a, b));
        assert!(get_members(<Vec<u8>>::type_info(), true).is_empty());
    }
}
