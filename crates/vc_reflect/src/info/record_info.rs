use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::info::MemberDescriptor;

// -----------------------------------------------------------------------------
// RecordInfo

/// Type information of a record: a struct walked member by member.
///
/// - `tuple_like`: members are positional (`struct A(u8, u8)`), named `"0"`, `"1"`, ...
/// - `dynamic`: instances also carry members their type does not declare, see
///   [`DynamicRecord`](crate::ops::DynamicRecord).
pub struct RecordInfo {
    members: Box<[MemberDescriptor]>,
    tuple_like: bool,
    dynamic: bool,
}

impl RecordInfo {
    /// Creates a new [`RecordInfo`] from its members in declaration order.
    pub fn new(members: Vec<MemberDescriptor>) -> Self {
        Self {
            members: members.into_boxed_slice(),
            tuple_like: false,
            dynamic: false,
        }
    }

    /// Marks the members as positional.
    #[inline]
    pub fn tuple_like(mut self) -> Self {
        self.tuple_like = true;
        self
    }

    /// Marks instances as carrying dynamic members.
    #[inline]
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    /// Returns every declared member, including ignored and private ones.
    #[inline]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    #[inline]
    pub const fn is_tuple_like(&self) -> bool {
        self.tuple_like
    }

    #[inline]
    pub const fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

impl fmt::Debug for RecordInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordInfo")
            .field("members", &self.members)
            .field("tuple_like", &self.tuple_like)
            .field("dynamic", &self.dynamic)
            .finish()
    }
}
