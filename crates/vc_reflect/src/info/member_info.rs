use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;
use crate::info::TypeInfo;

/// Reads a member out of its owner, `None` when the owner has the wrong type.
pub type MemberGetFn = fn(&dyn Reflect) -> Option<&dyn Reflect>;

/// Writes a member into its owner, returning the value back on a type mismatch.
pub type MemberSetFn = fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

// -----------------------------------------------------------------------------
// MemberDescriptor

/// One named slot of a record type.
///
/// Generated by [`#[derive(Reflect)]`](crate::derive::Reflect) once per type
/// and never modified afterwards. The accessors are plain function pointers
/// bound to the slot.
///
/// # Examples
///
/// ```
/// use vc_reflect::{derive::Reflect, info::Typed};
///
/// #[derive(Reflect, Default)]
/// struct User {
///     name: String,
///     #[reflect(read_only)]
///     id: u64,
/// }
///
/// let record = User::type_info().as_record().unwrap();
/// let id = &record.members()[1];
///
/// assert_eq!(id.name(), "id");
/// assert!(id.can_read() && !id.can_write());
/// assert!(id.declared().type_is::<u64>());
///
/// let user = User { name: "ann".into(), id: 7 };
/// let value = id.get(&user).unwrap();
/// assert_eq!(value.downcast_ref::<u64>(), Some(&7));
/// ```
#[derive(Clone, Copy)]
pub struct MemberDescriptor {
    name: &'static str,
    declared: fn() -> &'static TypeInfo,
    get: MemberGetFn,
    set: MemberSetFn,
    can_read: bool,
    can_write: bool,
    public: bool,
    ignored: bool,
}

impl MemberDescriptor {
    /// Creates a public, readable and writable member.
    #[inline]
    pub const fn new(
        name: &'static str,
        declared: fn() -> &'static TypeInfo,
        get: MemberGetFn,
        set: MemberSetFn,
    ) -> Self {
        Self {
            name,
            declared,
            get,
            set,
            can_read: true,
            can_write: true,
            public: true,
            ignored: false,
        }
    }

    /// Marks the member as not writable.
    #[inline]
    pub const fn read_only(mut self) -> Self {
        self.can_write = false;
        self
    }

    /// Marks the member as not readable.
    #[inline]
    pub const fn write_only(mut self) -> Self {
        self.can_read = false;
        self
    }

    /// Marks the member as non-public storage.
    #[inline]
    pub const fn private(mut self) -> Self {
        self.public = false;
        self
    }

    /// Marks the member as excluded from conversion.
    #[inline]
    pub const fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Returns the member name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared type of the member.
    #[inline]
    pub fn declared(&self) -> &'static TypeInfo {
        (self.declared)()
    }

    #[inline]
    pub const fn can_read(&self) -> bool {
        self.can_read
    }

    #[inline]
    pub const fn can_write(&self) -> bool {
        self.can_write
    }

    #[inline]
    pub const fn is_public(&self) -> bool {
        self.public
    }

    #[inline]
    pub const fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Reads the member of `owner`.
    ///
    /// Returns `None` when the member is not readable or `owner` is not an
    /// instance of the declaring type.
    #[inline]
    pub fn get<'a>(&self, owner: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        if self.can_read { (self.get)(owner) } else { None }
    }

    /// Writes the member of `owner`.
    ///
    /// Returns the value back when the member is not writable, `owner` is not
    /// an instance of the declaring type, or `value` is not of the declared type.
    #[inline]
    pub fn set(
        &self,
        owner: &mut dyn Reflect,
        value: Box<dyn Reflect>,
    ) -> Result<(), Box<dyn Reflect>> {
        if self.can_write { (self.set)(owner, value) } else { Err(value) }
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("can_read", &self.can_read)
            .field("can_write", &self.can_write)
            .field("public", &self.public)
            .field("ignored", &self.ignored)
            .finish_non_exhaustive()
    }
}
