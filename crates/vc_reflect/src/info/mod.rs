//! Provide compile-time type information.
//!
//! ## Menu
//!
//! - [`TypeInfo`]: per-type metadata (id, path, short name, generics, zero
//!   value) plus a [`TypeKind`], one of:
//!     - [`PrimitiveInfo`]: a leaf such as `i32`, `String` or a date.
//!     - [`EnumInfo`]: a field-less enum, with its [`VariantInfo`]s.
//!     - [`NullableInfo`]: an optional value such as `Option<T>`.
//!     - [`ListInfo`]: a sequence, see [`ListFlavor`].
//!     - [`MapInfo`]: a dictionary, see [`MapFlavor`].
//!     - [`RecordInfo`]: a struct, with its [`MemberDescriptor`]s.
//!     - [`SharedInfo`]: an identity-bearing shared cell.
//!     - `Any`: a polymorphic `Box<dyn Reflect>` slot.
//!     - `Opaque`: a value carrying its own representation.
//! - [`ReflectKind`]: field-less discriminator of [`TypeKind`].
//! - [`Typed`]: a trait for obtaining `TypeInfo` data.

// -----------------------------------------------------------------------------
// Modules

mod container_info;
mod enum_info;
mod member_info;
mod primitive_info;
mod record_info;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use container_info::{CollectFn, CollectPairsFn, WrapFn};
pub use container_info::{ListFlavor, ListInfo, MapFlavor, MapInfo, NullableInfo, SharedInfo};
pub use enum_info::{EnumInfo, VariantInfo};
pub use member_info::{MemberDescriptor, MemberGetFn, MemberSetFn};
pub use primitive_info::{PrimitiveInfo, PrimitiveKind};
pub use record_info::RecordInfo;
pub use type_info::{ReflectKind, ReflectKindError, TypeInfo, TypeKind};
pub use typed::Typed;
