//! Provide type registry for name based type lookup.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: A container of `&'static TypeInfo`, indexed by
//!   [`TypeId`], full type path and unambiguous short type name.
//! - [`TypeRegistryArc`]: A shareable, lockable registry, see
//!   [`TypeRegistryArc::global`].
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`] .
//!
//! We use [`inventory`] crate to implement static registration,
//! not all platforms support it (although major platforms do).
//!
//! [`TypeId`]: core::any::TypeId
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use type_registry::{TypeRegistry, TypeRegistryArc};
