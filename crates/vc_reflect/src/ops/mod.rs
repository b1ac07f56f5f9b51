//! Provide the capability views of reflected values.
//!
//! ## Menu
//!
//! [`ReflectRef`] is the closed set of capabilities a value can expose. Each
//! composite capability is a subtrait of [`Reflect`]:
//!
//! - [`List`]: sequences (e.g. `Vec<i32>`, `HashSet<String>`, `[u8; 4]`).
//! - [`Map`]: dictionaries (e.g. `HashMap<String, f32>`).
//! - [`Enum`]: field-less enum values.
//! - [`DynamicRecord`]: records carrying members not declared by their type.
//! - [`SharedRef`]: identity-bearing shared cells, the only way to build cycles.
//!
//! Leaves are read as [`PrimitiveRef`], owned leaves are [`Primitive`].
//!
//! [`Reflect`]: crate::Reflect

// -----------------------------------------------------------------------------
// Modules

mod enum_ops;
mod kind;
mod list_ops;
mod map_ops;
mod primitive;
mod record_ops;
mod shared_ops;

// -----------------------------------------------------------------------------
// Exports

pub use enum_ops::Enum;
pub use kind::ReflectRef;
pub use list_ops::List;
pub use map_ops::Map;
pub use primitive::{Primitive, PrimitiveRef};
pub use record_ops::DynamicRecord;
pub use shared_ops::SharedRef;
