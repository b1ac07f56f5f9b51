//! Provide reflection for built-in types, and some utilities for
//! implementing reflection traits.
//!
//! - [`NonGenericTypeInfoCell`]: Used to implement [`Typed`] for non-generic types.
//! - [`GenericTypeInfoCell`]: Used to implement [`Typed`] for generic types.
//! - [`Bytes`], [`Shared`], [`Expando`]: reflected building blocks without a
//!   std counterpart.
//!
//! ## Implemented Menu
//!
//! - primitives:
//!     - `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`
//!     - `bool`, `char`, `String`, `()`
//!     - `chrono::DateTime<Utc>`, [`Bytes`]
//! - nullable: `Option<T>`
//! - lists:
//!     - `Vec<T>`, `VecDeque<T>`, `Box<[T]>`, `[T; N]`
//!     - `HashSet<T, S>`, `BTreeSet<T>`
//!     - `Arc<[T]>` (read-only)
//! - maps:
//!     - `HashMap<K, V, S>`, `BTreeMap<K, V>`
//!     - `Arc<BTreeMap<K, V>>` (read-only)
//! - polymorphic: `Box<dyn Reflect>`
//! - shared: [`Shared<T>`]
//! - dynamic record: [`Expando`]
//!
//! [`Typed`]: crate::info::Typed

// -----------------------------------------------------------------------------
// Modules

mod any;
mod bytes;
mod cell;
mod expando;
mod maps;
mod option;
mod primitives;
mod sequences;
mod shared;

// -----------------------------------------------------------------------------
// Exports

pub use bytes::Bytes;
pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use expando::Expando;
pub use shared::Shared;
