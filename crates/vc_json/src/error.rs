use alloc::string::String;
use std::io;

use thiserror::Error;

/// Errors raised by the codec.
///
/// Only the configurable guards and truly contradictory states raise: an
/// unreadable member, an unknown key or an unresolvable type tag is skipped
/// (and logged) instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A value is its own ancestor and `raise_on_circular_ref` is set.
    #[error("circular reference detected on `{type_path}`")]
    CircularReference { type_path: String },

    /// The graph is nested deeper than `max_object_depth` and
    /// `raise_on_max_depth` is set.
    #[error("maximum object depth of {max_depth} exceeded")]
    MaxDepthExceeded { max_depth: usize },

    /// A key matches no member of the target record and
    /// `raise_on_missing_member` is set.
    #[error("`{type_path}` has no member `{member}`")]
    MissingMember { type_path: String, member: String },

    /// The value cannot become the requested type, even through its zero value.
    #[error("cannot produce `{expected}` from {found}")]
    IncompatibleTargetType { expected: String, found: String },

    /// The text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The text writer failed.
    #[error("cannot write JSON text: {0}")]
    Write(#[from] io::Error),
}

/// Alias of `Result<T, vc_json::Error>`.
pub type Result<T, E = Error> = core::result::Result<T, E>;
