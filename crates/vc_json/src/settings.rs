//! Configuration records read at every decision point.
//!
//! Both records are plain values: clone them, tweak them with the `with_*`
//! builders, and pass them by reference. A call never mutates its settings.

use alloc::sync::Arc;
use core::fmt;

use crate::binder::TypeBinder;

// -----------------------------------------------------------------------------
// Options

/// When a composite node is prefixed with a `$type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeTagPolicy {
    /// Never.
    #[default]
    None,
    /// Every map, record and sequence, plus the root and ambiguous primitives.
    All,
    /// Maps and records only.
    Objects,
    /// Sequences only.
    Arrays,
    /// Only where the runtime type differs from the declared type of the slot.
    Auto,
}

/// Which name is written in a `$type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeNameFormat {
    /// The full type path, e.g. `my_crate::shapes::Circle`.
    #[default]
    Full,
    /// The short type name, e.g. `Circle`.
    Short,
}

/// How dates are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `"2024-05-01T10:00:00Z"`
    #[default]
    Iso8601,
    /// `"/Date(1714557600000)/"`, milliseconds since the Unix epoch.
    Epoch,
}

/// Whitespace of the emitted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Formatting {
    #[default]
    Compact,
    /// One entry per line, indented by the given number of spaces per level.
    Indented(usize),
}

// -----------------------------------------------------------------------------
// SerializeSettings

/// Settings of canonicalization and text emission.
///
/// # Examples
///
/// ```
/// use vc_json::{SerializeSettings, TypeTagPolicy};
///
/// let mut settings = SerializeSettings::DEFAULT
///     .with_type_tags(TypeTagPolicy::Auto)
///     .with_order_names(true);
/// assert_eq!(settings.type_tags, TypeTagPolicy::Auto);
///
/// settings.reset();
/// assert_eq!(settings.type_tags, TypeTagPolicy::None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeSettings {
    pub type_tags: TypeTagPolicy,
    pub type_name_format: TypeNameFormat,
    /// Omit null members and map entries.
    pub ignore_null_values: bool,
    /// Omit null sequence items.
    pub ignore_null_list_items: bool,
    /// Raise on a cycle instead of writing `null`.
    pub raise_on_circular_ref: bool,
    /// Maximum number of nested maps, records and sequences.
    pub max_object_depth: usize,
    /// Raise when `max_object_depth` is exceeded instead of writing an empty
    /// container.
    pub raise_on_max_depth: bool,
    /// Sort keys lexicographically at every map and record.
    pub order_names: bool,
    /// When `false`, member names are lowercased on write.
    pub case_sensitive: bool,
    pub formatting: Formatting,
    /// Escape control characters. Quotes and backslashes are always escaped.
    pub escape_control: bool,
    /// Escape every non-ASCII character as `\uXXXX`.
    pub escape_non_ascii: bool,
    /// Write enum values as their discriminant instead of their variant name.
    pub enum_as_number: bool,
    pub date_format: DateFormat,
}

impl SerializeSettings {
    /// The default settings: untagged, compact, case-sensitive, encounter
    /// order, best effort on cycles and depth (64 levels).
    pub const DEFAULT: Self = Self {
        type_tags: TypeTagPolicy::None,
        type_name_format: TypeNameFormat::Full,
        ignore_null_values: false,
        ignore_null_list_items: false,
        raise_on_circular_ref: false,
        max_object_depth: 64,
        raise_on_max_depth: false,
        order_names: false,
        case_sensitive: true,
        formatting: Formatting::Compact,
        escape_control: true,
        escape_non_ascii: false,
        enum_as_number: false,
        date_format: DateFormat::Iso8601,
    };

    /// Restores [`DEFAULT`](Self::DEFAULT).
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::DEFAULT;
    }

    #[inline]
    pub const fn with_type_tags(mut self, policy: TypeTagPolicy) -> Self {
        self.type_tags = policy;
        self
    }

    #[inline]
    pub const fn with_type_name_format(mut self, format: TypeNameFormat) -> Self {
        self.type_name_format = format;
        self
    }

    #[inline]
    pub const fn with_ignore_null_values(mut self, ignore: bool) -> Self {
        self.ignore_null_values = ignore;
        self
    }

    #[inline]
    pub const fn with_ignore_null_list_items(mut self, ignore: bool) -> Self {
        self.ignore_null_list_items = ignore;
        self
    }

    #[inline]
    pub const fn with_raise_on_circular_ref(mut self, raise: bool) -> Self {
        self.raise_on_circular_ref = raise;
        self
    }

    #[inline]
    pub const fn with_max_object_depth(mut self, depth: usize) -> Self {
        self.max_object_depth = depth;
        self
    }

    #[inline]
    pub const fn with_raise_on_max_depth(mut self, raise: bool) -> Self {
        self.raise_on_max_depth = raise;
        self
    }

    #[inline]
    pub const fn with_order_names(mut self, order: bool) -> Self {
        self.order_names = order;
        self
    }

    #[inline]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[inline]
    pub const fn with_formatting(mut self, formatting: Formatting) -> Self {
        self.formatting = formatting;
        self
    }

    #[inline]
    pub const fn with_escape_control(mut self, escape: bool) -> Self {
        self.escape_control = escape;
        self
    }

    #[inline]
    pub const fn with_escape_non_ascii(mut self, escape: bool) -> Self {
        self.escape_non_ascii = escape;
        self
    }

    #[inline]
    pub const fn with_enum_as_number(mut self, as_number: bool) -> Self {
        self.enum_as_number = as_number;
        self
    }

    #[inline]
    pub const fn with_date_format(mut self, format: DateFormat) -> Self {
        self.date_format = format;
        self
    }
}

impl Default for SerializeSettings {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

// -----------------------------------------------------------------------------
// DeserializeSettings

/// Settings of rehydration.
#[derive(Clone)]
pub struct DeserializeSettings {
    /// When `false`, keys match member and variant names ignoring case.
    pub case_sensitive: bool,
    /// Raise on a key that matches no member instead of dropping it.
    pub raise_on_missing_member: bool,
    /// Resolve `$type` tags met under polymorphic slots. When `false`, such
    /// slots always receive the canonical [`Value`](crate::Value).
    pub trust_type_tags: bool,
    /// Redirects type names before the registry lookup.
    pub binder: Option<Arc<dyn TypeBinder>>,
    /// Maximum number of nested maps, records and sequences.
    pub max_object_depth: usize,
    /// Raise when `max_object_depth` is exceeded instead of using the zero
    /// value of the branch.
    pub raise_on_max_depth: bool,
}

impl DeserializeSettings {
    /// The default settings: case-sensitive, tolerant of unknown keys,
    /// trusting tags, no binder, 64 levels.
    pub const DEFAULT: Self = Self {
        case_sensitive: true,
        raise_on_missing_member: false,
        trust_type_tags: true,
        binder: None,
        max_object_depth: 64,
        raise_on_max_depth: false,
    };

    /// Restores [`DEFAULT`](Self::DEFAULT).
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::DEFAULT;
    }

    #[inline]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[inline]
    pub fn with_raise_on_missing_member(mut self, raise: bool) -> Self {
        self.raise_on_missing_member = raise;
        self
    }

    #[inline]
    pub fn with_trust_type_tags(mut self, trust: bool) -> Self {
        self.trust_type_tags = trust;
        self
    }

    /// Installs a [`TypeBinder`], closures `Fn(&str) -> Option<&'static TypeInfo>` qualify.
    ///
    /// [`TypeInfo`]: vc_reflect::info::TypeInfo
    #[inline]
    pub fn with_binder(mut self, binder: impl TypeBinder + 'static) -> Self {
        self.binder = Some(Arc::new(binder));
        self
    }

    #[inline]
    pub fn with_max_object_depth(mut self, depth: usize) -> Self {
        self.max_object_depth = depth;
        self
    }

    #[inline]
    pub fn with_raise_on_max_depth(mut self, raise: bool) -> Self {
        self.raise_on_max_depth = raise;
        self
    }
}

impl Default for DeserializeSettings {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for DeserializeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeserializeSettings")
            .field("case_sensitive", &self.case_sensitive)
            .field("raise_on_missing_member", &self.raise_on_missing_member)
            .field("trust_type_tags", &self.trust_type_tags)
            .field("binder", &self.binder.is_some())
            .field("max_object_depth", &self.max_object_depth)
            .field("raise_on_max_depth", &self.raise_on_max_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use vc_reflect::info::TypeInfo;

    use super::{DeserializeSettings, Formatting, SerializeSettings};

    #[test]
    fn reset_restores_defaults() {
        let mut ser = SerializeSettings::default()
            .with_formatting(Formatting::Indented(2))
            .with_max_object_depth(3);
        ser.reset();
        assert_eq!(ser, SerializeSettings::DEFAULT);

        let mut de = DeserializeSettings::default()
            .with_raise_on_missing_member(true)
            .with_binder(|_: &str| -> Option<&'static TypeInfo> { None });
        assert!(de.binder.is_some());
        de.reset();
        assert!(de.binder.is_none() && !de.raise_on_missing_member);
    }
}
