//! Resolution of `$type` names back to types.
//!
//! A name is first offered to the [`TypeBinder`] of the settings, then looked
//! up in the global [`TypeRegistry`] (full path first, then unambiguous short
//! name). Registry hits are memoized per name for the process lifetime.
//!
//! [`TypeRegistry`]: vc_reflect::registry::TypeRegistry

use alloc::boxed::Box;

use tracing::debug;
use vc_reflect::info::TypeInfo;
use vc_reflect::registry::TypeRegistryArc;
use vc_utils::MemoCache;

use crate::DeserializeSettings;

/// Hook redirecting a stored type name to a type, e.g. from an interface
/// name to a concrete type, or from a renamed type to its new definition.
///
/// Returning `None` falls back to the registry.
pub trait TypeBinder: Send + Sync {
    fn bind(&self, name: &str) -> Option<&'static TypeInfo>;
}

impl<F> TypeBinder for F
where
    F: Fn(&str) -> Option<&'static TypeInfo> + Send + Sync,
{
    #[inline]
    fn bind(&self, name: &str) -> Option<&'static TypeInfo> {
        self(name)
    }
}

static RESOLVED: MemoCache<Box<str>, &'static TypeInfo> = MemoCache::new();

/// Resolves a stored type name.
///
/// Failure is not an error: the caller falls back to the canonical
/// [`Value`](crate::Value).
///
/// # Examples
///
/// ```
/// use vc_json::{DeserializeSettings, bind_to_type, register};
/// use vc_reflect::{derive::Reflect, info::{TypeInfo, Typed}};
///
/// #[derive(Reflect, Default)]
/// #[reflect(type_path = "shapes::Circle")]
/// struct Circle { radius: f64 }
///
/// register::<Circle>();
/// let settings = DeserializeSettings::DEFAULT;
/// assert!(bind_to_type("shapes::Circle", &settings).unwrap().type_is::<Circle>());
/// assert!(bind_to_type("Circle", &settings).unwrap().type_is::<Circle>());
///
/// let renamed = settings.with_binder(|name: &str| -> Option<&'static TypeInfo> {
///     (name == "shapes::Round").then(Circle::type_info)
/// });
/// assert!(bind_to_type("shapes::Round", &renamed).unwrap().type_is::<Circle>());
/// ```
pub fn bind_to_type(name: &str, settings: &DeserializeSettings) -> Option<&'static TypeInfo> {
    if let Some(binder) = &settings.binder
        && let Some(info) = binder.bind(name)
    {
        return Some(info);
    }

    if let Some(info) = RESOLVED.get(name) {
        return Some(*info);
    }

    let found = {
        let registry = TypeRegistryArc::global().read();
        registry
            .get_with_type_path(name)
            .or_else(|| registry.get_with_type_name(name))
    };

    match found {
        Some(info) => Some(*RESOLVED.insert(name.into(), info)),
        None => {
            debug!(name, "type resolution failed, falling back to the canonical value");
            None
        }
    }
}

/// Makes sure `info` can be resolved from the names written in tags.
pub(crate) fn ensure_registered(info: &'static TypeInfo) {
    let global = TypeRegistryArc::global();
    if !global.read().contains(info.id()) {
        global.write().register_info(info);
    }
}
