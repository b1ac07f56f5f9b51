use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;
use vc_utils::TypeIdMap;
use vc_utils::hash::{HashMap, HashSet};

use crate::Reflect;
use crate::impls::{Bytes, Expando};
use crate::info::{TypeInfo, Typed};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of [reflected] types, looked up by [`TypeId`], full type path
/// or short type name.
///
/// This is where embedded type tags are resolved back into types.
///
/// # Example
///
/// ```
/// use vc_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
///
/// let info = registry.get_with_type_name("String").unwrap();
/// assert_eq!(info.path(), "alloc::string::String");
///
/// let zero = info.default_value().unwrap();
/// assert_eq!(zero.take::<String>().unwrap(), "");
/// ```
///
/// [reflected]: crate
pub struct TypeRegistry {
    type_info_table: TypeIdMap<&'static TypeInfo>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    #[inline]
    pub fn empty() -> Self {
        Self {
            type_info_table: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
        }
    }

    /// Create a type registry with default registrations for the built-in leaves.
    ///
    /// - `()` `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `String` `Bytes` `DateTime<Utc>`
    /// - `Box<dyn Reflect>` `Expando`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<()>();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<Bytes>();
        registry.register::<chrono::DateTime<chrono::Utc>>();
        registry.register::<Box<dyn Reflect>>();
        registry.register::<Expando>();
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(&mut self, ty: &'static TypeInfo) {
        let type_name = ty.name();

        if !self.ambiguous_names.contains(type_name) {
            if self.type_name_to_id.contains_key(type_name) {
                self.type_name_to_id.remove(type_name);
                self.ambiguous_names.insert(type_name);
            } else {
                self.type_name_to_id.insert(type_name, ty.id());
            }
        }

        // Distinct types may share a path (hashers without a name), first wins.
        self.type_path_to_id.entry(ty.path()).or_insert(ty.id());
    }

    /// Attempts to register `info` if it has not yet been registered already,
    /// then its dependencies (see [`TypeInfo::dependencies`]).
    ///
    /// Returns `true` if `info` itself was new.
    pub fn register_info(&mut self, info: &'static TypeInfo) -> bool {
        if self.type_info_table.contains(&info.id()) {
            return false;
        }
        self.type_info_table.insert(info.id(), info);
        self.add_new_type_indices(info);
        debug!(type_path = info.path(), "type registered");

        for dep in info.dependencies() {
            self.register_info(dep);
        }
        true
    }

    /// Attempts to register the type `T` if it has not yet been registered already.
    ///
    /// This will also recursively register every type `T` refers to: generic
    /// arguments, container elements and the declared types of record members.
    /// Types are never registered more than once, so cyclic type graphs are
    /// fine.
    ///
    /// # Example
    ///
    /// ```
    /// # use core::any::TypeId;
    /// # use vc_reflect::{derive::Reflect, registry::TypeRegistry};
    /// #[derive(Reflect, Default)]
    /// struct Foo {
    ///   name: Option<String>,
    ///   value: i32
    /// }
    ///
    /// let mut type_registry = TypeRegistry::empty();
    ///
    /// type_registry.register::<Foo>();
    ///
    /// // The main type
    /// assert!(type_registry.contains(TypeId::of::<Foo>()));
    ///
    /// // Its type dependencies
    /// assert!(type_registry.contains(TypeId::of::<Option<String>>()));
    /// assert!(type_registry.contains(TypeId::of::<i32>()));
    /// ```
    #[inline]
    pub fn register<T: Typed>(&mut self) -> bool {
        self.register_info(T::type_info())
    }

    /// Automatically registers all non-generic types annotated with
    /// `#[reflect(auto_register)]`.
    ///
    /// This method is equivalent to calling [`register`](Self::register) for each qualifying type.
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration is available, `false` when
    /// the `auto_register` feature is disabled.
    ///
    /// ## Platform Support
    ///
    /// Supported platforms include Linux, macOS, Windows, iOS, Android, and Web, enabled by
    /// the `inventory` crate.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::any::TypeId;
    /// # use vc_reflect::{derive::Reflect, registry::TypeRegistry};
    /// #[derive(Reflect, Default)]
    /// #[reflect(auto_register)]
    /// struct Foo {
    ///     name: Option<String>,
    ///     value: i32,
    /// }
    ///
    /// let mut type_registry = TypeRegistry::empty();
    /// assert!(type_registry.auto_register());
    ///
    /// assert!(type_registry.contains(TypeId::of::<Foo>()));
    /// assert!(type_registry.contains(TypeId::of::<Option<String>>()));
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register::{AutoRegistration, inventory};

            let infos: Vec<&'static TypeInfo> = inventory::iter::<AutoRegistration>
                .into_iter()
                .map(|reg| (reg.0)())
                .collect();
            for info in infos {
                self.register_info(info);
            }
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Whether the type with given [`TypeId`] has been registered in this registry.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_info_table.contains(&type_id)
    }

    /// Returns the [`TypeInfo`] of the type with the given [`TypeId`].
    ///
    /// If the specified type has not been registered, returns `None`.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.type_info_table.get(&type_id).copied()
    }

    /// Returns the [`TypeInfo`] of the type with the given [type path].
    ///
    /// If no type with the given type path has been registered, returns `None`.
    ///
    /// [type path]: crate::info::TypeInfo::path
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&'static TypeInfo> {
        // Manual inline
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns the [`TypeInfo`] of the type with the given [type name].
    ///
    /// If the type name is ambiguous, or if no type with the given name
    /// has been registered, returns `None`.
    ///
    /// [type name]: crate::info::TypeInfo::name
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&'static TypeInfo> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if the given [type name] is ambiguous, that is, it
    /// matches multiple registered types.
    ///
    /// # Example
    /// ```
    /// # use vc_reflect::registry::TypeRegistry;
    /// # mod foo {
    /// #     use vc_reflect::derive::Reflect;
    /// #     #[derive(Reflect, Default)]
    /// #     pub struct MyType;
    /// # }
    /// # mod bar {
    /// #     use vc_reflect::derive::Reflect;
    /// #     #[derive(Reflect, Default)]
    /// #     pub struct MyType;
    /// # }
    /// let mut type_registry = TypeRegistry::default();
    /// type_registry.register::<foo::MyType>();
    /// type_registry.register::<bar::MyType>();
    /// assert_eq!(type_registry.is_ambiguous("MyType"), true);
    /// ```
    ///
    /// [type name]: crate::info::TypeInfo::name
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.type_info_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_info_table.is_empty()
    }

    /// Returns an iterator over the registered types.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static TypeInfo> + '_ {
        self.type_info_table.values().copied()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the process-wide registry.
    ///
    /// Created on first access with the built-in leaves and every
    /// `#[reflect(auto_register)]` type.
    pub fn global() -> &'static TypeRegistryArc {
        static GLOBAL: OnceLock<TypeRegistryArc> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let mut registry = TypeRegistry::new();
            registry.auto_register();
            TypeRegistryArc {
                internal: Arc::new(RwLock::new(registry)),
            }
        })
    }
}

impl fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read().type_path_to_id.keys().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use super::{TypeRegistry, TypeRegistryArc};
    use crate::Reflect;
    use crate::derive::Reflect;
    use crate::impls::Shared;

    #[derive(Reflect, Default)]
    struct Node {
        label: String,
        next: Option<Shared<Node>>,
    }

    #[test]
    fn cyclic_types_register_once() {
        let mut registry = TypeRegistry::empty();
        assert!(registry.register::<Node>());
        assert!(!registry.register::<Node>());

        assert!(registry.contains(TypeId::of::<Shared<Node>>()));
        assert!(registry.contains(TypeId::of::<String>()));
    }

    #[test]
    fn lookups() {
        let mut registry = TypeRegistry::new();
        registry.register::<Vec<u8>>();

        let by_path = registry.get_with_type_path("alloc::vec::Vec<u8>").unwrap();
        let by_name = registry.get_with_type_name("Vec<u8>").unwrap();
        assert!(core::ptr::eq(by_path, by_name));
        assert!(registry.get_with_type_name("Vec<u16>").is_none());
    }

    #[test]
    fn builtins_are_registered() {
        let registry = TypeRegistry::new();
        assert!(registry.contains(TypeId::of::<String>()));
        assert!(registry.contains(TypeId::of::<Box<dyn Reflect>>()));
        assert!(!TypeRegistry::empty().contains(TypeId::of::<String>()));
    }

    #[test]
    fn global_is_shared() {
        let a = TypeRegistryArc::global();
        let b = TypeRegistryArc::global();
        assert!(core::ptr::eq(a, b));
        assert!(a.read().contains(TypeId::of::<bool>()));
    }
}
