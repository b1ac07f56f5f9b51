use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::info::TypeInfo;

/// Builds a container from converted items, `None` when an item has the
/// wrong type or the item count does not fit.
pub type CollectFn = fn(Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>>;

/// Builds a map from converted key/value pairs.
pub type CollectPairsFn = fn(Vec<(Box<dyn Reflect>, Box<dyn Reflect>)>) -> Option<Box<dyn Reflect>>;

/// Turns a populated backing container into the read-only target type.
pub type WrapFn = fn(Box<dyn Reflect>) -> Option<Box<dyn Reflect>>;

// -----------------------------------------------------------------------------
// NullableInfo

/// Type information of an optional value.
pub struct NullableInfo {
    inner: fn() -> &'static TypeInfo,
    wrap: fn(Option<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl NullableInfo {
    /// Creates a new [`NullableInfo`].
    #[inline]
    pub const fn new(
        inner: fn() -> &'static TypeInfo,
        wrap: fn(Option<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
    ) -> Self {
        Self { inner, wrap }
    }

    /// Returns the type information of the wrapped type.
    #[inline]
    pub fn inner(&self) -> &'static TypeInfo {
        (self.inner)()
    }

    /// Wraps an inner value (or nothing) into the nullable type.
    ///
    /// Returns the input back when it is not of the inner type.
    #[inline]
    pub fn wrap(
        &self,
        value: Option<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(value)
    }
}

// -----------------------------------------------------------------------------
// SharedInfo

/// Type information of a shared, identity-bearing cell.
pub struct SharedInfo {
    inner: fn() -> &'static TypeInfo,
    wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl SharedInfo {
    /// Creates a new [`SharedInfo`].
    #[inline]
    pub const fn new(
        inner: fn() -> &'static TypeInfo,
        wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
    ) -> Self {
        Self { inner, wrap }
    }

    /// Returns the type information of the shared type.
    #[inline]
    pub fn inner(&self) -> &'static TypeInfo {
        (self.inner)()
    }

    /// Moves an inner value into a new shared cell.
    #[inline]
    pub fn wrap(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(value)
    }
}

// -----------------------------------------------------------------------------
// ListInfo

/// How a sequence type stores its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFlavor {
    /// Growable sequence, e.g. `Vec<T>`.
    Growable,
    /// Set, e.g. `HashSet<T>`.
    Set,
    /// Exact-length array allocated to the input, e.g. `Box<[T]>`.
    Array,
    /// Fixed-length array, e.g. `[T; N]`.
    Fixed(usize),
    /// Read-only view built from a backing sequence, e.g. `Arc<[T]>`.
    ReadOnly,
}

/// Type information of a sequence.
pub struct ListInfo {
    element: fn() -> &'static TypeInfo,
    flavor: ListFlavor,
    collect: Option<CollectFn>,
    backing: Option<fn() -> &'static TypeInfo>,
    wrap: Option<WrapFn>,
}

impl ListInfo {
    /// Creates a sequence that is built directly by `collect`.
    #[inline]
    pub const fn new(
        element: fn() -> &'static TypeInfo,
        flavor: ListFlavor,
        collect: CollectFn,
    ) -> Self {
        Self {
            element,
            flavor,
            collect: Some(collect),
            backing: None,
            wrap: None,
        }
    }

    /// Creates a read-only sequence, built as `backing` then converted by `wrap`.
    #[inline]
    pub const fn read_only(
        element: fn() -> &'static TypeInfo,
        backing: fn() -> &'static TypeInfo,
        wrap: WrapFn,
    ) -> Self {
        Self {
            element,
            flavor: ListFlavor::ReadOnly,
            collect: None,
            backing: Some(backing),
            wrap: Some(wrap),
        }
    }

    /// Returns the element type information.
    #[inline]
    pub fn element(&self) -> &'static TypeInfo {
        (self.element)()
    }

    /// Returns the [`ListFlavor`].
    #[inline]
    pub const fn flavor(&self) -> ListFlavor {
        self.flavor
    }

    /// Returns the builder, `None` for read-only sequences.
    #[inline]
    pub const fn collect_fn(&self) -> Option<CollectFn> {
        self.collect
    }

    /// Returns the backing type of a read-only sequence.
    #[inline]
    pub fn backing(&self) -> Option<&'static TypeInfo> {
        self.backing.map(|f| f())
    }

    /// Returns the read-only conversion.
    #[inline]
    pub const fn wrap_fn(&self) -> Option<WrapFn> {
        self.wrap
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// How a dictionary type stores its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFlavor {
    /// Hashed dictionary, e.g. `HashMap<K, V>`.
    Hashed,
    /// Ordered dictionary, e.g. `BTreeMap<K, V>`.
    Ordered,
    /// Read-only view built from a backing dictionary, e.g. `Arc<BTreeMap<K, V>>`.
    ReadOnly,
}

/// Type information of a dictionary.
#[derive(Debug)]
pub struct MapInfo {
    key: fn() -> &'static TypeInfo,
    value: fn() -> &'static TypeInfo,
    flavor: MapFlavor,
    collect: Option<CollectPairsFn>,
    backing: Option<fn() -> &'static TypeInfo>,
    wrap: Option<WrapFn>,
}

impl MapInfo {
    /// Creates a dictionary that is built directly by `collect`.
    #[inline]
    pub const fn new(
        key: fn() -> &'static TypeInfo,
        value: fn() -> &'static TypeInfo,
        flavor: MapFlavor,
        collect: CollectPairsFn,
    ) -> Self {
        Self {
            key,
            value,
            flavor,
            collect: Some(collect),
            backing: None,
            wrap: None,
        }
    }

    /// Creates a read-only dictionary, built as `backing` then converted by `wrap`.
    #[inline]
    pub const fn read_only(
        key: fn() -> &'static TypeInfo,
        value: fn() -> &'static TypeInfo,
        backing: fn() -> &'static TypeInfo,
        wrap: WrapFn,
    ) -> Self {
        Self {
            key,
            value,
            flavor: MapFlavor::ReadOnly,
            collect: None,
            backing: Some(backing),
            wrap: Some(wrap),
        }
    }

    /// Returns the key type information.
    #[inline]
    pub fn key(&self) -> &'static TypeInfo {
        (self.key)()
    }

    /// Returns the value type information.
    #[inline]
    pub fn value(&self) -> &'static TypeInfo {
        (self.value)()
    }

    /// Returns the [`MapFlavor`].
    #[inline]
    pub const fn flavor(&self) -> MapFlavor {
        self.flavor
    }

    /// Returns the builder, `None` for read-only dictionaries.
    #[inline]
    pub const fn collect_fn(&self) -> Option<CollectPairsFn> {
        self.collect
    }

    /// Returns the backing type of a read-only dictionary.
    #[inline]
    pub fn backing(&self) -> Option<&'static TypeInfo> {
        self.backing.map(|f| f())
    }

    /// Returns the read-only conversion.
    #[inline]
    pub const fn wrap_fn(&self) -> Option<WrapFn> {
        self.wrap
    }
}
