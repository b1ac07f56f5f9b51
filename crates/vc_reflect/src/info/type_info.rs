use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::{error, fmt};

use crate::Reflect;
use crate::info::{EnumInfo, ListInfo, MapInfo, NullableInfo};
use crate::info::{PrimitiveInfo, RecordInfo, SharedInfo};

// -----------------------------------------------------------------------------
// ReflectKind

/// An enumeration of the "kinds" of a reflected type.
///
/// A [`ReflectKind`] is obtained via [`TypeInfo::reflect_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Primitive,
    Enum,
    Nullable,
    List,
    Map,
    Record,
    Shared,
    Any,
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.pad("Primitive"),
            Self::Enum => f.pad("Enum"),
            Self::Nullable => f.pad("Nullable"),
            Self::List => f.pad("List"),
            Self::Map => f.pad("Map"),
            Self::Record => f.pad("Record"),
            Self::Shared => f.pad("Shared"),
            Self::Any => f.pad("Any"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

/// Error returned when a `TypeInfo` value is not the expected `ReflectKind`.
#[derive(Debug)]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

impl fmt::Display for ReflectKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reflect kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for ReflectKindError {}

// -----------------------------------------------------------------------------
// TypeKind

/// Kind specific part of a [`TypeInfo`].
///
/// - `Any`: the polymorphic `Box<dyn Reflect>` slot, its content decides.
/// - `Opaque`: a value carrying its own representation (the canonical
///   value model), read and rebuilt verbatim.
pub enum TypeKind {
    Primitive(PrimitiveInfo),
    Enum(EnumInfo),
    Nullable(NullableInfo),
    List(ListInfo),
    Map(MapInfo),
    Record(RecordInfo),
    Shared(SharedInfo),
    Any,
    Opaque,
}

impl TypeKind {
    /// Returns the [`ReflectKind`] discriminator.
    pub const fn reflect_kind(&self) -> ReflectKind {
        match self {
            Self::Primitive(_) => ReflectKind::Primitive,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Nullable(_) => ReflectKind::Nullable,
            Self::List(_) => ReflectKind::List,
            Self::Map(_) => ReflectKind::Map,
            Self::Record(_) => ReflectKind::Record,
            Self::Shared(_) => ReflectKind::Shared,
            Self::Any => ReflectKind::Any,
            Self::Opaque => ReflectKind::Opaque,
        }
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Static type information of a reflected type.
///
/// # Content
///
/// - **id**: [`TypeId`] of the type.
/// - **path**: full type path, such as `alloc::vec::Vec<i32>`.
/// - **name**: the path without module prefixes, such as `Vec<i32>`. May be
///   shared by several types.
/// - **generics**: accessors of the generic type arguments.
/// - **default**: optional zero-value constructor.
/// - **kind**: [`TypeKind`].
///
/// # Obtain
///
/// - [`Typed::type_info`] when the type is known at compile time.
/// - [`Reflect::reflect_type_info`] when all you have is a `dyn Reflect`.
/// - [`TypeRegistry`] lookups by name or [`TypeId`].
///
/// Every `TypeInfo` lives for the whole process, so it can be compared by
/// address.
///
/// [`Typed::type_info`]: crate::info::Typed::type_info
/// [`TypeRegistry`]: crate::registry::TypeRegistry
pub struct TypeInfo {
    id: TypeId,
    path: Cow<'static, str>,
    name: Cow<'static, str>,
    generics: Box<[fn() -> &'static TypeInfo]>,
    default: Option<fn() -> Box<dyn Reflect>>,
    kind: TypeKind,
}

// Helper macro that implements type-safe accessor methods like `as_record`.
macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Convert [`TypeInfo`] to specific type information.
        pub const fn $name(&self) -> Result<&$info, ReflectKindError> {
            match &self.kind {
                TypeKind::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind.reflect_kind(),
                }),
            }
        }
    };
}

fn default_of<T: Default + Reflect>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

impl TypeInfo {
    /// Creates type information for `T`.
    pub fn new<T: Any + ?Sized>(
        path: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
        kind: TypeKind,
    ) -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: path.into(),
            name: name.into(),
            generics: Box::new([]),
            default: None,
            kind,
        }
    }

    /// Attaches the accessors of the generic type arguments.
    pub fn with_generics(mut self, generics: &[fn() -> &'static TypeInfo]) -> Self {
        self.generics = generics.into();
        self
    }

    /// Uses [`Default::default`] as zero-value constructor.
    pub fn with_default<T: Default + Reflect>(mut self) -> Self {
        self.default = Some(default_of::<T>);
        self
    }

    /// Uses `default` as zero-value constructor.
    pub fn with_default_fn(mut self, default: fn() -> Box<dyn Reflect>) -> Self {
        self.default = Some(default);
        self
    }

    impl_cast_method!(as_primitive: Primitive => PrimitiveInfo);
    impl_cast_method!(as_enum: Enum => EnumInfo);
    impl_cast_method!(as_nullable: Nullable => NullableInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_record: Record => RecordInfo);
    impl_cast_method!(as_shared: Shared => SharedInfo);

    /// Returns the [`TypeId`].
    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns `true` if this is the information of `T`.
    #[inline]
    pub fn type_is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Returns the full type path, e.g. `alloc::vec::Vec<i32>`.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the short type name, e.g. `Vec<i32>`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the accessors of the generic type arguments, in declaration order.
    #[inline]
    pub fn generics(&self) -> &[fn() -> &'static TypeInfo] {
        &self.generics
    }

    /// Returns the [`TypeKind`].
    #[inline]
    pub const fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Returns the [`ReflectKind`] discriminator.
    #[inline]
    pub const fn reflect_kind(&self) -> ReflectKind {
        self.kind.reflect_kind()
    }

    /// Returns `true` if a zero value can be constructed.
    #[inline]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Constructs the zero value of this type, if it has one.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_reflect::info::Typed;
    ///
    /// let zero = i32::type_info().default_value().unwrap();
    /// assert_eq!(zero.take::<i32>().unwrap(), 0);
    /// ```
    #[inline]
    pub fn default_value(&self) -> Option<Box<dyn Reflect>> {
        self.default.map(|f| f())
    }

    /// Collects every type this type directly refers to: generic arguments,
    /// element/key/value types, nullable and shared inner types, and the
    /// declared types of record members.
    pub fn dependencies(&self) -> Vec<&'static TypeInfo> {
        let mut deps: Vec<&'static TypeInfo> = self.generics.iter().map(|f| f()).collect();
        match &self.kind {
            TypeKind::Nullable(info) => deps.push(info.inner()),
            TypeKind::Shared(info) => deps.push(info.inner()),
            TypeKind::List(info) => {
                deps.push(info.element());
                deps.extend(info.backing());
            }
            TypeKind::Map(info) => {
                deps.push(info.key());
                deps.push(info.value());
                deps.extend(info.backing());
            }
            TypeKind::Record(info) => deps.extend(info.members().iter().map(|m| m.declared())),
            TypeKind::Primitive(_) | TypeKind::Enum(_) | TypeKind::Any | TypeKind::Opaque => {}
        }
        deps
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("path", &self.path)
            .field("kind", &self.reflect_kind())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::info::{ReflectKind, Typed};

    #[test]
    fn kind_casts() {
        let info = <Vec<String> as Typed>::type_info();
        assert_eq!(info.reflect_kind(), ReflectKind::List);
        assert!(info.as_list().is_ok());

        let err = info.as_map().unwrap_err();
        assert_eq!(err.expected, ReflectKind::Map);
        assert_eq!(err.received, ReflectKind::List);
        assert_eq!(
            alloc::format!("{err}"),
            "reflect kind mismatch: expected Map, received List"
        );
    }

    #[test]
    fn dependencies_of_generic_container() {
        let info = <Option<Vec<i32>> as Typed>::type_info();
        let deps = info.dependencies();
        assert!(deps.iter().any(|d| d.type_is::<Vec<i32>>()));
    }
}
