use alloc::boxed::Box;
use alloc::string::String;

use chrono::{DateTime, Utc};

use crate::Reflect;
use crate::impls::{Bytes, NonGenericTypeInfoCell};
use crate::info::{PrimitiveInfo, PrimitiveKind, TypeInfo, TypeKind, Typed};
use crate::ops::{Primitive, PrimitiveRef, ReflectRef};
use crate::reflection::impl_reflect_type_info;

#[inline]
fn boxed<T: Reflect>(value: T) -> Box<dyn Reflect> {
    Box::new(value)
}

macro_rules! impl_primitive {
    (
        $ty:ty, $path:expr, $name:expr, $kind:ident,
        |$this:ident| $to_ref:expr,
        |$prim:ident| $from:expr $(,)?
    ) => {
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    let info = PrimitiveInfo::new(PrimitiveKind::$kind, |$prim| $from);
                    TypeInfo::new::<Self>($path, $name, TypeKind::Primitive(info))
                        .with_default::<Self>()
                })
            }
        }

        impl Reflect for $ty {
            impl_reflect_type_info!();

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                let $this = self;
                ReflectRef::Primitive($to_ref)
            }
        }
    };
}

macro_rules! impl_int {
    ($ty:ty, $kind:ident, $variant:ident, $wide:ty) => {
        impl_primitive!(
            $ty, stringify!($ty), stringify!($ty), $kind,
            |this| PrimitiveRef::$variant(*this as $wide),
            |p| match p {
                Primitive::$variant(v) => <$ty>::try_from(v).ok().map(boxed),
                _ => None,
            },
        );
    };
}

impl_int!(i8, I8, Int, i64);
impl_int!(i16, I16, Int, i64);
impl_int!(i32, I32, Int, i64);
impl_int!(i64, I64, Int, i64);
impl_int!(isize, Isize, Int, i64);
impl_int!(u8, U8, UInt, u64);
impl_int!(u16, U16, UInt, u64);
impl_int!(u32, U32, UInt, u64);
impl_int!(u64, U64, UInt, u64);
impl_int!(usize, Usize, UInt, u64);
impl_int!(i128, I128, BigInt, i128);
impl_int!(u128, U128, BigUInt, u128);

impl_primitive!(
    f32, "f32", "f32", F32,
    |this| PrimitiveRef::Float(f64::from(*this)),
    |p| match p {
        Primitive::Float(v) => Some(boxed(v as f32)),
        _ => None,
    },
);

impl_primitive!(
    f64, "f64", "f64", F64,
    |this| PrimitiveRef::Float(*this),
    |p| match p {
        Primitive::Float(v) => Some(boxed(v)),
        _ => None,
    },
);

impl_primitive!(
    bool, "bool", "bool", Bool,
    |this| PrimitiveRef::Bool(*this),
    |p| match p {
        Primitive::Bool(v) => Some(boxed(v)),
        _ => None,
    },
);

impl_primitive!(
    char, "char", "char", Char,
    |this| PrimitiveRef::Char(*this),
    |p| match p {
        Primitive::Char(v) => Some(boxed(v)),
        _ => None,
    },
);

impl_primitive!(
    String, "alloc::string::String", "String", String,
    |this| PrimitiveRef::Str(this),
    |p| match p {
        Primitive::Str(v) => Some(boxed(v)),
        _ => None,
    },
);

impl_primitive!(
    Bytes, "vc_reflect::impls::Bytes", "Bytes", Bytes,
    |this| PrimitiveRef::Bytes(&this.0),
    |p| match p {
        Primitive::Bytes(v) => Some(boxed(Bytes(v))),
        _ => None,
    },
);

impl_primitive!(
    DateTime<Utc>, "chrono::DateTime<chrono::Utc>", "DateTime<Utc>", DateTime,
    |this| PrimitiveRef::DateTime(*this),
    |p| match p {
        Primitive::DateTime(v) => Some(boxed(v)),
        _ => None,
    },
);

// -----------------------------------------------------------------------------
// Unit

impl Typed for () {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            let info = PrimitiveInfo::new(PrimitiveKind::Unit, |_| Some(boxed(())));
            TypeInfo::new::<Self>("()", "()", TypeKind::Primitive(info)).with_default::<Self>()
        })
    }
}

impl Reflect for () {
    impl_reflect_type_info!();

    /// `()` is the null sentinel.
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Nullable(None)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::Reflect;
    use crate::info::{PrimitiveKind, Typed};
    use crate::ops::{Primitive, PrimitiveRef, ReflectRef};

    #[test]
    fn narrow_ints_widen() {
        let ReflectRef::Primitive(p) = 7_u16.reflect_ref() else {
            panic!("u16 is a primitive");
        };
        assert_eq!(p, PrimitiveRef::UInt(7));

        let ReflectRef::Primitive(p) = (-3_i8).reflect_ref() else {
            panic!("i8 is a primitive");
        };
        assert_eq!(p, PrimitiveRef::Int(-3));
    }

    #[test]
    fn build_checks_range() {
        let info = i8::type_info().as_primitive().unwrap();
        assert_eq!(info.kind(), PrimitiveKind::I8);
        assert!(info.build(Primitive::Int(-128)).is_some());
        assert!(info.build(Primitive::Int(200)).is_none());
        assert!(info.build(Primitive::UInt(1)).is_none());
    }

    #[test]
    fn names_and_defaults() {
        assert_eq!(String::type_info().path(), "alloc::string::String");
        assert_eq!(String::type_info().name(), "String");
        let zero = u128::type_info().default_value().unwrap();
        assert_eq!(zero.take::<u128>().unwrap(), 0);
        assert!(().reflect_ref().is_null());
    }
}
