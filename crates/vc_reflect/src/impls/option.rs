use alloc::boxed::Box;
use alloc::format;

use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{NullableInfo, TypeInfo, TypeKind, Typed};
use crate::ops::ReflectRef;
use crate::reflection::impl_reflect_type_info;

fn wrap_option<T: Typed>(
    value: Option<Box<dyn Reflect>>,
) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    match value {
        None => Ok(Box::new(None::<T>)),
        Some(inner) => T::take_boxed(inner).map(|v| Box::new(Some(v)) as Box<dyn Reflect>),
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            let inner = T::type_info();
            let kind = TypeKind::Nullable(NullableInfo::new(T::type_info, wrap_option::<T>));
            TypeInfo::new::<Self>(
                format!("core::option::Option<{}>", inner.path()),
                format!("Option<{}>", inner.name()),
                kind,
            )
            .with_generics(&[T::type_info])
            .with_default::<Self>()
        })
    }
}

impl<T: Typed> Reflect for Option<T> {
    impl_reflect_type_info!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Nullable(self.as_ref().map(|v| v as &dyn Reflect))
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use crate::Reflect;
    use crate::info::Typed;
    use crate::ops::ReflectRef;

    #[test]
    fn none_is_null() {
        assert!(None::<i32>.reflect_ref().is_null());

        let ReflectRef::Nullable(Some(inner)) = Some(4_i32).reflect_ref() else {
            panic!("`Some` exposes its content");
        };
        assert_eq!(inner.downcast_ref::<i32>(), Some(&4));
    }

    #[test]
    fn wrap_checks_inner_type() {
        let info = <Option<u8>>::type_info().as_nullable().unwrap();
        assert!(info.inner().type_is::<u8>());

        let some = info.wrap(Some(Box::new(3_u8))).unwrap();
        assert_eq!(some.take::<Option<u8>>().unwrap(), Some(3));

        let none = info.wrap(None).unwrap();
        assert_eq!(none.take::<Option<u8>>().unwrap(), None);

        assert!(info.wrap(Some(Box::new("x".to_string()))).is_err());
    }

    #[test]
    fn generic_names() {
        let info = <Option<Option<bool>>>::type_info();
        assert_eq!(info.name(), "Option<Option<bool>>");
        assert_eq!(info.path(), "core::option::Option<core::option::Option<bool>>");
    }
}
