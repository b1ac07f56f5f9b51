use alloc::boxed::Box;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{TypeInfo, TypeKind, Typed};
use crate::ops::{DynamicRecord, ReflectRef};

// A `Box<dyn Reflect>` slot is polymorphic: its static info only says "any",
// every instance call is forwarded to the boxed value.

impl Typed for Box<dyn Reflect> {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::new::<Self>(
                "alloc::boxed::Box<dyn vc_reflect::Reflect>",
                "Box<dyn Reflect>",
                TypeKind::Any,
            )
        })
    }
}

impl Reflect for Box<dyn Reflect> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        (**self).reflect_type_info()
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        (**self).reflect_ref()
    }

    #[inline]
    fn as_dynamic_record_mut(&mut self) -> Option<&mut dyn DynamicRecord> {
        (**self).as_dynamic_record_mut()
    }

    /// Any value fits a polymorphic slot.
    #[inline]
    fn take_boxed(value: Box<dyn Reflect>) -> Result<Self, Box<dyn Reflect>> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use crate::Reflect;
    use crate::info::{ReflectKind, Typed};
    use crate::ops::{PrimitiveRef, ReflectRef};

    #[test]
    fn forwards_to_content() {
        let slot: Box<dyn Reflect> = Box::new(5_u32);
        let outer: &dyn Reflect = &slot;

        assert_eq!(outer.ty_id(), TypeId::of::<u32>());
        assert!(matches!(outer.reflect_ref(), ReflectRef::Primitive(PrimitiveRef::UInt(5))));
        assert_eq!(<Box<dyn Reflect>>::type_info().reflect_kind(), ReflectKind::Any);
    }

    #[test]
    fn polymorphic_list_accepts_anything() {
        let collect = <Vec<Box<dyn Reflect>>>::type_info().as_list().unwrap().collect_fn().unwrap();
        let items: Vec<Box<dyn Reflect>> = vec![Box::new(1_i32), Box::new(true)];
        let built = collect(items).unwrap().take::<Vec<Box<dyn Reflect>>>().unwrap();

        assert_eq!(built.len(), 2);
        assert_eq!(built[1].downcast_ref::<bool>(), Some(&true));
    }
}
