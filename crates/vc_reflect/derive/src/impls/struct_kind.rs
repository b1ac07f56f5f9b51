use proc_macro2::TokenStream;
use quote::quote;

use super::{impl_trait_reflect, impl_trait_typed};
use crate::derive_data::{ReflectStruct, StructField, StructShape};

/// Implement `Typed` and `Reflect` (plus `DynamicRecord` for dynamic
/// records) for a struct.
pub(super) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let meta = info.meta();
    let vc_reflect_path = meta.vc_reflect_path();
    let info_ = crate::path::info_(vc_reflect_path);
    let ops_ = crate::path::ops_(vc_reflect_path);
    let reflect_ = crate::path::reflect_(vc_reflect_path);
    let macro_exports_ = crate::path::macro_exports_(vc_reflect_path);

    let need_default = !meta.attrs().no_default;
    let bounded = info.active_types();

    let members = info.fields().iter().map(|field| member_descriptor(info, field));
    let tuple_like = (info.shape() == StructShape::Tuple).then(|| quote!(.tuple_like()));
    let dynamic = info.extra().map(|_| quote!(.dynamic()));
    let (path, name) = meta.path_and_name_expression();
    let with_generics = meta.with_generics_expression();
    let with_default = need_default.then(|| quote!(.with_default::<Self>()));

    let type_info_tokens = quote! {
        #info_::TypeInfo::new::<Self>(
            #path,
            #name,
            #info_::TypeKind::Record(
                #info_::RecordInfo::new(#macro_exports_::vec![#(#members),*])
                    #tuple_like
                    #dynamic
            ),
        )
        #with_generics
        #with_default
    };

    let typed_impl = impl_trait_typed(meta, type_info_tokens, &bounded, need_default);

    let Some(extra) = info.extra() else {
        let reflect_impl = impl_trait_reflect(
            meta,
            quote!(#ops_::ReflectRef::Record(self)),
            TokenStream::new(),
            &bounded,
            need_default,
        );
        return quote! {
            #typed_impl
            #reflect_impl
        };
    };

    let reflect_impl = impl_trait_reflect(
        meta,
        quote!(#ops_::ReflectRef::Dynamic(self)),
        quote! {
            #[inline]
            fn as_dynamic_record_mut(
                &mut self,
            ) -> ::core::option::Option<&mut dyn #ops_::DynamicRecord> {
                ::core::option::Option::Some(self)
            }
        },
        &bounded,
        need_default,
    );

    let ident = meta.ident();
    let extra_ty = extra.ty();
    let extra_member = extra.member();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(&bounded, need_default);

    quote! {
        #typed_impl
        #reflect_impl

        impl #impl_generics #ops_::DynamicRecord for #ident #ty_generics #where_clause {
            #[inline]
            fn dynamic_members(
                &self,
            ) -> #macro_exports_::Box<
                dyn ::core::iter::Iterator<Item = (&str, &dyn #reflect_)> + '_,
            > {
                <#extra_ty as #ops_::DynamicRecord>::dynamic_members(&self.#extra_member)
            }

            #[inline]
            fn insert_dynamic(
                &mut self,
                name: #macro_exports_::String,
                value: #macro_exports_::Box<dyn #reflect_>,
            ) {
                let extra = &mut self.#extra_member;
                <#extra_ty as #ops_::DynamicRecord>::insert_dynamic(extra, name, value);
            }
        }
    }
}

/// Generate a member descriptor
///
/// Similar to following:
///
/// ```ignore
/// MemberDescriptor::new(
///     "name",
///     <Ty as Typed>::type_info,
///     |owner| Some(&owner.downcast_ref::<Self>()?.name as &dyn Reflect),
///     |owner, value| { /* downcast, take_boxed, assign */ },
/// )
/// .read_only()
/// ```
fn member_descriptor(info: &ReflectStruct, field: &StructField) -> TokenStream {
    let vc_reflect_path = info.meta().vc_reflect_path();
    let info_ = crate::path::info_(vc_reflect_path);
    let typed_ = crate::path::typed_(vc_reflect_path);
    let reflect_ = crate::path::reflect_(vc_reflect_path);

    let name = field.name();
    let ty = field.ty();
    let member = field.member();

    let read_only = field.attrs.read_only.then(|| quote!(.read_only()));
    let write_only = field.attrs.write_only.then(|| quote!(.write_only()));
    let private = (!field.is_public()).then(|| quote!(.private()));

    quote! {
        #info_::MemberDescriptor::new(
            #name,
            <#ty as #typed_>::type_info,
            |owner| {
                let this = owner.downcast_ref::<Self>()?;
                ::core::option::Option::Some(&this.#member as &dyn #reflect_)
            },
            |owner, value| {
                let ::core::option::Option::Some(this) = owner.downcast_mut::<Self>() else {
                    return ::core::result::Result::Err(value);
                };
                this.#member = <#ty as #reflect_>::take_boxed(value)?;
                ::core::result::Result::Ok(())
            },
        )
        #read_only
        #write_only
        #private
    }
}
