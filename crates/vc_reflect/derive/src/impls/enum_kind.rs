use proc_macro2::TokenStream;
use quote::quote;

use super::{impl_trait_reflect, impl_trait_typed};
use crate::derive_data::ReflectEnum;

/// Implement `Typed`, `Reflect` and `Enum` for a field-less enum.
///
/// The first variant is the zero value.
pub(super) fn impl_enum(info: &ReflectEnum) -> TokenStream {
    let meta = info.meta();
    let vc_reflect_path = meta.vc_reflect_path();
    let info_ = crate::path::info_(vc_reflect_path);
    let ops_ = crate::path::ops_(vc_reflect_path);
    let reflect_ = crate::path::reflect_(vc_reflect_path);
    let macro_exports_ = crate::path::macro_exports_(vc_reflect_path);

    let idents: Vec<_> = info.variants().iter().map(|v| v.ident()).collect();
    let names: Vec<_> = info.variants().iter().map(|v| v.name()).collect();

    let variant_infos = idents
        .iter()
        .zip(&names)
        .map(|(ident, name)| quote!(#info_::VariantInfo::new(#name, Self::#ident as i64)));
    let builders = idents.iter().enumerate().map(|(index, ident)| {
        quote! {
            #index => ::core::option::Option::Some(
                #macro_exports_::Box::new(Self::#ident) as #macro_exports_::Box<dyn #reflect_>
            ),
        }
    });

    let with_default = (!meta.attrs().no_default).then(|| {
        let first = idents[0];
        quote! {
            .with_default_fn(|| {
                #macro_exports_::Box::new(Self::#first) as #macro_exports_::Box<dyn #reflect_>
            })
        }
    });
    let (path, name) = meta.path_and_name_expression();

    let type_info_tokens = quote! {
        #info_::TypeInfo::new::<Self>(
            #path,
            #name,
            #info_::TypeKind::Enum(#info_::EnumInfo::new(
                #macro_exports_::vec![#(#variant_infos),*],
                |index| match index {
                    #(#builders)*
                    _ => ::core::option::Option::None,
                },
            )),
        )
        #with_default
    };

    let typed_impl = impl_trait_typed(meta, type_info_tokens, &[], false);
    let reflect_impl = impl_trait_reflect(
        meta,
        quote!(#ops_::ReflectRef::Enum(self)),
        TokenStream::new(),
        &[],
        false,
    );

    let ident = meta.ident();
    let name_arms = idents.iter().zip(&names).map(|(v, name)| quote!(Self::#v => #name,));
    let discriminant_arms = idents.iter().map(|v| quote!(Self::#v => Self::#v as i64,));

    quote! {
        #typed_impl
        #reflect_impl

        impl #ops_::Enum for #ident {
            fn variant_name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }

            fn discriminant(&self) -> i64 {
                match self {
                    #(#discriminant_arms)*
                }
            }
        }
    }
}
