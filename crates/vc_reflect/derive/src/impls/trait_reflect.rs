use proc_macro2::TokenStream;
use quote::quote;
use syn::Type;

use crate::derive_data::ReflectMeta;

/// Generate implementation code for `Reflect`
///
/// `reflect_ref_tokens` is the body of `reflect_ref`, `extra_methods` are
/// appended as is (e.g. `as_dynamic_record_mut`).
pub(super) fn impl_trait_reflect(
    meta: &ReflectMeta,
    reflect_ref_tokens: TokenStream,
    extra_methods: TokenStream,
    bounded: &[&Type],
    need_default: bool,
) -> TokenStream {
    let vc_reflect_path = meta.vc_reflect_path();
    let reflect_ = crate::path::reflect_(vc_reflect_path);
    let typed_ = crate::path::typed_(vc_reflect_path);
    let info_ = crate::path::info_(vc_reflect_path);
    let ops_ = crate::path::ops_(vc_reflect_path);

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics(bounded, need_default);

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_type_info(&self) -> &'static #info_::TypeInfo {
                <Self as #typed_>::type_info()
            }

            #[inline]
            fn reflect_ref(&self) -> #ops_::ReflectRef<'_> {
                #reflect_ref_tokens
            }

            #extra_methods
        }
    }
}
