// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod enum_kind;
mod struct_kind;
mod trait_reflect;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;

use crate::derive_data::ReflectDerive;

use auto_register::get_auto_register_impl;
use trait_reflect::impl_trait_reflect;
use trait_typed::impl_trait_typed;

/// Generate every impl of `#[derive(Reflect)]`.
pub(crate) fn impl_reflect(derive: &ReflectDerive) -> TokenStream {
    let kind_tokens = match derive {
        ReflectDerive::Struct(data) => struct_kind::impl_struct(data),
        ReflectDerive::Enum(data) => enum_kind::impl_enum(data),
    };
    let auto_register_tokens = get_auto_register_impl(derive.meta());

    quote::quote! {
        #kind_tokens
        #auto_register_tokens
    }
}
