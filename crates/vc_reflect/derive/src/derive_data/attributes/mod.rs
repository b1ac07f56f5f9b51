//! Provide some tools for parsing `#[reflect(...)]` attributes.

// -----------------------------------------------------------------------------
// Modules

mod field_attributes;
mod type_attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use field_attributes::{FieldAttributes, VariantAttributes};
pub(crate) use type_attributes::TypeAttributes;

use syn::Attribute;
use syn::meta::ParseNestedMeta;

/// Runs `f` on every nested meta of every `#[reflect(...)]` attribute.
pub(super) fn for_each_reflect_meta(
    attrs: &[Attribute],
    mut f: impl FnMut(ParseNestedMeta) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs {
        if attr.path().is_ident(crate::REFLECT_ATTRIBUTE_NAME) {
            attr.parse_nested_meta(&mut f)?;
        }
    }
    Ok(())
}
