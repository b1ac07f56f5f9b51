use proc_macro2::Span;
use syn::{Attribute, LitStr};

use super::for_each_reflect_meta;

/// Type level `#[reflect(...)]` options.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// `type_path = "..."`
    pub type_path: Option<LitStr>,
    /// `auto_register`
    pub auto_register: Option<Span>,
    /// `dynamic`
    pub dynamic: Option<Span>,
    /// `no_default`
    pub no_default: bool,
}

impl TypeAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for_each_reflect_meta(attrs, |meta| {
            if meta.path.is_ident("type_path") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().trim().is_empty() {
                    return Err(syn::Error::new(lit.span(), "`type_path` cannot be empty"));
                }
                this.type_path = Some(lit);
            } else if meta.path.is_ident("auto_register") {
                this.auto_register = Some(meta.input.span());
            } else if meta.path.is_ident("dynamic") {
                this.dynamic = Some(meta.input.span());
            } else if meta.path.is_ident("no_default") {
                this.no_default = true;
            } else {
                return Err(meta.error(
                    "unsupported type attribute, expected one of \
                     `type_path`, `auto_register`, `dynamic`, `no_default`",
                ));
            }
            Ok(())
        })?;

        Ok(this)
    }
}
