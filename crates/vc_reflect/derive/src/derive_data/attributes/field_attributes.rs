use syn::{Attribute, LitStr};

use super::for_each_reflect_meta;

/// Field level `#[reflect(...)]` options.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub ignore: bool,
    pub rename: Option<LitStr>,
    pub read_only: bool,
    pub write_only: bool,
    /// Storage of the dynamic members of a `#[reflect(dynamic)]` record.
    pub extra: bool,
}

impl FieldAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for_each_reflect_meta(attrs, |meta| {
            if meta.path.is_ident("ignore") {
                this.ignore = true;
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                this.rename = Some(lit);
            } else if meta.path.is_ident("read_only") {
                this.read_only = true;
            } else if meta.path.is_ident("write_only") {
                this.write_only = true;
            } else if meta.path.is_ident("extra") {
                this.extra = true;
            } else {
                return Err(meta.error(
                    "unsupported field attribute, expected one of \
                     `ignore`, `rename`, `read_only`, `write_only`, `extra`",
                ));
            }
            Ok(())
        })?;

        if this.read_only && this.write_only {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                "a field cannot be both `read_only` and `write_only`",
            ));
        }

        Ok(this)
    }
}

/// Variant level `#[reflect(...)]` options.
#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for_each_reflect_meta(attrs, |meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                this.rename = Some(lit);
                Ok(())
            } else {
                Err(meta.error("unsupported variant attribute, expected `rename`"))
            }
        })?;

        Ok(this)
    }
}
