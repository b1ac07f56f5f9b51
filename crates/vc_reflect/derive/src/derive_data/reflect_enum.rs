use syn::{Fields, Ident, Variant};

use super::{ReflectMeta, VariantAttributes};

/// A field-less variant.
pub(crate) struct EnumVariant<'a> {
    pub data: &'a Variant,
    pub attrs: VariantAttributes,
}

impl EnumVariant<'_> {
    #[inline]
    pub fn ident(&self) -> &Ident {
        &self.data.ident
    }

    /// The reflected name: `rename` or the identifier.
    pub fn name(&self) -> String {
        match &self.attrs.rename {
            Some(rename) => rename.value(),
            None => self.data.ident.to_string(),
        }
    }
}

/// An enum to derive.
pub(crate) struct ReflectEnum<'a> {
    meta: ReflectMeta<'a>,
    variants: Vec<EnumVariant<'a>>,
}

impl<'a> ReflectEnum<'a> {
    pub fn new(meta: ReflectMeta<'a>, data: &'a syn::DataEnum) -> syn::Result<Self> {
        if meta.impl_with_generic() {
            return Err(syn::Error::new_spanned(
                meta.ident(),
                "`Reflect` cannot be derived for generic enums",
            ));
        }
        if let Some(span) = meta.attrs().dynamic {
            return Err(syn::Error::new(span, "`dynamic` is only supported on structs"));
        }
        if data.variants.is_empty() {
            return Err(syn::Error::new_spanned(
                meta.ident(),
                "`Reflect` cannot be derived for enums without variants",
            ));
        }

        let mut variants = Vec::with_capacity(data.variants.len());
        for variant in &data.variants {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new_spanned(
                    variant,
                    "`Reflect` only supports field-less enums",
                ));
            }
            let attrs = VariantAttributes::parse_attrs(&variant.attrs)?;
            variants.push(EnumVariant { data: variant, attrs });
        }

        Ok(Self { meta, variants })
    }

    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }

    #[inline]
    pub fn variants(&self) -> &[EnumVariant<'a>] {
        &self.variants
    }
}
