use syn::{Field, Fields, Index, Member, Type, Visibility};

use super::{FieldAttributes, ReflectMeta};

/// The syntactic form of a derived struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StructShape {
    Named,
    Tuple,
    Unit,
}

/// A reflected field.
pub(crate) struct StructField<'a> {
    pub data: &'a Field,
    pub attrs: FieldAttributes,
    /// Declaration index, ignored fields included.
    pub index: usize,
}

impl StructField<'_> {
    /// The Rust accessor: `self.name` or `self.0`.
    pub fn member(&self) -> Member {
        match &self.data.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(Index::from(self.index)),
        }
    }

    /// The reflected name: `rename`, the identifier, or the position.
    pub fn name(&self) -> String {
        if let Some(rename) = &self.attrs.rename {
            return rename.value();
        }
        match &self.data.ident {
            Some(ident) => ident.to_string(),
            None => self.index.to_string(),
        }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.data.ty
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        !matches!(self.data.vis, Visibility::Inherited)
    }
}

/// A struct to derive, seen as a record.
pub(crate) struct ReflectStruct<'a> {
    meta: ReflectMeta<'a>,
    shape: StructShape,
    fields: Vec<StructField<'a>>,
    extra: Option<StructField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    pub fn new(meta: ReflectMeta<'a>, fields: &'a Fields) -> syn::Result<Self> {
        let shape = match fields {
            Fields::Named(_) => StructShape::Named,
            Fields::Unnamed(_) => StructShape::Tuple,
            Fields::Unit => StructShape::Unit,
        };

        let mut members = Vec::new();
        let mut extra: Option<StructField<'a>> = None;

        for (index, data) in fields.iter().enumerate() {
            let attrs = FieldAttributes::parse_attrs(&data.attrs)?;
            if attrs.ignore {
                continue;
            }

            let field = StructField { data, attrs, index };

            if field.attrs.extra {
                if meta.attrs().dynamic.is_none() {
                    return Err(syn::Error::new_spanned(
                        data,
                        "`extra` requires `#[reflect(dynamic)]` on the type",
                    ));
                }
                if extra.is_some() {
                    let message = "only one field can be marked `extra`";
                    return Err(syn::Error::new_spanned(data, message));
                }
                extra = Some(field);
                continue;
            }

            if field.name().is_empty() {
                return Err(syn::Error::new_spanned(data, "member name cannot be empty"));
            }
            members.push(field);
        }

        if let Some(span) = meta.attrs().dynamic
            && extra.is_none()
        {
            return Err(syn::Error::new(
                span,
                "a `dynamic` record needs one `#[reflect(extra)]` field",
            ));
        }

        Ok(Self {
            meta,
            shape,
            fields: members,
            extra,
        })
    }

    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        &self.meta
    }

    #[inline]
    pub fn shape(&self) -> StructShape {
        self.shape
    }

    /// Reflected members, in declaration order.
    #[inline]
    pub fn fields(&self) -> &[StructField<'a>] {
        &self.fields
    }

    /// Storage of the dynamic members.
    #[inline]
    pub fn extra(&self) -> Option<&StructField<'a>> {
        self.extra.as_ref()
    }

    /// Types that need a `Typed` bound in generic impls.
    pub fn active_types(&self) -> Vec<&Type> {
        self.fields.iter().map(StructField::ty).collect()
    }
}
