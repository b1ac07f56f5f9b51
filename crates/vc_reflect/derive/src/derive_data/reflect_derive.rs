use syn::{Data, DeriveInput};

use super::{ReflectEnum, ReflectMeta, ReflectStruct, TypeAttributes};

/// Parsed input of `#[derive(Reflect)]`.
pub(crate) enum ReflectDerive<'a> {
    Struct(ReflectStruct<'a>),
    Enum(ReflectEnum<'a>),
}

impl<'a> ReflectDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let meta = ReflectMeta::new(attrs, &input.ident, &input.generics)?;

        match &input.data {
            Data::Struct(data) => Ok(Self::Struct(ReflectStruct::new(meta, &data.fields)?)),
            Data::Enum(data) => Ok(Self::Enum(ReflectEnum::new(meta, data)?)),
            Data::Union(_) => Err(syn::Error::new_spanned(
                &input.ident,
                "`Reflect` cannot be derived for unions",
            )),
        }
    }

    #[inline]
    pub fn meta(&self) -> &ReflectMeta<'a> {
        match self {
            Self::Struct(data) => data.meta(),
            Self::Enum(data) => data.meta(),
        }
    }
}
