use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{GenericParam, Generics, Ident, Path, Type, WherePredicate, parse_quote};

use super::TypeAttributes;

/// Information shared by every kind of derived type.
pub(crate) struct ReflectMeta<'a> {
    vc_reflect_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
}

impl core::fmt::Debug for ReflectMeta<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReflectMeta")
            .field("vc_reflect_path", &self.vc_reflect_path.to_token_stream())
            .field("ident", &self.ident)
            .finish_non_exhaustive()
    }
}

impl<'a> ReflectMeta<'a> {
    /// Rejects lifetime and const parameters, they cannot be named by a
    /// `'static` type information.
    pub fn new(
        attrs: TypeAttributes,
        ident: &'a Ident,
        generics: &'a Generics,
    ) -> syn::Result<Self> {
        for param in &generics.params {
            match param {
                GenericParam::Type(_) => {}
                GenericParam::Lifetime(p) => {
                    return Err(syn::Error::new_spanned(
                        p,
                        "`Reflect` cannot be derived for types with lifetime parameters",
                    ));
                }
                GenericParam::Const(p) => {
                    return Err(syn::Error::new_spanned(
                        p,
                        "`Reflect` cannot be derived for types with const parameters",
                    ));
                }
            }
        }

        Ok(Self {
            vc_reflect_path: crate::path::vc_reflect(),
            attrs,
            ident,
            generics,
        })
    }

    #[inline]
    pub fn vc_reflect_path(&self) -> &Path {
        &self.vc_reflect_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &'a Ident {
        self.ident
    }

    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    fn type_params(&self) -> impl Iterator<Item = &'a Ident> {
        self.generics.params.iter().filter_map(|param| match param {
            GenericParam::Type(p) => Some(&p.ident),
            _ => None,
        })
    }

    /// Split generics for an impl block.
    ///
    /// Every type parameter gets a `Typed` bound, `bounded` types (usually
    /// the member types) too. With `need_default`, the type itself must
    /// implement `Default`.
    ///
    /// Returns `(impl_generics, ty_generics, where_clause)`.
    pub fn split_generics(
        &self,
        bounded: &[&Type],
        need_default: bool,
    ) -> (TokenStream, TokenStream, TokenStream) {
        let typed_ = crate::path::typed_(&self.vc_reflect_path);

        let mut generics = self.generics.clone();
        if self.impl_with_generic() {
            let ident = self.ident;
            let (_, ty_generics, _) = self.generics.split_for_impl();

            let mut predicates: Vec<WherePredicate> = self
                .type_params()
                .map(|param| parse_quote!(#param: #typed_))
                .collect();
            predicates.extend(
                bounded
                    .iter()
                    .map(|ty| -> WherePredicate { parse_quote!(#ty: #typed_) }),
            );
            if need_default {
                predicates.push(parse_quote!(#ident #ty_generics: ::core::default::Default));
            }

            generics.make_where_clause().predicates.extend(predicates);
        }

        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        (
            impl_generics.to_token_stream(),
            ty_generics.to_token_stream(),
            where_clause.to_token_stream(),
        )
    }

    /// Generate the `(path, name)` expressions.
    ///
    /// Similar to following:
    ///
    /// ```ignore
    /// let path = concat!(module_path!(), "::Foo");
    /// let name = "Foo";
    /// // or, for generic types
    /// let path = format!(
    ///     "{}<{}>",
    ///     concat!(module_path!(), "::Foo"),
    ///     [T::type_info().path()].join(", "),
    /// );
    /// let name = format!("{}<{}>", "Foo", [T::type_info().name()].join(", "));
    /// ```
    pub fn path_and_name_expression(&self) -> (TokenStream, TokenStream) {
        let (base_path, base_name) = match &self.attrs.type_path {
            Some(lit) => {
                let value = lit.value();
                let name = value.rsplit("::").next().unwrap_or(&value).trim().to_owned();
                (quote!(#lit), quote!(#name))
            }
            None => {
                let name = self.ident.to_string();
                (quote!(::core::concat!(::core::module_path!(), "::", #name)), quote!(#name))
            }
        };

        if !self.impl_with_generic() {
            return (base_path, base_name);
        }

        let typed_ = crate::path::typed_(&self.vc_reflect_path);
        let macro_exports_ = crate::path::macro_exports_(&self.vc_reflect_path);
        let paths = self.type_params().map(|p| quote!(<#p as #typed_>::type_info().path()));
        let names = self.type_params().map(|p| quote!(<#p as #typed_>::type_info().name()));

        let path = quote! {
            #macro_exports_::format!(
                "{}<{}>",
                #base_path,
                [#(#paths),*].join(", ")
            )
        };
        let name = quote! {
            #macro_exports_::format!(
                "{}<{}>",
                #base_name,
                [#(#names),*].join(", ")
            )
        };
        (path, name)
    }

    /// Generate generics codes
    ///
    /// Similar to following:
    ///
    /// ```ignore
    /// .with_generics(&[<T as Typed>::type_info, <U as Typed>::type_info])
    /// ```
    pub fn with_generics_expression(&self) -> TokenStream {
        if !self.impl_with_generic() {
            return TokenStream::new();
        }
        let typed_ = crate::path::typed_(&self.vc_reflect_path);
        let accessors = self.type_params().map(|p| quote!(<#p as #typed_>::type_info));
        quote! {
            .with_generics(&[#(#accessors),*])
        }
    }
}
