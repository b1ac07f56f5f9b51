//! See following macros:
//!
//! - [`Reflect`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements `Typed` and `Reflect`, and describes the
/// members of the type once, as static [`MemberDescriptor`]s:
///
/// - named structs (`struct T { ... }`) become records;
/// - tuple structs (`struct T(...);`) become positional records, with
///   members named `"0"`, `"1"`, ...;
/// - unit structs (`struct T;`) become records without members;
/// - field-less enums become enums (the trait `Enum` is implemented too).
///
/// Records need [`Default`], which provides the zero value rehydration
/// starts from. Enums use their first variant as zero value.
///
/// Lifetime and const parameters are not supported. Type parameters get a
/// `Typed` bound.
///
/// ## Type Attributes
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// #[reflect(type_path = "my_crate::Foo", auto_register)]
/// struct Foo { /* ... */ }
/// ```
///
/// - `type_path = "..."`: overrides the default `module_path!()::Ident` path.
///   The short name is the last segment. Generic arguments are appended.
/// - `auto_register`: registers the type in every `TypeRegistry::auto_register`
///   call. No effect on generic types, or when the `auto_register` feature is
///   disabled.
/// - `no_default`: the record has no zero value and cannot be rehydrated.
/// - `dynamic`: the record carries members its type does not declare. Exactly
///   one field must be marked `#[reflect(extra)]` and have type `Expando`.
///
/// ## Field Attributes
///
/// - `ignore`: the field is invisible to reflection, its type does not need
///   to implement `Reflect`.
/// - `rename = "..."`: the member name used in JSON.
/// - `read_only`: written out, never assigned back.
/// - `write_only`: assigned back, never written out.
///
/// Fields without `pub` are private members: only records without any
/// public member (or tuple structs) are walked through their private members.
///
/// ## Variant Attributes
///
/// - `rename = "..."`: the variant name used in JSON.
///
/// [`MemberDescriptor`]: https://docs.rs/vc_reflect/latest/vc_reflect/info/struct.MemberDescriptor.html
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectDerive::from_input(&ast) {
        Ok(derive) => impls::impl_reflect(&derive).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
