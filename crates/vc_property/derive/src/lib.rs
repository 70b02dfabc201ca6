//! Derive macro for `vc_property`.
//!
//! See [`Describe`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

static DESCRIBE_ATTRIBUTE_NAME: &str = "describe";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Property Description Derivation
///
/// `#[derive(Describe)]` implements `Describe` and `Slot` for a struct.
///
/// Every field becomes a readable and writable property named after the
/// field. Fields of tuple structs are named `0`, `1`, and so on. Unit structs
/// have no properties.
///
/// The type must be `Clone + Send + Sync + 'static`, and every field type must
/// implement `Slot`. Enums and unions are rejected.
///
/// ```rust, ignore
/// #[derive(Clone, Default, Describe)]
/// #[describe(default)]
/// struct Endpoint {
///     host: String,
///     port: Option<u16>,
///     #[describe(rename = "tags")]
///     labels: Vec<String>,
/// }
/// ```
///
/// ## Type Attributes
///
/// ### `default`
///
/// `default_instance` returns `Default::default()`, so navigation in create
/// mode can materialize null values of this type. Requires `Default`.
///
/// ### `with = path`
///
/// Calls `path(builder)` after the fields are declared. Use it for explicit
/// getters, setters, adders and other candidates.
///
/// ```rust, ignore
/// #[derive(Clone, Describe)]
/// #[describe(with = Self::extra)]
/// struct Order {
///     lines: Vec<String>,
/// }
///
/// impl Order {
///     fn extra(builder: &mut DescriptorBuilder<Self>) {
///         builder.adder("line", |o: &mut Self, l: String| o.lines.push(l));
///     }
/// }
/// ```
///
/// ### `slot = false`
///
/// Skips the `Slot` implementation, for types providing their own.
///
/// ### `auto_register`
///
/// Submits the type for `DescriptorRegistry::auto_register`. Requires the
/// `auto_register` feature and is ignored for generic types.
///
/// ## Field Attributes
///
/// - `skip`: the field is not a property.
/// - `read_only`: the property has no SET accessor.
/// - `rename = "name"`: use another property name.
#[proc_macro_derive(Describe, attributes(describe))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let data = match derive_data::DescribeStruct::from_derive_input(&ast) {
        Ok(data) => data,
        Err(err) => return err.into_compile_error().into(),
    };

    let describe_impl = impls::impl_trait_describe(&data);
    let slot_impl = impls::impl_trait_slot(&data);
    let auto_register = impls::get_auto_register_impl(&data);

    TokenStream::from(quote! {
        const _: () = {
            #describe_impl

            #slot_impl
        };

        #auto_register
    })
}
