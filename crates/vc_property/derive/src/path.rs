//! Paths of `vc_property` items used by generated code.
//!
//! Kept in one place so that moving an item only touches this module.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `vc_property` crate.
///
/// 1. For crates that depend on `vc_property`, `::vc_property` is returned.
/// 2. For crates that depend on the `vc_bind` facade, `::vc_bind::property` is returned.
/// 3. Otherwise `::vc_property` is returned, which may be incorrect.
///
/// Reading the manifest is relatively expensive, so the result is passed
/// around instead of being recomputed.
pub(crate) fn vc_property() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_property"))
}

#[inline(always)]
pub(crate) fn describe_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::describe::Describe
    }
}

#[inline(always)]
pub(crate) fn builder_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::describe::DescriptorBuilder
    }
}

#[inline(always)]
pub(crate) fn slot_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::describe::Slot
    }
}

#[inline(always)]
pub(crate) fn null_value_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::describe::NullValue
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn type_tag_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::describe::TypeTag
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(vc_property_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_property_path::__macro_exports::auto_register
    }
}
