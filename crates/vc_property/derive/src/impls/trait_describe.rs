use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::derive_data::DescribeStruct;

/// Generate the `Describe` implementation.
///
/// ```ignore
/// impl Describe for Foo {
///     fn describe(builder: &mut DescriptorBuilder<Self>) {
///         builder
///             .field::<String>("name", |this| &this.name, |this| &mut this.name)
///             .read_only_field::<u32>("id", |this| &this.id, |this| &mut this.id);
///         with_fn(builder);
///     }
///
///     fn default_instance() -> Option<Self> {
///         Some(<Self as Default>::default())
///     }
/// }
/// ```
pub(crate) fn impl_trait_describe(data: &DescribeStruct) -> TokenStream {
    let vc_property_path = data.vc_property_path();
    let describe_ = crate::path::describe_(vc_property_path);
    let builder_ = crate::path::builder_(vc_property_path);
    let ident = data.ident();

    let fields = data.fields().iter().map(|field| {
        let ty = field.ty;
        let name = &field.name;
        let member = &field.member;
        let method = if field.read_only {
            quote! { read_only_field }
        } else {
            quote! { field }
        };
        quote! {
            builder.#method::<#ty>(#name, |this| &this.#member, |this| &mut this.#member);
        }
    });

    let with = data.attrs().with.as_ref().map(|path| {
        quote! { #path(builder); }
    });

    let describe_fn = if data.fields().is_empty() && with.is_none() {
        quote! {}
    } else {
        quote! {
            fn describe(builder: &mut #builder_<Self>) {
                #(#fields)*
                #with
            }
        }
    };

    let default_fn = match data.attrs().default {
        Some(span) => quote_spanned! { span =>
            #[inline]
            fn default_instance() -> ::core::option::Option<Self> {
                ::core::option::Option::Some(<Self as ::core::default::Default>::default())
            }
        },
        None => quote! {},
    };

    let (impl_generics, ty_generics, where_clause) = data.split_generics(true);

    quote! {
        impl #impl_generics #describe_ for #ident #ty_generics #where_clause {
            #describe_fn
            #default_fn
        }
    }
}
