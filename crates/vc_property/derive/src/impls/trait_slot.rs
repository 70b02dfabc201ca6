use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::DescribeStruct;

/// Generate a never-null `Slot` implementation, so the type can be used as a
/// plain field of another described type.
pub(crate) fn impl_trait_slot(data: &DescribeStruct) -> TokenStream {
    if !data.attrs().impl_slot {
        return TokenStream::new();
    }

    let vc_property_path = data.vc_property_path();
    let slot_ = crate::path::slot_(vc_property_path);
    let null_value_ = crate::path::null_value_(vc_property_path);
    let ident = data.ident();

    let (impl_generics, ty_generics, where_clause) = data.split_generics(true);

    quote! {
        impl #impl_generics #slot_ for #ident #ty_generics #where_clause {
            type Target = Self;

            const NULLABLE: bool = false;

            #[inline]
            fn get(&self) -> ::core::option::Option<&Self> {
                ::core::option::Option::Some(self)
            }

            #[inline]
            fn get_mut(&mut self) -> ::core::option::Option<&mut Self> {
                ::core::option::Option::Some(self)
            }

            #[inline]
            fn put(
                &mut self,
                value: ::core::option::Option<Self>,
            ) -> ::core::result::Result<(), #null_value_> {
                match value {
                    ::core::option::Option::Some(value) => {
                        *self = value;
                        ::core::result::Result::Ok(())
                    }
                    ::core::option::Option::None => ::core::result::Result::Err(#null_value_),
                }
            }
        }
    }
}
