use crate::derive_data::DescribeStruct;

/// Generate `auto_register` submission.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(data: &DescribeStruct) -> proc_macro2::TokenStream {
    use quote::quote_spanned;

    if let Some(span) = data.attrs().auto_register {
        // Invalid for generic types.
        if data.impl_with_generic() {
            return proc_macro2::TokenStream::new();
        }

        let vc_property_path = data.vc_property_path();
        let auto_register_ = crate::path::auto_register_(vc_property_path);
        let type_tag_ = crate::path::type_tag_(vc_property_path);
        let ident = data.ident();

        quote_spanned! { span =>
            #auto_register_::inventory::submit!{
                #auto_register_::__AutoRegisterFunc(#type_tag_::of::<#ident>)
            }
        }
    } else {
        proc_macro2::TokenStream::new()
    }
}

/// Generate `auto_register` submission.
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &DescribeStruct) -> proc_macro2::TokenStream {
    proc_macro2::TokenStream::new()
}
