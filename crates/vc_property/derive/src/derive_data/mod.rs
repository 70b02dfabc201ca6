// -----------------------------------------------------------------------------
// Modules

mod attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes};

use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Data, DeriveInput, Fields, Generics, Ident, ImplGenerics, LitStr, Member, Path, Type,
    TypeGenerics,
};

/// A field that becomes a property.
pub(crate) struct DescribeField<'a> {
    pub member: Member,
    pub name: LitStr,
    pub ty: &'a Type,
    pub read_only: bool,
}

/// Everything the derive needs to know about the input struct.
pub(crate) struct DescribeStruct<'a> {
    vc_property_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
    fields: Vec<DescribeField<'a>>,
}

impl<'a> DescribeStruct<'a> {
    pub fn from_derive_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;

        let data = match &input.data {
            Data::Struct(data) => data,
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span(),
                    "`Describe` cannot be derived for enums, implement it manually",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span(),
                    "`Describe` cannot be derived for unions",
                ));
            }
        };

        let mut fields = Vec::new();
        let mut names: Vec<String> = Vec::new();

        let members: Vec<_> = match &data.fields {
            Fields::Named(named) => named.named.iter().collect(),
            Fields::Unnamed(unnamed) => unnamed.unnamed.iter().collect(),
            Fields::Unit => Vec::new(),
        };

        for (index, field) in members.into_iter().enumerate() {
            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            if field_attrs.skip {
                continue;
            }

            let member = match &field.ident {
                Some(ident) => Member::Named(ident.clone()),
                None => Member::Unnamed(syn::Index {
                    index: index as u32,
                    span: field.ty.span(),
                }),
            };

            let name = match field_attrs.rename {
                Some(name) => name,
                None => match &field.ident {
                    Some(ident) => {
                        let raw = ident.to_string();
                        let raw = raw.strip_prefix("r#").unwrap_or(&raw).to_owned();
                        LitStr::new(&raw, ident.span())
                    }
                    None => LitStr::new(&index.to_string(), field.ty.span()),
                },
            };

            let value = name.value();
            if names.contains(&value) {
                return Err(syn::Error::new(
                    name.span(),
                    format!("duplicate property name `{value}`"),
                ));
            }
            names.push(value);

            fields.push(DescribeField {
                member,
                name,
                ty: &field.ty,
                read_only: field_attrs.read_only,
            });
        }

        Ok(Self {
            vc_property_path: crate::path::vc_property(),
            attrs,
            ident: &input.ident,
            generics: &input.generics,
            fields,
        })
    }

    #[inline]
    pub fn vc_property_path(&self) -> &Path {
        &self.vc_property_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        self.ident
    }

    #[inline]
    pub fn fields(&self) -> &[DescribeField<'a>] {
        &self.fields
    }

    /// Whether the type has type or const parameters.
    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        self.generics.type_params().next().is_some()
            || self.generics.const_params().next().is_some()
    }

    /// Splits generics for an impl block.
    ///
    /// The where clause keeps existing predicates and adds what `Describe`
    /// requires of `Self`. With `add_field_slots`, every field type must also
    /// be a `Slot`.
    pub fn split_generics(
        &self,
        add_field_slots: bool,
    ) -> (ImplGenerics<'_>, TypeGenerics<'_>, TokenStream) {
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let mut generic_where_clause = quote! { where };

        if self.impl_with_generic() {
            generic_where_clause.extend(quote! {
                Self: ::core::clone::Clone + ::core::marker::Send + ::core::marker::Sync + 'static,
            });
        } else if self.generics.lifetimes().next().is_some() {
            generic_where_clause.extend(quote! { Self: 'static, });
        }

        if let Some(where_clause) = where_clause {
            let predicates = where_clause.predicates.iter();
            generic_where_clause.extend(quote! { #(#predicates,)* });
        }

        if add_field_slots && self.impl_with_generic() {
            let slot_ = crate::path::slot_(&self.vc_property_path);
            for field in &self.fields {
                let ty = field.ty;
                generic_where_clause.extend(quote! { #ty: #slot_, });
            }
        }

        (impl_generics, ty_generics, generic_where_clause)
    }
}
