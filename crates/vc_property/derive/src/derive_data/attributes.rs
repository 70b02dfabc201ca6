use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Attribute, LitBool, LitStr, Path};

use crate::DESCRIBE_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Type attributes

/// Parsed `#[describe(...)]` attributes of the deriving type.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// `default`: `default_instance` uses `Default::default`.
    pub default: Option<Span>,
    /// `auto_register`: collected for `DescriptorRegistry::auto_register`.
    pub auto_register: Option<Span>,
    /// `slot = false`: skip the plain `Slot` implementation.
    pub impl_slot: bool,
    /// `with = path`: extra candidates declared by `path(builder)`.
    pub with: Option<Path>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self {
            impl_slot: true,
            ..Self::default()
        };

        for attr in attrs {
            if !attr.path().is_ident(DESCRIBE_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("default") {
                    this.default = Some(meta.path.span());
                } else if meta.path.is_ident("auto_register") {
                    this.auto_register = Some(meta.path.span());
                } else if meta.path.is_ident("slot") {
                    this.impl_slot = meta.value()?.parse::<LitBool>()?.value();
                } else if meta.path.is_ident("with") {
                    if this.with.is_some() {
                        return Err(meta.error("duplicate `with` attribute"));
                    }
                    this.with = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error(concat!(
                        "unsupported type attribute, ",
                        "expected `default`, `auto_register`, `slot` or `with`"
                    )));
                }
                Ok(())
            })?;
        }

        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// Parsed `#[describe(...)]` attributes of one field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    /// `skip`: the field is not a property.
    pub skip: bool,
    /// `read_only`: no SET accessor.
    pub read_only: bool,
    /// `rename = "..."`: property name other than the field name.
    pub rename: Option<LitStr>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(DESCRIBE_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    this.skip = true;
                } else if meta.path.is_ident("read_only") {
                    this.read_only = true;
                } else if meta.path.is_ident("rename") {
                    let name: LitStr = meta.value()?.parse()?;
                    if name.value().is_empty() {
                        return Err(syn::Error::new(name.span(), "property name cannot be empty"));
                    }
                    this.rename = Some(name);
                } else {
                    return Err(meta.error(
                        "unsupported field attribute, expected `skip`, `read_only` or `rename`",
                    ));
                }
                Ok(())
            })?;
        }

        Ok(this)
    }
}
