use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::access::{Accessor, AccessorMode};
use crate::describe::{TypeTag, Value};
use crate::descriptor::PropertyDescriptor;
use crate::hash::{HashMap, new_map};
use crate::{PropertyError, PropertyErrorKind, PropertyResult};

/// The resolved properties of one type.
///
/// Built once per type by the [`DescriptorRegistry`](crate::registry::DescriptorRegistry)
/// and immutable afterwards.
///
/// # Examples
///
/// ```
/// use vc_property::prelude::*;
///
/// #[derive(Clone, Describe)]
/// struct Account {
///     name: String,
///     tags: Vec<String>,
/// }
///
/// let registry = DescriptorRegistry::new();
/// let descriptor = registry.descriptor_of::<Account>().unwrap();
///
/// assert!(descriptor.get_accessor("name", AccessorMode::Get, true).unwrap().is_some());
/// assert!(descriptor.get_accessor("tags", AccessorMode::GetIndexed, true).unwrap().is_some());
///
/// // Absence is normal unless required.
/// assert!(descriptor.get_accessor("name", AccessorMode::GetIndexed, false).unwrap().is_none());
///
/// let err = descriptor.get_accessor("name", AccessorMode::GetIndexed, true).unwrap_err();
/// assert!(matches!(err.kind(), PropertyErrorKind::AccessorNotApplicable { .. }));
///
/// let err = descriptor.get_accessor("not-existent", AccessorMode::Get, true).unwrap_err();
/// assert!(matches!(err.kind(), PropertyErrorKind::PropertyNotFound { .. }));
/// ```
pub struct TypeDescriptor {
    tag: TypeTag,
    properties: Box<[PropertyDescriptor]>,
    index: HashMap<Box<str>, usize>,
    constructor: fn() -> Option<Value>,
}

impl TypeDescriptor {
    pub(crate) fn new(
        tag: TypeTag,
        properties: Vec<PropertyDescriptor>,
        constructor: fn() -> Option<Value>,
    ) -> Self {
        let mut index = new_map();
        for (i, property) in properties.iter().enumerate() {
            index.insert(Box::from(property.name()), i);
        }
        Self {
            tag,
            properties: properties.into_boxed_slice(),
            index,
            constructor,
        }
    }

    #[inline]
    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.tag.name()
    }

    #[inline]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.index.get(name).map(|&i| &self.properties[i])
    }

    /// Properties in declaration order.
    #[inline]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Resolves the winning accessor of `name` for `mode`.
    ///
    /// With `required`, an unknown name fails with
    /// [`PropertyNotFound`](PropertyErrorKind::PropertyNotFound) and a known
    /// name lacking the mode with
    /// [`AccessorNotApplicable`](PropertyErrorKind::AccessorNotApplicable).
    /// Otherwise both cases yield `Ok(None)`.
    pub fn get_accessor(
        &self,
        name: &str,
        mode: AccessorMode,
        required: bool,
    ) -> PropertyResult<Option<&Accessor>> {
        if required {
            return self.require(name, mode).map(Some);
        }
        Ok(self.property(name).and_then(|property| property.accessor(mode)))
    }

    /// [`get_accessor`](Self::get_accessor) with `required` set.
    pub(crate) fn require(&self, name: &str, mode: AccessorMode) -> PropertyResult<&Accessor> {
        self.property(name)
            .ok_or_else(|| self.not_found(name))?
            .accessor(mode)
            .ok_or_else(|| self.not_applicable(name, mode))
    }

    /// A fresh instance from [`Describe::default_instance`](crate::describe::Describe::default_instance).
    #[inline]
    pub fn instantiate(&self) -> Option<Value> {
        (self.constructor)()
    }

    pub(crate) fn not_found(&self, name: &str) -> PropertyError {
        PropertyErrorKind::PropertyNotFound {
            type_name: self.tag.name(),
            property: name.into(),
        }
        .into()
    }

    pub(crate) fn not_applicable(&self, name: &str, mode: AccessorMode) -> PropertyError {
        PropertyErrorKind::AccessorNotApplicable {
            type_name: self.tag.name(),
            property: name.into(),
            mode,
        }
        .into()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("tag", &self.tag)
            .field("properties", &self.properties)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::PropertyErrorKind;
    use crate::access::{AccessorMode, AccessorOrigin};
    use crate::describe::{Describe, DescriptorBuilder};
    use crate::registry::DescriptorRegistry;

    #[derive(Clone, Default)]
    struct Profile {
        name: String,
        aliases: Vec<String>,
    }

    impl Describe for Profile {
        fn describe(builder: &mut DescriptorBuilder<Self>) {
            builder
                .field::<String>("name", |p| &p.name, |p| &mut p.name)
                .field::<Vec<String>>("aliases", |p| &p.aliases, |p| &mut p.aliases)
                .setter("name", |p: &mut Self, name: Option<String>| {
                    p.name = name.unwrap_or_default().trim().into();
                })
                .getter("initial", |p: &Self| p.name.chars().next());
        }
    }

    #[derive(Clone, Default)]
    struct Roster {
        members: Vec<String>,
    }

    impl Describe for Roster {
        fn describe(builder: &mut DescriptorBuilder<Self>) {
            builder.getter("members", |r: &Self| Some(r.members.clone()));
        }
    }

    #[test]
    fn explicit_wins_over_field() {
        let registry = DescriptorRegistry::new();
        let descriptor = registry.descriptor_of::<Profile>().unwrap();
        let name = descriptor.property("name").unwrap();

        let set = descriptor.get_accessor("name", AccessorMode::Set, true).unwrap();
        assert_eq!(set.unwrap().origin(), AccessorOrigin::Explicit);
        assert!(name.accessor_from(AccessorMode::Set, AccessorOrigin::Field).is_some());
        assert_eq!(
            name.accessor(AccessorMode::Get).unwrap().origin(),
            AccessorOrigin::Field
        );
    }

    #[test]
    fn readable_iff_get_accessor() {
        let registry = DescriptorRegistry::new();
        let descriptor = registry.descriptor_of::<Profile>().unwrap();

        for name in ["name", "aliases", "initial"] {
            assert!(descriptor.get_accessor(name, AccessorMode::Get, false).unwrap().is_some());
        }
        let initial = descriptor.property("initial").unwrap();
        assert!(!initial.supports(AccessorMode::Set));
        assert!(descriptor.get_accessor("missing", AccessorMode::Get, false).unwrap().is_none());
    }

    #[test]
    fn required_lookup_errors() {
        let registry = DescriptorRegistry::new();
        let descriptor = registry.descriptor_of::<Profile>().unwrap();

        let err = descriptor.get_accessor("not-existent", AccessorMode::Get, true).unwrap_err();
        assert!(err.is_resolution_failure());
        assert!(matches!(err.kind(), PropertyErrorKind::PropertyNotFound { .. }));

        let err = descriptor.get_accessor("name", AccessorMode::GetIndexed, true).unwrap_err();
        assert!(matches!(
            err.kind(),
            PropertyErrorKind::AccessorNotApplicable {
                mode: AccessorMode::GetIndexed,
                ..
            }
        ));
    }

    #[test]
    fn getter_container_gets_read_fallbacks() {
        let registry = DescriptorRegistry::new();
        let descriptor = registry.descriptor_of::<Roster>().unwrap();
        let members = descriptor.property("members").unwrap();

        let get = members.accessor(AccessorMode::GetIndexed).unwrap();
        assert_eq!(get.origin(), AccessorOrigin::Fallback);
        assert!(get.value_type().is::<String>());
        assert!(members.supports(AccessorMode::Size));
        assert!(!members.supports(AccessorMode::SetIndexed));
        assert!(!members.supports(AccessorMode::AddIndexed));
    }

    #[test]
    fn properties_keep_declaration_order() {
        let registry = DescriptorRegistry::new();
        let descriptor = registry.descriptor_of::<Profile>().unwrap();
        let names: Vec<&str> = descriptor.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["name", "aliases", "initial"]);
        assert!(descriptor.instantiate().is_none());
    }
}
