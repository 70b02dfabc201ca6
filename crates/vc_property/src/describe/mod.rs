//! Introspectable values.
//!
//! [`Describe`] is the static trait implemented by types whose properties can
//! be navigated, [`Inspect`] is its object-safe counterpart used while walking
//! a graph, and [`Value`] is an owned, type-erased value crossing the accessor
//! boundary.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod slot;
mod traits;
mod type_tag;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use builder::{DescriptorBuilder, TypeDescription};
pub use slot::{NullValue, Slot};
pub use traits::{Describe, Inspect};
pub use type_tag::{ContainerKind, TypeTag};
pub use value::Value;

pub(crate) use builder::{CandidateKind, NameForm};

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::access::AccessorMode;
    use crate::derive::Describe;
    use crate::describe::{DescriptorBuilder, Slot, Value};
    use crate::navigate::{PathNavigator, TraversalMode};
    use crate::registry::DescriptorRegistry;

    #[derive(Clone, Default, Describe)]
    #[describe(default, with = Self::extra)]
    struct Account {
        #[describe(read_only)]
        id: u64,
        #[describe(rename = "display_name")]
        name: String,
        #[describe(skip)]
        _cache: Option<String>,
        roles: Vec<String>,
    }

    impl Account {
        fn extra(builder: &mut DescriptorBuilder<Self>) {
            builder.adder("role", |a: &mut Self, role: String| a.roles.push(role));
        }
    }

    #[derive(Clone, Describe)]
    struct Version(u32, Option<String>);

    #[derive(Clone, Describe)]
    struct Marker;

    #[derive(Clone, Describe)]
    struct Pair<T: Clone> {
        first: T,
        second: Option<T>,
    }

    #[test]
    fn derived_field_attributes() {
        let registry = DescriptorRegistry::new();
        let descriptor = registry.descriptor_of::<Account>().unwrap();

        let names: Vec<&str> = descriptor.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["id", "display_name", "roles"]);

        let id = descriptor.property("id").unwrap();
        assert!(id.supports(AccessorMode::Get));
        assert!(!id.supports(AccessorMode::Set));
        let roles = descriptor.property("roles").unwrap();
        assert!(roles.supports(AccessorMode::AddIndexed));
        assert!(descriptor.instantiate().is_some());
    }

    #[test]
    fn derived_without_default_cannot_instantiate() {
        let registry = DescriptorRegistry::new();
        let version = registry.descriptor_of::<Version>().unwrap();
        assert!(version.instantiate().is_none());
        assert!(registry.descriptor_of::<Marker>().unwrap().is_empty());
    }

    #[test]
    fn tuple_fields_are_numbered() {
        let registry = DescriptorRegistry::new();
        let navigator = PathNavigator::new(&registry);
        let mut version = Version(3, None);

        let major = navigator.get_as::<u32>(&mut version, "0", TraversalMode::Read);
        assert_eq!(major.unwrap(), Some(3));

        let tag = Some(Value::new(String::from("beta")));
        assert!(navigator.set(&mut version, "1", tag, TraversalMode::Read).unwrap());
        assert_eq!(version.1.as_deref(), Some("beta"));
    }

    #[test]
    fn generic_struct() {
        assert!(!<Pair<String> as Slot>::NULLABLE);

        let registry = DescriptorRegistry::new();
        let descriptor = registry.descriptor_of::<Pair<String>>().unwrap();
        assert_eq!(descriptor.len(), 2);
        assert!(descriptor.property("second").unwrap().supports(AccessorMode::Set));
    }

    #[test]
    fn explicit_candidates_through_with() {
        let registry = DescriptorRegistry::new();
        let navigator = PathNavigator::new(&registry);
        let mut account = Account::default();

        let role = String::from("admin");
        let added = navigator.add_element(&mut account, "role", role, TraversalMode::Read);
        assert!(added.unwrap());
        assert_eq!(account.roles, ["admin"]);
    }
}
