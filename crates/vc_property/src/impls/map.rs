use alloc::collections::BTreeMap;
use alloc::string::String;
use core::hash::BuildHasher;

use crate::container::MapAccess;
use crate::describe::{ContainerKind, Describe, Inspect, TypeTag, Value};
use crate::impls::impl_generic_slot;

// `HashMap` is std-only; the hashbrown one lives in `crate::hash`.
type StdHashMap<K, V, S> = std::collections::HashMap<K, V, S>;

macro_rules! impl_string_map {
    (impl [$($generics:tt)*] $ty:ty) => {
        impl<$($generics)*> Describe for $ty {
            #[inline]
            fn default_instance() -> Option<Self> {
                Some(<$ty>::default())
            }

            #[inline]
            fn container_kind() -> ContainerKind {
                ContainerKind::Map
            }

            #[inline]
            fn element_type() -> Option<TypeTag> {
                Some(TypeTag::of::<V>())
            }

            #[inline]
            fn map_view(&self) -> Option<&dyn MapAccess> {
                Some(self)
            }

            #[inline]
            fn map_view_mut(&mut self) -> Option<&mut dyn MapAccess> {
                Some(self)
            }
        }

        impl<$($generics)*> MapAccess for $ty {
            #[inline]
            fn value_type(&self) -> TypeTag {
                TypeTag::of::<V>()
            }

            #[inline]
            fn len(&self) -> usize {
                <$ty>::len(self)
            }

            #[inline]
            fn get(&self, key: &str) -> Option<&dyn Inspect> {
                <$ty>::get(self, key).map(|v| v as &dyn Inspect)
            }

            #[inline]
            fn get_mut(&mut self, key: &str) -> Option<&mut dyn Inspect> {
                <$ty>::get_mut(self, key).map(|v| v as &mut dyn Inspect)
            }

            fn insert(&mut self, key: &str, value: Value) -> Result<(), Value> {
                <$ty>::insert(self, String::from(key), value.downcast::<V>()?);
                Ok(())
            }

            #[inline]
            fn remove(&mut self, key: &str) -> Option<Value> {
                <$ty>::remove(self, key).map(Value::new)
            }
        }

        impl_generic_slot!(impl [$($generics)*] $ty);
    };
}

impl_string_map!(
    impl [V: Describe, S: BuildHasher + Clone + Default + Send + Sync + 'static]
    StdHashMap<String, V, S>
);

impl_string_map!(
    impl [V: Describe, S: BuildHasher + Clone + Default + Send + Sync + 'static]
    hashbrown::HashMap<String, V, S>
);

impl_string_map!(impl [V: Describe] BTreeMap<String, V>);
