//! Discovery and caching of [`TypeDescriptor`]s.
//!
//! The [`DescriptorRegistry`] is the only shared mutable state of the crate.
//! It is an ordinary value: create one, share it by reference, and pass it to
//! a [`PathNavigator`](crate::navigate::PathNavigator).

// -----------------------------------------------------------------------------
// Modules

mod discovery;
mod naming;

// -----------------------------------------------------------------------------
// Exports

pub use naming::{NamingConvention, PluralTable, SuffixPlural};

// -----------------------------------------------------------------------------
// DescriptorRegistry

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use hashbrown::hash_map::Entry;

use crate::PropertyResult;
use crate::describe::{Describe, Inspect, TypeTag};
use crate::descriptor::TypeDescriptor;
use crate::hash::{HashMap, new_map};

/// A registry of discovered [`TypeDescriptor`]s.
///
/// Descriptors are discovered lazily on first request and cached by
/// [`TypeId`]. A published descriptor never changes. When several threads
/// discover the same type at once, exactly one result is published and the
/// others are discarded.
///
/// A type whose description is ambiguous is never cached, so every request
/// reports the same [`AmbiguousAccessor`](crate::PropertyErrorKind::AmbiguousAccessor)
/// error.
///
/// # Example
///
/// ```
/// use vc_property::prelude::*;
/// use vc_property::registry::PluralTable;
///
/// #[derive(Clone, Describe)]
/// struct Node {
///     children: Vec<String>,
/// }
///
/// let registry = DescriptorRegistry::with_naming(PluralTable::new().with("child", "children"));
///
/// let first = registry.descriptor_of::<Node>().unwrap();
/// let second = registry.descriptor_of::<Node>().unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(registry.len(), 1);
/// ```
pub struct DescriptorRegistry {
    cache: RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>,
    naming: Box<dyn NamingConvention>,
}

impl Default for DescriptorRegistry {
    /// See [`DescriptorRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorRegistry {
    /// Creates an empty registry using the trailing-`s` plural rule.
    #[inline]
    pub fn new() -> Self {
        Self::with_naming(SuffixPlural)
    }

    /// Creates an empty registry with a custom singular to plural mapping.
    pub fn with_naming(naming: impl NamingConvention + 'static) -> Self {
        Self {
            cache: RwLock::new(new_map()),
            naming: Box::new(naming),
        }
    }

    #[inline]
    pub fn naming(&self) -> &dyn NamingConvention {
        &*self.naming
    }

    /// Returns the descriptor of `tag`, discovering it on a cache miss.
    pub fn get_descriptor(&self, tag: TypeTag) -> PropertyResult<Arc<TypeDescriptor>> {
        if let Some(descriptor) = self.cached(tag.id()) {
            return Ok(descriptor);
        }

        // Discovery runs user code; keep it outside the lock.
        let discovered = Arc::new(discovery::discover(tag.description(), &*self.naming)?);

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        match cache.entry(tag.id()) {
            Entry::Occupied(entry) => {
                log::trace!("discarded concurrent discovery of `{}`", tag.name());
                Ok(entry.get().clone())
            }
            Entry::Vacant(entry) => Ok(entry.insert(discovered).clone()),
        }
    }

    #[inline]
    pub fn descriptor_of<T: Describe>(&self) -> PropertyResult<Arc<TypeDescriptor>> {
        self.get_descriptor(TypeTag::of::<T>())
    }

    /// Returns the descriptor of the runtime type of `value`.
    #[inline]
    pub fn descriptor_for(&self, value: &dyn Inspect) -> PropertyResult<Arc<TypeDescriptor>> {
        self.get_descriptor(value.type_tag())
    }

    /// Discovers `T` eagerly, surfacing description errors early.
    #[inline]
    pub fn register<T: Describe>(&self) -> PropertyResult<()> {
        self.descriptor_of::<T>().map(|_| ())
    }

    pub fn contains(&self, tag: TypeTag) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&tag.id())
    }

    /// The number of cached descriptors.
    pub fn len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached descriptor.
    ///
    /// Descriptors already handed out stay valid; later requests discover again.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Discovers every type annotated with `#[describe(auto_register)]`.
    ///
    /// Returns the number of types now cached through auto registration.
    /// Types failing discovery are skipped with a warning.
    ///
    /// ## Feature Dependency
    ///
    /// Requires the `auto_register` feature. When disabled, it does nothing
    /// and returns `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_property::prelude::*;
    /// use vc_property::describe::TypeTag;
    ///
    /// #[derive(Clone, Describe)]
    /// #[describe(auto_register)]
    /// struct Settings {
    ///     theme: String,
    /// }
    ///
    /// let registry = DescriptorRegistry::new();
    /// # #[cfg(feature = "auto_register")]
    /// # {
    /// assert!(registry.auto_register() >= 1);
    /// assert!(registry.contains(TypeTag::of::<Settings>()));
    /// # }
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&self) -> usize {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register::{__AutoRegisterFunc, inventory};

            let mut registered = 0;
            for registration in inventory::iter::<__AutoRegisterFunc> {
                let tag = (registration.0)();
                match self.get_descriptor(tag) {
                    Ok(_) => registered += 1,
                    Err(err) => log::warn!("auto registration of `{}` failed: {err}", tag.name()),
                }
            }
            registered
        }
        #[cfg(not(feature = "auto_register"))]
        {
            0
        }
    }

    fn cached(&self, id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

impl fmt::Debug for DescriptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorRegistry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::*;
    use crate::PropertyErrorKind;
    use crate::access::{AccessorMode, AccessorOrigin};
    use crate::describe::DescriptorBuilder;

    #[derive(Clone, Default)]
    struct Basket {
        items: Vec<String>,
        label: Option<String>,
    }

    impl Describe for Basket {
        fn describe(builder: &mut DescriptorBuilder<Self>) {
            builder
                .field::<Vec<String>>("items", |b| &b.items, |b| &mut b.items)
                .field::<Option<String>>("label", |b| &b.label, |b| &mut b.label)
                .adder("item", |b: &mut Self, item: String| b.items.push(item))
                .counter("item", |b| b.items.len());
        }
    }

    #[derive(Clone)]
    struct Twice;

    impl Describe for Twice {
        fn describe(builder: &mut DescriptorBuilder<Self>) {
            builder
                .getter("name", |_: &Self| Some(String::from("a")))
                .getter("name", |_: &Self| Some(String::from("b")));
        }
    }

    #[derive(Clone)]
    struct Empty;

    impl Describe for Empty {}

    #[test]
    fn singular_candidates_attach_to_plural() {
        let registry = DescriptorRegistry::new();
        let descriptor = registry.descriptor_of::<Basket>().unwrap();

        assert!(descriptor.property("item").is_none());
        let items = descriptor.property("items").unwrap();
        assert_eq!(
            items.accessor(AccessorMode::AddIndexed).unwrap().origin(),
            AccessorOrigin::Explicit
        );
        assert_eq!(
            items.accessor(AccessorMode::Size).unwrap().origin(),
            AccessorOrigin::Explicit
        );
        assert!(
            items
                .accessor_from(AccessorMode::AddIndexed, AccessorOrigin::Fallback)
                .is_some()
        );
        assert_eq!(
            items.accessor(AccessorMode::GetIndexed).unwrap().origin(),
            AccessorOrigin::Fallback
        );
    }

    #[test]
    fn singular_without_plural_keeps_name() {
        let registry = DescriptorRegistry::with_naming(|s: &str| alloc::format!("{s}List"));
        let descriptor = registry.descriptor_of::<Basket>().unwrap();
        assert!(descriptor.property("item").is_some());
        assert!(
            descriptor
                .get_accessor("item", AccessorMode::AddIndexed, true)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn empty_type_is_valid() {
        let registry = DescriptorRegistry::new();
        let descriptor = registry.descriptor_of::<Empty>().unwrap();
        assert!(descriptor.is_empty());
        assert!(registry.contains(TypeTag::of::<Empty>()));
    }

    #[test]
    fn ambiguity_is_not_cached() {
        let registry = DescriptorRegistry::new();
        for _ in 0..2 {
            let err = registry.descriptor_of::<Twice>().unwrap_err();
            assert!(matches!(
                err.kind(),
                PropertyErrorKind::AmbiguousAccessor {
                    mode: AccessorMode::Get,
                    ..
                }
            ));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_invalidates() {
        let registry = DescriptorRegistry::new();
        let before = registry.descriptor_of::<Basket>().unwrap();
        registry.clear();
        assert!(!registry.contains(TypeTag::of::<Basket>()));

        let after = registry.descriptor_of::<Basket>().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.len(), after.len());
    }

    #[test]
    fn racing_discovery_publishes_once() {
        let registry = DescriptorRegistry::new();
        let results: Vec<Arc<TypeDescriptor>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.descriptor_of::<Basket>().unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(registry.len(), 1);
        let published = registry.descriptor_of::<Basket>().unwrap();
        for descriptor in &results {
            assert!(Arc::ptr_eq(descriptor, &published));
        }
    }
}
