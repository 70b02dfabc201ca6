//! Creation of values for null slots met during navigation.

use crate::describe::{ContainerKind, Value};
use crate::descriptor::TypeDescriptor;

/// Creates instances of non-container types.
///
/// Closures `Fn(&TypeDescriptor) -> Option<Value>` implement this trait.
/// Returning `None` makes navigation fail with
/// [`InstantiationFailed`](crate::PropertyErrorKind::InstantiationFailed).
pub trait ObjectFactory: Send + Sync {
    fn instantiate(&self, descriptor: &TypeDescriptor) -> Option<Value>;
}

impl<F: Fn(&TypeDescriptor) -> Option<Value> + Send + Sync> ObjectFactory for F {
    #[inline]
    fn instantiate(&self, descriptor: &TypeDescriptor) -> Option<Value> {
        self(descriptor)
    }
}

/// Creates empty lists and maps.
///
/// Closures `Fn(ContainerKind, &TypeDescriptor) -> Option<Value>` implement
/// this trait.
pub trait ContainerFactory: Send + Sync {
    fn create(&self, kind: ContainerKind, descriptor: &TypeDescriptor) -> Option<Value>;
}

impl<F: Fn(ContainerKind, &TypeDescriptor) -> Option<Value> + Send + Sync> ContainerFactory for F {
    #[inline]
    fn create(&self, kind: ContainerKind, descriptor: &TypeDescriptor) -> Option<Value> {
        self(kind, descriptor)
    }
}

/// Uses [`Describe::default_instance`](crate::describe::Describe::default_instance)
/// for objects and containers alike.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFactory;

impl ObjectFactory for DefaultFactory {
    #[inline]
    fn instantiate(&self, descriptor: &TypeDescriptor) -> Option<Value> {
        descriptor.instantiate()
    }
}

impl ContainerFactory for DefaultFactory {
    #[inline]
    fn create(&self, _: ContainerKind, descriptor: &TypeDescriptor) -> Option<Value> {
        descriptor.instantiate()
    }
}
