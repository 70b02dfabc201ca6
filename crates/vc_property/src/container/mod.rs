//! Object-safe container views.
//!
//! The registry synthesizes fallback accessors for fields whose declared type
//! is list-like or map-like. Those accessors operate on the container through
//! these traits, so any container type can take part in indexed or mapped
//! navigation by implementing one of them and returning it from
//! [`Describe::list_view`](crate::describe::Describe::list_view) or
//! [`Describe::map_view`](crate::describe::Describe::map_view).
//!
//! Write methods hand a rejected value back as `Err` when its type does not
//! match the element type.

use crate::describe::{Inspect, TypeTag, Value};

/// An ordered container indexable by position.
pub trait ListAccess: Send + Sync {
    fn element_type(&self) -> TypeTag;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&dyn Inspect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Inspect>;

    /// Replaces the element at `index`, which must be in bounds.
    fn set(&mut self, index: usize, value: Value) -> Result<(), Value>;

    /// Inserts at `index`, which must not exceed the length.
    fn insert(&mut self, index: usize, value: Value) -> Result<(), Value>;

    fn push(&mut self, value: Value) -> Result<(), Value>;
}

/// A container keyed by string.
pub trait MapAccess: Send + Sync {
    fn value_type(&self) -> TypeTag;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &str) -> Option<&dyn Inspect>;

    fn get_mut(&mut self, key: &str) -> Option<&mut dyn Inspect>;

    /// Inserts or replaces the value under `key`.
    fn insert(&mut self, key: &str, value: Value) -> Result<(), Value>;

    fn remove(&mut self, key: &str) -> Option<Value>;
}
