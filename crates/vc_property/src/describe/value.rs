use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::describe::{Describe, Inspect, TypeTag};

/// An owned, type-erased value.
///
/// Produced by getters and consumed by setters. A null value is represented
/// as `Option<Value>::None` at the API boundary, never inside a `Value`.
///
/// # Examples
///
/// ```
/// use vc_property::describe::Value;
///
/// let value = Value::new(42_u16);
/// assert!(value.is::<u16>());
/// assert_eq!(value.downcast_ref::<u16>(), Some(&42));
///
/// let value: Value = String::from("x").into();
/// assert_eq!(value.downcast::<String>().unwrap(), "x");
/// ```
pub struct Value(Box<dyn Inspect>);

impl Value {
    #[inline]
    pub fn new<T: Describe>(value: T) -> Self {
        Self(Box::new(value))
    }

    #[inline]
    pub fn from_boxed(value: Box<dyn Inspect>) -> Self {
        Self(value)
    }

    #[inline]
    pub fn into_boxed(self) -> Box<dyn Inspect> {
        self.0
    }

    #[inline]
    pub fn type_tag(&self) -> TypeTag {
        self.0.type_tag()
    }

    #[inline]
    pub fn is<T: Describe>(&self) -> bool {
        self.0.is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Describe>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Describe>(&mut self) -> Option<&mut T> {
        self.0.downcast_mut::<T>()
    }

    /// Takes the concrete value out, or gives `self` back on a type mismatch.
    pub fn downcast<T: Describe>(self) -> Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self.0;
        match any.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("type checked by `is`"),
        }
    }

    #[inline]
    pub fn as_inspect(&self) -> &dyn Inspect {
        &*self.0
    }

    #[inline]
    pub fn as_inspect_mut(&mut self) -> &mut dyn Inspect {
        &mut *self.0
    }
}

impl<T: Describe> From<T> for Value {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl Clone for Value {
    #[inline]
    fn clone(&self) -> Self {
        self.0.clone_value()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.type_tag().name()).finish()
    }
}
