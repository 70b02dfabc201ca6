//! Built-in [`Describe`](crate::describe::Describe) and
//! [`Slot`](crate::describe::Slot) implementations.
//!
//! - Scalars: `bool`, `char`, every integer and float primitive, `String`.
//! - Lists: `Vec<T>`, `VecDeque<T>`.
//! - Maps keyed by `String`: std `HashMap`, `BTreeMap` and
//!   [`hash::HashMap`](crate::hash::HashMap).
//!
//! Every built-in type can be instantiated, so navigation can materialize it.

// -----------------------------------------------------------------------------
// Modules

mod list;
mod map;
mod scalar;

/// Implements a never-null [`Slot`](crate::describe::Slot) for a generic type.
macro_rules! impl_generic_slot {
    (impl [$($generics:tt)*] $ty:ty) => {
        impl<$($generics)*> $crate::describe::Slot for $ty {
            type Target = Self;

            const NULLABLE: bool = false;

            #[inline]
            fn get(&self) -> Option<&Self> {
                Some(self)
            }

            #[inline]
            fn get_mut(&mut self) -> Option<&mut Self> {
                Some(self)
            }

            #[inline]
            fn put(&mut self, value: Option<Self>) -> Result<(), $crate::describe::NullValue> {
                match value {
                    Some(value) => {
                        *self = value;
                        Ok(())
                    }
                    None => Err($crate::describe::NullValue),
                }
            }
        }
    };
}

use impl_generic_slot;
