use thiserror::Error;

use crate::describe::Describe;

/// Returned by [`Slot::put`] when a null is written into a non-nullable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("slot is not nullable")]
pub struct NullValue;

/// Storage of a field as seen by navigation.
///
/// A slot either always holds a value (`T`) or may be null (`Option<T>`).
/// `#[derive(Describe)]` implements `Slot` for the deriving type, and this
/// crate implements it for scalars, strings, the supported containers and
/// `Option<T>`.
pub trait Slot: Send + Sync + 'static {
    /// The declared value type.
    type Target: Describe;

    /// Whether the slot accepts a null.
    const NULLABLE: bool;

    fn get(&self) -> Option<&Self::Target>;

    fn get_mut(&mut self) -> Option<&mut Self::Target>;

    fn put(&mut self, value: Option<Self::Target>) -> Result<(), NullValue>;
}

impl<T: Describe> Slot for Option<T> {
    type Target = T;

    const NULLABLE: bool = true;

    #[inline]
    fn get(&self) -> Option<&T> {
        self.as_ref()
    }

    #[inline]
    fn get_mut(&mut self) -> Option<&mut T> {
        self.as_mut()
    }

    #[inline]
    fn put(&mut self, value: Option<T>) -> Result<(), NullValue> {
        *self = value;
        Ok(())
    }
}

/// Implements [`Slot`] for types that always hold a value.
///
/// ```
/// use vc_property::describe::Describe;
///
/// #[derive(Clone)]
/// struct Token(u64);
///
/// impl Describe for Token {}
///
/// vc_property::impl_plain_slot!(Token);
/// ```
#[macro_export]
macro_rules! impl_plain_slot {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::describe::Slot for $ty {
            type Target = Self;

            const NULLABLE: bool = false;

            #[inline]
            fn get(&self) -> ::core::option::Option<&Self> {
                ::core::option::Option::Some(self)
            }

            #[inline]
            fn get_mut(&mut self) -> ::core::option::Option<&mut Self> {
                ::core::option::Option::Some(self)
            }

            #[inline]
            fn put(
                &mut self,
                value: ::core::option::Option<Self>,
            ) -> ::core::result::Result<(), $crate::describe::NullValue> {
                match value {
                    ::core::option::Option::Some(value) => {
                        *self = value;
                        ::core::result::Result::Ok(())
                    }
                    ::core::option::Option::None => {
                        ::core::result::Result::Err($crate::describe::NullValue)
                    }
                }
            }
        }
    )*};
}
