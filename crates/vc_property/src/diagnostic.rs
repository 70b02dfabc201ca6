//! Rendering of errors into user-facing messages.
//!
//! A [`MessageCatalog`] only produces text. Navigation never inspects what it
//! returns, so a localized catalog can be plugged in without changing
//! behavior.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};

use crate::PropertyError;

/// Turns a [`PropertyError`] into a message.
///
/// Closures `Fn(&PropertyError) -> String` implement this trait.
pub trait MessageCatalog: Send + Sync {
    fn render<'a>(&'a self, error: &PropertyError) -> Cow<'a, str>;
}

impl<F: Fn(&PropertyError) -> String + Send + Sync> MessageCatalog for F {
    #[inline]
    fn render<'a>(&'a self, error: &PropertyError) -> Cow<'a, str> {
        Cow::Owned(self(error))
    }
}

/// Renders errors with their [`Display`](core::fmt::Display) output.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainMessages;

impl MessageCatalog for PlainMessages {
    #[inline]
    fn render<'a>(&'a self, error: &PropertyError) -> Cow<'a, str> {
        Cow::Owned(error.to_string())
    }
}
