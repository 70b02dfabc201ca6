//! Resolved, immutable descriptors.
//!
//! A [`TypeDescriptor`] maps property names to [`PropertyDescriptor`]s, each
//! owning the [`Accessor`](crate::access::Accessor)s discovered for that name.

// -----------------------------------------------------------------------------
// Modules

mod property;
mod type_descriptor;

// -----------------------------------------------------------------------------
// Exports

pub use property::PropertyDescriptor;
pub use type_descriptor::TypeDescriptor;
