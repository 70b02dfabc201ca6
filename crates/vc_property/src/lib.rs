#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Usually, we need to use `crate` in the crate itself and use `vc_property` in doc testing.
// But `macro_utils::Manifest` can only choose one, so we must have an
// `extern self` to ensure `vc_property` can be used as an alias for `crate`.
extern crate self as vc_property;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod access;
pub mod container;
pub mod describe;
pub mod descriptor;
pub mod diagnostic;
pub mod hash;
pub mod impls;
pub mod navigate;
pub mod path;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use error::{BoxError, PropertyError, PropertyErrorKind, PropertyResult};
pub use vc_property_derive as derive;

/// The most commonly used items.
pub mod prelude {
    pub use crate::access::AccessorMode;
    pub use crate::derive::Describe;
    pub use crate::describe::{Describe, Inspect, Value};
    pub use crate::navigate::{PathNavigator, TraversalMode};
    pub use crate::path::PropertyPath;
    pub use crate::registry::DescriptorRegistry;
    pub use crate::{PropertyError, PropertyErrorKind, PropertyResult};
}
