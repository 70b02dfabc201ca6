//! Path navigation over object graphs.
//!
//! A [`PathNavigator`] resolves each segment of a
//! [`PropertyPath`](crate::path::PropertyPath) against the
//! [`DescriptorRegistry`](crate::registry::DescriptorRegistry) and performs
//! the requested operation on the last one.

// -----------------------------------------------------------------------------
// Modules

mod config;
mod factory;
mod mode;
mod navigator;

// -----------------------------------------------------------------------------
// Exports

pub use config::NavigatorConfig;
pub use factory::{ContainerFactory, DefaultFactory, ObjectFactory};
pub use mode::TraversalMode;
pub use navigator::PathNavigator;
