//! Capability-tagged accessors.
//!
//! An [`Accessor`] is bound to one (type, property, [`AccessorMode`]) triple.
//! A property exposes any subset of the modes; a missing mode is normal and
//! only becomes an error when a caller requires it.
//!
//! Accessors have one of three origins, in order of precedence:
//!
//! - [`AccessorOrigin::Explicit`]: getters, setters and element functions
//!   declared on the [`DescriptorBuilder`](crate::describe::DescriptorBuilder).
//! - [`AccessorOrigin::Field`]: direct field access.
//! - [`AccessorOrigin::Fallback`]: indexed, mapped, add and size operations
//!   synthesized from a container field's native operations.

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod invoker;
mod mode;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::Accessor;
pub use mode::{AccessorMode, AccessorOrigin, Args};

pub(crate) use accessor::Step;
pub(crate) use invoker::{
    AddFn, Fault, FieldAccess, FieldSlot, GetFn, GetIndexedFn, GetMappedFn, Invoker, RoundTrip,
    SetFn, SetIndexedFn, SetMappedFn, SizeFn, argument, owner, owner_mut,
};
