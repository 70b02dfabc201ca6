// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod trait_describe;
mod trait_slot;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use auto_register::get_auto_register_impl;
pub(crate) use trait_describe::impl_trait_describe;
pub(crate) use trait_slot::impl_trait_slot;
