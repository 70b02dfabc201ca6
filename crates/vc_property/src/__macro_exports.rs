//! Items used by code generated from `#[derive(Describe)]`.
//!
//! Not part of the public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::describe::TypeTag;

    /// One entry per type annotated with `#[describe(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn() -> TypeTag);

    inventory::collect!(__AutoRegisterFunc);
}
