//! Hash containers used across the crate.
//!
//! The registry keys its cache by [`TypeId`](core::any::TypeId) and descriptors
//! index properties by name, both of which only need a fast, deterministic hasher.

pub use foldhash;
pub use hashbrown;

/// Fixed-seed [`foldhash`] state.
pub type FixedState = foldhash::fast::FixedState;

/// A [`hashbrown::HashMap`] using [`FixedState`] by default.
pub type HashMap<K, V, S = FixedState> = hashbrown::HashMap<K, V, S>;

/// Creates an empty [`HashMap`] with the fixed hasher.
#[inline]
pub fn new_map<K, V>() -> HashMap<K, V> {
    HashMap::with_hasher(FixedState::default())
}
