/// How navigation treats a null intermediate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TraversalMode {
    /// Stop at the first null and report a null result. Never mutates.
    #[default]
    Read,
    /// Instantiate the missing value, wire it into its parent and continue.
    CreateIfNull,
}

impl TraversalMode {
    #[inline]
    pub const fn creates(self) -> bool {
        matches!(self, Self::CreateIfNull)
    }
}
