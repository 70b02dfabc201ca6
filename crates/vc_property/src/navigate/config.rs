/// Tuning of a [`PathNavigator`](crate::navigate::PathNavigator).
///
/// With the `serde` feature enabled, missing fields deserialize to their
/// defaults.
///
/// # Examples
///
/// ```
/// use vc_property::navigate::NavigatorConfig;
///
/// let config = NavigatorConfig::default().with_auto_grow_limit(16);
/// assert_eq!(config.auto_grow_limit, 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavigatorConfig {
    /// Upper bound (exclusive) for indices reached by growing a list, and for
    /// the size of a map grown by inserting absent keys.
    pub auto_grow_limit: usize,
}

impl NavigatorConfig {
    pub const DEFAULT_AUTO_GROW_LIMIT: usize = 1024;

    #[inline]
    pub const fn new() -> Self {
        Self {
            auto_grow_limit: Self::DEFAULT_AUTO_GROW_LIMIT,
        }
    }

    #[inline]
    pub const fn with_auto_grow_limit(mut self, limit: usize) -> Self {
        self.auto_grow_limit = limit;
        self
    }
}

impl Default for NavigatorConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
