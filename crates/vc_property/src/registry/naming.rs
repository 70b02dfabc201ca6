use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::fmt;

use crate::hash::{HashMap, new_map};

/// Maps the singular name of a collection element to the collection's name.
///
/// Used to attach `adder`/`counter` candidates (declared as `item`) to the
/// collection property (`items`), and to resolve the final name of
/// [`PathNavigator::add_element`](crate::navigate::PathNavigator::add_element).
///
/// Closures `Fn(&str) -> String` implement this trait.
pub trait NamingConvention: Send + Sync {
    fn plural<'a>(&self, singular: &'a str) -> Cow<'a, str>;
}

impl<F: Fn(&str) -> String + Send + Sync> NamingConvention for F {
    #[inline]
    fn plural<'a>(&self, singular: &'a str) -> Cow<'a, str> {
        Cow::Owned(self(singular))
    }
}

/// Appends a trailing `s`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuffixPlural;

impl NamingConvention for SuffixPlural {
    #[inline]
    fn plural<'a>(&self, singular: &'a str) -> Cow<'a, str> {
        Cow::Owned(format!("{singular}s"))
    }
}

/// Explicit singular to plural pairs, with a fallback convention for
/// everything else.
///
/// # Examples
///
/// ```
/// use vc_property::registry::{NamingConvention, PluralTable};
///
/// let naming = PluralTable::new()
///     .with("child", "children")
///     .with("entry", "entries");
///
/// assert_eq!(naming.plural("child"), "children");
/// assert_eq!(naming.plural("item"), "items");
/// ```
pub struct PluralTable<F = SuffixPlural> {
    pairs: HashMap<Box<str>, Box<str>>,
    fallback: F,
}

impl PluralTable {
    #[inline]
    pub fn new() -> Self {
        Self::with_fallback(SuffixPlural)
    }
}

impl Default for PluralTable {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<F: NamingConvention> PluralTable<F> {
    #[inline]
    pub fn with_fallback(fallback: F) -> Self {
        Self {
            pairs: new_map(),
            fallback,
        }
    }

    /// Adds a pair, replacing an existing one for the same singular.
    pub fn with(mut self, singular: &str, plural: &str) -> Self {
        self.insert(singular, plural);
        self
    }

    pub fn insert(&mut self, singular: &str, plural: &str) {
        self.pairs.insert(singular.into(), plural.into());
    }
}

impl<F: NamingConvention> NamingConvention for PluralTable<F> {
    fn plural<'a>(&self, singular: &'a str) -> Cow<'a, str> {
        match self.pairs.get(singular) {
            Some(plural) => Cow::Owned(String::from(&**plural)),
            None => self.fallback.plural(singular),
        }
    }
}

impl<F> fmt::Debug for PluralTable<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluralTable")
            .field("pairs", &self.pairs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_plural() {
        assert_eq!(SuffixPlural.plural("item"), "items");
    }

    #[test]
    fn closure_convention() {
        let naming = |s: &str| format!("{s}List");
        assert_eq!(naming.plural("item"), "itemList");
    }

    #[test]
    fn table_with_custom_fallback() {
        let naming = PluralTable::with_fallback(|s: &str| format!("all_{s}")).with("mouse", "mice");
        assert_eq!(naming.plural("mouse"), "mice");
        assert_eq!(naming.plural("cat"), "all_cat");
    }
}
