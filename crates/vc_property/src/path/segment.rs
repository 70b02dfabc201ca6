use alloc::boxed::Box;
use core::fmt;

/// The optional selector trailing a segment name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Suffix {
    /// Plain property access, e.g. `name`.
    None,
    /// Indexed access into a list-like property, e.g. `items[3]`.
    Index(usize),
    /// Keyed access into a map-like property, e.g. `props['a.b']`.
    Key(Box<str>),
}

/// One dot-separated step of a [`PropertyPath`](super::PropertyPath).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    name: Box<str>,
    suffix: Suffix,
}

impl PathSegment {
    /// Creates a segment without validating `name`.
    ///
    /// Use [`PropertyPath::parse`](super::PropertyPath::parse) to build
    /// segments from text.
    #[inline]
    pub fn new(name: impl Into<Box<str>>, suffix: Suffix) -> Self {
        Self {
            name: name.into(),
            suffix,
        }
    }

    /// Shorthand for a segment with [`Suffix::None`].
    #[inline]
    pub fn named(name: impl Into<Box<str>>) -> Self {
        Self::new(name, Suffix::None)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn suffix(&self) -> &Suffix {
        &self.suffix
    }

    /// Returns the index if this is an indexed segment.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        match self.suffix {
            Suffix::Index(index) => Some(index),
            _ => None,
        }
    }

    /// Returns the key if this is a keyed segment.
    #[inline]
    pub fn key(&self) -> Option<&str> {
        match &self.suffix {
            Suffix::Key(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match &self.suffix {
            Suffix::None => Ok(()),
            Suffix::Index(index) => write!(f, "[{index}]"),
            Suffix::Key(key) => {
                f.write_str("['")?;
                for c in key.chars() {
                    if matches!(c, '\'' | '\\') {
                        f.write_str("\\")?;
                    }
                    fmt::Write::write_char(f, c)?;
                }
                f.write_str("']")
            }
        }
    }
}
