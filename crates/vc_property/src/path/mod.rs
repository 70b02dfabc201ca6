//! Property path syntax.
//!
//! A path is a non-empty, dot-separated sequence of segments. Each segment is
//! a property name, optionally followed by a single suffix:
//!
//! - `name`: plain property access.
//! - `name[3]`: indexed access into a list-like property.
//! - `name['key']`: keyed access into a map-like property. Inside the quotes
//!   `\'` and `\\` escape a quote and a backslash.
//!
//! Chained suffixes (`a[0][1]`) are rejected.
//!
//! # Examples
//!
//! ```
//! use vc_property::path::{PropertyPath, Suffix};
//!
//! let path: PropertyPath = "nodes[2].attrs['a.b'].value".parse().unwrap();
//!
//! assert_eq!(path.len(), 4);
//! assert_eq!(path.segments()[1].suffix(), &Suffix::Key("a.b".into()));
//! assert_eq!(path.prefix(2), "nodes[2].attrs['a.b']");
//! assert_eq!(path.to_string(), "nodes[2].attrs['a.b'].value");
//! ```

// -----------------------------------------------------------------------------
// Modules

mod error;
mod parser;
mod segment;

#[cfg(feature = "serde")]
mod serialize;

// -----------------------------------------------------------------------------
// Exports

pub use error::{ParseError, ParseErrorReason};
pub use segment::{PathSegment, Suffix};

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

// -----------------------------------------------------------------------------
// PropertyPath

/// A parsed, reusable property path.
///
/// Parsing the same string twice yields equal paths, and the `Display` form
/// of a path parses back to an equal path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath(Box<[PathSegment]>);

impl PropertyPath {
    /// Parses a path string.
    #[inline]
    pub fn parse(path: &str) -> Result<Self, ParseError> {
        parser::parse(path).map(|segments| Self(segments.into_boxed_slice()))
    }

    /// Builds a path from already constructed segments.
    ///
    /// Returns `None` if `segments` is empty.
    pub fn from_segments(segments: impl IntoIterator<Item = PathSegment>) -> Option<Self> {
        let segments: Vec<PathSegment> = segments.into_iter().collect();
        if segments.is_empty() {
            None
        } else {
            Some(Self(segments.into_boxed_slice()))
        }
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of segments, always at least one.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The terminal segment.
    #[inline]
    pub fn last(&self) -> &PathSegment {
        self.split_last().0
    }

    /// Splits off the terminal segment.
    #[inline]
    pub fn split_last(&self) -> (&PathSegment, &[PathSegment]) {
        match self.0.split_last() {
            Some(split) => split,
            None => unreachable!("property paths are never empty"),
        }
    }

    /// The canonical form of the first `n` segments.
    ///
    /// Used as the location context of navigation errors.
    pub fn prefix(&self, n: usize) -> String {
        let mut out = String::new();
        for (i, segment) in self.0.iter().take(n).enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            fmt::Display::fmt(segment, f)?;
        }
        Ok(())
    }
}

impl FromStr for PropertyPath {
    type Err = ParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for PropertyPath {
    type Error = ParseError;

    #[inline]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

// -----------------------------------------------------------------------------
// AsPropertyPath

/// Anything the navigator accepts as a path.
///
/// Implemented for [`str`], [`String`] and [`PropertyPath`]. Strings are parsed
/// on every call, so hold on to a [`PropertyPath`] for repeated queries.
pub trait AsPropertyPath {
    fn as_property_path(&self) -> Result<Cow<'_, PropertyPath>, ParseError>;
}

impl AsPropertyPath for str {
    #[inline]
    fn as_property_path(&self) -> Result<Cow<'_, PropertyPath>, ParseError> {
        PropertyPath::parse(self).map(Cow::Owned)
    }
}

impl AsPropertyPath for String {
    #[inline]
    fn as_property_path(&self) -> Result<Cow<'_, PropertyPath>, ParseError> {
        self.as_str().as_property_path()
    }
}

impl AsPropertyPath for PropertyPath {
    #[inline]
    fn as_property_path(&self) -> Result<Cow<'_, PropertyPath>, ParseError> {
        Ok(Cow::Borrowed(self))
    }
}

impl<T: AsPropertyPath + ?Sized> AsPropertyPath for &T {
    #[inline]
    fn as_property_path(&self) -> Result<Cow<'_, PropertyPath>, ParseError> {
        T::as_property_path(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips() {
        for text in [
            "a",
            "a.b.c",
            "items[0]",
            "props['x']",
            r"props['it\'s']",
            r"m['back\\slash'].n[12].o",
        ] {
            let path = PropertyPath::parse(text).unwrap();
            assert_eq!(path.to_string(), text);
            assert_eq!(PropertyPath::parse(&path.to_string()).unwrap(), path);
        }
    }

    #[test]
    fn parse_is_deterministic() {
        let a = PropertyPath::parse("x.y[1].z['k']").unwrap();
        let b: PropertyPath = "x.y[1].z['k']".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn prefix_and_split() {
        let path = PropertyPath::parse("a.b[1].c").unwrap();
        assert_eq!(path.prefix(0), "");
        assert_eq!(path.prefix(2), "a.b[1]");
        assert_eq!(path.prefix(9), "a.b[1].c");

        let (last, parents) = path.split_last();
        assert_eq!(last.name(), "c");
        assert_eq!(parents.len(), 2);
    }

    #[test]
    fn from_segments_requires_one() {
        assert!(PropertyPath::from_segments([]).is_none());
        let path = PropertyPath::from_segments([PathSegment::new("a", Suffix::Index(4))]).unwrap();
        assert_eq!(path.to_string(), "a[4]");
    }

    #[test]
    fn as_property_path_borrows_parsed() {
        let path = PropertyPath::parse("a.b").unwrap();
        assert!(matches!(path.as_property_path(), Ok(Cow::Borrowed(_))));
        assert!(matches!("a.b".as_property_path(), Ok(Cow::Owned(_))));
        assert!("a..b".as_property_path().is_err());
    }
}
