use alloc::boxed::Box;
use core::error::Error;
use core::fmt;

use thiserror::Error;

use crate::access::AccessorMode;
use crate::path::ParseError;

/// Errors raised by user accessors, carried as the source of
/// [`PropertyErrorKind::TargetInvocationFailure`].
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A specialized `Result` for property access.
pub type PropertyResult<T> = Result<T, PropertyError>;

// -----------------------------------------------------------------------------
// Error kind

/// The kind of [`PropertyError`], along with some kind-specific information.
///
/// Every kind except [`TargetInvocationFailure`](Self::TargetInvocationFailure)
/// is detected before user code runs. See [`PropertyError::is_resolution_failure`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PropertyErrorKind {
    #[error(transparent)]
    IllegalPathSyntax(#[from] ParseError),
    #[error("type `{type_name}` has no property `{property}`")]
    PropertyNotFound {
        type_name: &'static str,
        property: Box<str>,
    },
    #[error("property `{property}` of `{type_name}` does not support {mode} access")]
    AccessorNotApplicable {
        type_name: &'static str,
        property: Box<str>,
        mode: AccessorMode,
    },
    #[error("property `{property}` of `{type_name}` has more than one {mode} accessor")]
    AmbiguousAccessor {
        type_name: &'static str,
        property: Box<str>,
        mode: AccessorMode,
    },
    #[error("index {index} is out of range for `{property}` (len is {len})")]
    IndexOutOfRange {
        property: Box<str>,
        index: usize,
        len: usize,
    },
    #[error("cannot insert key `{key}` into `{property}`: it already holds {len} entries")]
    MapFull {
        property: Box<str>,
        key: Box<str>,
        len: usize,
    },
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("{mode} accessor of `{type_name}::{property}` failed: {source}")]
    TargetInvocationFailure {
        type_name: &'static str,
        property: Box<str>,
        mode: AccessorMode,
        source: BoxError,
    },
    #[error("no instance of `{type_name}` could be created")]
    InstantiationFailed { type_name: &'static str },
}

// -----------------------------------------------------------------------------
// Error

/// An error produced while resolving or invoking a property.
///
/// The optional `prefix` is the canonical form of the path segments that were
/// successfully resolved before the failure, and is empty when the failure
/// happened on the first segment.
///
/// # Examples
///
/// ```
/// use vc_property::{PropertyError, PropertyErrorKind};
///
/// let err = PropertyError::from(PropertyErrorKind::InstantiationFailed { type_name: "Foo" })
///     .with_prefix("a.b");
///
/// assert_eq!(err.prefix(), Some("a.b"));
/// assert!(err.is_resolution_failure());
/// assert_eq!(err.to_string(), "at `a.b`: no instance of `Foo` could be created");
/// ```
#[derive(Debug)]
pub struct PropertyError {
    kind: PropertyErrorKind,
    prefix: Option<Box<str>>,
}

impl PropertyError {
    /// Creates an error without path context.
    #[inline]
    pub const fn new(kind: PropertyErrorKind) -> Self {
        Self { kind, prefix: None }
    }

    /// Returns the kind of this error.
    #[inline]
    pub const fn kind(&self) -> &PropertyErrorKind {
        &self.kind
    }

    /// Consumes the error, returning its kind.
    #[inline]
    pub fn into_kind(self) -> PropertyErrorKind {
        self.kind
    }

    /// Returns the resolved path prefix at which the error occurred, if known.
    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Attaches the path prefix, keeping an already attached (deeper) one.
    pub fn with_prefix(mut self, prefix: impl Into<Box<str>>) -> Self {
        if self.prefix.is_none() {
            self.prefix = Some(prefix.into());
        }
        self
    }

    /// Returns `true` if the failure is a shape mismatch detected before any
    /// user accessor ran.
    #[inline]
    pub fn is_resolution_failure(&self) -> bool {
        !self.is_invocation_failure()
    }

    /// Returns `true` if a user accessor ran and raised an error.
    #[inline]
    pub fn is_invocation_failure(&self) -> bool {
        matches!(self.kind, PropertyErrorKind::TargetInvocationFailure { .. })
    }
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix.as_deref() {
            None => fmt::Display::fmt(&self.kind, f),
            Some("") => write!(f, "at path root: {}", self.kind),
            Some(prefix) => write!(f, "at `{prefix}`: {}", self.kind),
        }
    }
}

impl Error for PropertyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.kind.source()
    }
}

impl From<PropertyErrorKind> for PropertyError {
    #[inline]
    fn from(kind: PropertyErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<ParseError> for PropertyError {
    #[inline]
    fn from(err: ParseError) -> Self {
        Self::new(PropertyErrorKind::IllegalPathSyntax(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct Fire;

    #[test]
    fn invocation_failure_keeps_source() {
        let err = PropertyError::from(PropertyErrorKind::TargetInvocationFailure {
            type_name: "Server",
            property: "port".into(),
            mode: AccessorMode::Set,
            source: Box::new(Fire),
        });

        assert!(err.is_invocation_failure());
        assert!(!err.is_resolution_failure());
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "disk on fire");
    }

    #[test]
    fn innermost_prefix_wins() {
        let err = PropertyError::from(PropertyErrorKind::TypeMismatch {
            expected: "u16",
            found: "alloc::string::String",
        })
        .with_prefix("a.b")
        .with_prefix("a");

        assert_eq!(err.prefix(), Some("a.b"));
    }

    #[test]
    fn root_prefix_display() {
        let err = PropertyError::from(PropertyErrorKind::PropertyNotFound {
            type_name: "Server",
            property: "nope".into(),
        })
        .with_prefix("");

        assert_eq!(
            err.to_string(),
            "at path root: type `Server` has no property `nope`"
        );
    }
}
