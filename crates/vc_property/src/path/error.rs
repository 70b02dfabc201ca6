use alloc::boxed::Box;

use thiserror::Error;

/// The reason a path string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseErrorReason {
    #[error("path is empty")]
    Empty,
    #[error("empty segment")]
    EmptySegment,
    #[error("expected an identifier")]
    InvalidIdentifier,
    #[error("index must be a non-negative integer")]
    InvalidIndex,
    #[error("index does not fit in usize")]
    IndexOverflow,
    #[error("unterminated quoted key")]
    UnterminatedKey,
    #[error("expected `]`")]
    UnclosedBracket,
    #[error("a segment may carry at most one suffix")]
    ChainedSuffix,
    #[error("unexpected trailing characters")]
    TrailingCharacters,
}

/// An error returned from a failed path string parse.
///
/// Carries the whole input, the byte offset of the failure and the
/// offending fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal property path `{path}` at offset {offset} (`{fragment}`): {reason}")]
pub struct ParseError {
    path: Box<str>,
    offset: usize,
    fragment: Box<str>,
    reason: ParseErrorReason,
}

impl ParseError {
    #[inline]
    pub(crate) fn new(path: &str, offset: usize, end: usize, reason: ParseErrorReason) -> Self {
        let end = end.clamp(offset, path.len());
        Self {
            path: path.into(),
            offset,
            fragment: path.get(offset..end).unwrap_or_default().into(),
            reason,
        }
    }

    /// The rejected path string.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Byte offset of the failure within [`path`](Self::path).
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The offending fragment of the input.
    #[inline]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Why the input was rejected.
    #[inline]
    pub fn reason(&self) -> ParseErrorReason {
        self.reason
    }
}
