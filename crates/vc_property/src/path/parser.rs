use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use super::{ParseError, ParseErrorReason, PathSegment, Suffix};

use ParseErrorReason::*;

/// Splits `path` into segments.
///
/// ```text
/// path    := segment ('.' segment)*
/// segment := ident suffix?
/// ident   := (alpha | '_') (alnum | '_' | '-')* | digits
/// suffix  := '[' digits ']' | '[' '\'' chars '\'' ']'
/// ```
pub(super) fn parse(path: &str) -> Result<Vec<PathSegment>, ParseError> {
    if path.is_empty() {
        return Err(ParseError::new(path, 0, 0, Empty));
    }

    let mut parser = Parser { path, pos: 0 };
    let mut segments = Vec::new();

    loop {
        segments.push(parser.segment()?);
        match parser.peek() {
            None => return Ok(segments),
            Some('.') => {
                parser.bump();
            }
            Some('[') => {
                return Err(parser.fail(parser.pos, parser.bracket_end(), ChainedSuffix));
            }
            Some(c) => {
                let end = parser.pos + c.len_utf8();
                return Err(parser.fail(parser.pos, end, TrailingCharacters));
            }
        }
    }
}

struct Parser<'a> {
    path: &'a str,
    pos: usize,
}

impl Parser<'_> {
    #[inline]
    fn peek(&self) -> Option<char> {
        self.path[self.pos..].chars().next()
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    #[inline]
    fn fail(&self, start: usize, end: usize, reason: ParseErrorReason) -> ParseError {
        ParseError::new(self.path, start, end, reason)
    }

    // End of the current bracket group, used to report a useful fragment.
    fn bracket_end(&self) -> usize {
        self.path[self.pos..]
            .find(']')
            .map_or(self.path.len(), |i| self.pos + i + 1)
    }

    fn segment(&mut self) -> Result<PathSegment, ParseError> {
        let start = self.pos;
        match self.peek() {
            None | Some('.') => return Err(self.fail(start, start + 1, EmptySegment)),
            // Tuple fields are named by position.
            Some(c) if c.is_ascii_digit() => {
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
                if let Some(c) = self.peek()
                    && is_name_char(c)
                {
                    return Err(self.fail(start, self.pos + c.len_utf8(), InvalidIdentifier));
                }
            }
            Some(c) if c.is_alphabetic() || c == '_' => {
                self.bump();
                while self.peek().is_some_and(is_name_char) {
                    self.bump();
                }
            }
            Some(c) => return Err(self.fail(start, start + c.len_utf8(), InvalidIdentifier)),
        }

        let name = &self.path[start..self.pos];
        let suffix = if self.peek() == Some('[') {
            self.suffix()?
        } else {
            Suffix::None
        };

        Ok(PathSegment::new(name, suffix))
    }

    fn suffix(&mut self) -> Result<Suffix, ParseError> {
        let open = self.pos;
        self.bump();

        let suffix = match self.peek() {
            Some('\'') => Suffix::Key(self.quoted(open)?),
            Some(c) if c.is_ascii_digit() => Suffix::Index(self.index(open)?),
            None => return Err(self.fail(open, self.pos, UnclosedBracket)),
            Some(_) => return Err(self.fail(open, self.bracket_end(), InvalidIndex)),
        };

        match self.peek() {
            Some(']') => {
                self.bump();
                Ok(suffix)
            }
            _ => Err(self.fail(open, self.bracket_end(), UnclosedBracket)),
        }
    }

    fn index(&mut self, open: usize) -> Result<usize, ParseError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }

        if self.peek().is_some_and(|c| c != ']') {
            return Err(self.fail(open, self.bracket_end(), InvalidIndex));
        }

        self.path[start..self.pos]
            .parse::<usize>()
            .map_err(|_| self.fail(open, self.bracket_end(), IndexOverflow))
    }

    fn quoted(&mut self, open: usize) -> Result<Box<str>, ParseError> {
        self.bump();
        let mut key = String::new();
        loop {
            match self.bump() {
                None => return Err(self.fail(open, self.pos, UnterminatedKey)),
                Some('\'') => return Ok(key.into_boxed_str()),
                Some('\\') => match self.peek() {
                    Some(c @ ('\'' | '\\')) => {
                        self.bump();
                        key.push(c);
                    }
                    _ => key.push('\\'),
                },
                Some(c) => key.push(c),
            }
        }
    }
}

#[inline]
fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(path: &str) -> ParseErrorReason {
        parse(path).expect_err(path).reason()
    }

    #[test]
    fn plain_and_suffixed_segments() {
        let segments = parse("intermediate.intermediates[2].props['k.x'].value").unwrap();
        let expected = [
            PathSegment::named("intermediate"),
            PathSegment::new("intermediates", Suffix::Index(2)),
            PathSegment::new("props", Suffix::Key("k.x".into())),
            PathSegment::named("value"),
        ];
        assert_eq!(segments, expected);
    }

    #[test]
    fn identifiers_allow_dash_and_underscore() {
        let segments = parse("_a.not-existent.b2").unwrap();
        assert_eq!(segments[1].name(), "not-existent");
        assert_eq!(segments[2].name(), "b2");
    }

    #[test]
    fn positional_names() {
        let segments = parse("pair.0.1[2]").unwrap();
        assert_eq!(segments[1].name(), "0");
        assert_eq!(segments[2], PathSegment::new("1", Suffix::Index(2)));

        assert_eq!(reason("0x"), InvalidIdentifier);
        assert_eq!(reason("a.12-b"), InvalidIdentifier);
    }

    #[test]
    fn quoted_key_escapes() {
        let segments = parse(r"m['it\'s \\ here']").unwrap();
        assert_eq!(segments[0].key(), Some(r"it's \ here"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(reason(""), Empty);
        assert_eq!(reason("a..b"), EmptySegment);
        assert_eq!(reason("a."), EmptySegment);
        assert_eq!(reason(".a"), EmptySegment);
        assert_eq!(reason("1a"), InvalidIdentifier);
        assert_eq!(reason("a[-1]"), InvalidIndex);
        assert_eq!(reason("a[x]"), InvalidIndex);
        assert_eq!(reason("a[]"), InvalidIndex);
        assert_eq!(reason("a[1x]"), InvalidIndex);
        assert_eq!(reason("a[99999999999999999999999]"), IndexOverflow);
        assert_eq!(reason("a['x"), UnterminatedKey);
        assert_eq!(reason("a[1"), UnclosedBracket);
        assert_eq!(reason("a['x'y]"), UnclosedBracket);
        assert_eq!(reason("a[0][1]"), ChainedSuffix);
        assert_eq!(reason("a b"), TrailingCharacters);
    }

    #[test]
    fn error_reports_offset_and_fragment() {
        let err = parse("items[-1].x").unwrap_err();
        assert_eq!(err.offset(), 5);
        assert_eq!(err.fragment(), "[-1]");
        assert_eq!(err.path(), "items[-1].x");
    }
}
