//! Trace path string parser.

use super::chain::Path;
use super::error::{PathError, SyntaxErrorKind};
use super::token::{is_identifier_char, PathToken};

/// Parser for trace path strings.
///
/// Absolute paths start with `$`; text starting with `.` or `[` is read as
/// a relative path, which is what [`Path::next`] produces when serialized.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given path string.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Parses `input` into a Path.
    pub fn parse(input: &str) -> Result<Path, PathError> {
        Parser::new(input).parse_path()
    }

    fn parse_path(&mut self) -> Result<Path, PathError> {
        if self.input.trim().is_empty() {
            return Err(PathError::syntax(0, SyntaxErrorKind::EmptyPath));
        }

        self.skip_whitespace();
        let mut tokens = Vec::new();

        match self.peek() {
            Some('$') => {
                self.next();
                tokens.push(PathToken::Root);
            }
            Some('.') | Some('[') => {}
            _ => return Err(PathError::syntax(self.position, SyntaxErrorKind::MalformedRoot)),
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('.') => tokens.push(self.parse_dot_segment()?),
                Some('[') => tokens.push(self.parse_bracket_expression()?),
                Some(ch) => {
                    return Err(PathError::syntax(
                        self.position,
                        SyntaxErrorKind::UnexpectedCharacter {
                            found: ch,
                            expected: "'.' or '['".to_string(),
                        },
                    ))
                }
            }
        }

        Path::from_tokens(tokens)
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    fn unexpected(&self, expected: &str) -> PathError {
        match self.peek() {
            Some(found) => PathError::syntax(
                self.position,
                SyntaxErrorKind::UnexpectedCharacter {
                    found,
                    expected: expected.to_string(),
                },
            ),
            None => PathError::syntax(
                self.position,
                SyntaxErrorKind::UnexpectedEnd {
                    expected: expected.to_string(),
                },
            ),
        }
    }

    /// Reports a token constructor failure at the start of its segment.
    fn token_at(start: usize, token: Result<PathToken, PathError>) -> Result<PathToken, PathError> {
        token.map_err(|err| match err {
            PathError::InvalidToken { message } => {
                PathError::syntax(start, SyntaxErrorKind::InvalidToken(message))
            }
            other => other,
        })
    }

    /// Reads a run of identifier characters.
    fn read_word(&mut self) -> &'a str {
        let input = self.input;
        let start = self.position;
        while let Some(ch) = self.peek() {
            if is_identifier_char(ch) {
                self.next();
            } else {
                break;
            }
        }
        &input[start..self.position]
    }

    /// Parses `.name` or `.*`
    fn parse_dot_segment(&mut self) -> Result<PathToken, PathError> {
        self.next();
        self.skip_whitespace();
        match self.peek() {
            Some('.') => Err(PathError::syntax(
                self.position,
                SyntaxErrorKind::RecursiveDescent,
            )),
            Some('*') => {
                self.next();
                Ok(PathToken::wildcard())
            }
            Some(ch) if is_identifier_char(ch) && !ch.is_ascii_digit() => {
                let start = self.position;
                let name = self.read_word();
                Self::token_at(start, PathToken::property(name))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Consumes the closing `]` of the bracket opened at `start`.
    fn expect_close(&mut self, start: usize) -> Result<(), PathError> {
        self.skip_whitespace();
        match self.peek() {
            Some(']') => {
                self.next();
                Ok(())
            }
            Some(_) => Err(self.unexpected("']'")),
            None => Err(PathError::syntax(start, SyntaxErrorKind::UnterminatedBracket)),
        }
    }

    /// Parses a bracket expression: `[3]`, `[1,2]`, `[2:]`, `[:5]`, `[2:5]`,
    /// `[@.size()-1]`, `["name"]`, `['a','b']`, `[*]`, `[ALL]`
    fn parse_bracket_expression(&mut self) -> Result<PathToken, PathError> {
        let start = self.position;
        self.next();
        self.skip_whitespace();

        let token = match self.peek() {
            None => return Err(PathError::syntax(start, SyntaxErrorKind::UnterminatedBracket)),
            Some('*') => {
                self.next();
                PathToken::wildcard()
            }
            Some('\'') | Some('"') => {
                let names = self.parse_quoted_names(start)?;
                Self::token_at(start, PathToken::properties(names))?
            }
            Some('@') => self.parse_context_size(start)?,
            Some(':') => {
                self.next();
                self.skip_whitespace();
                let to = self.parse_number(start)?;
                Self::token_at(start, PathToken::slice_to(to))?
            }
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.parse_index_body(start)?,
            Some(ch) if ch.is_alphabetic() => {
                let word_start = self.position;
                let word = self.read_word();
                if word == "ALL" {
                    PathToken::all()
                } else {
                    return Err(PathError::syntax(
                        word_start,
                        SyntaxErrorKind::NonNumericIndex(word.to_string()),
                    ));
                }
            }
            Some(_) => return Err(self.unexpected("index, quoted name or wildcard")),
        };

        self.expect_close(start)?;
        Ok(token)
    }

    /// Parses what follows a leading number: `]`, `,` or `:`.
    fn parse_index_body(&mut self, start: usize) -> Result<PathToken, PathError> {
        let first = self.parse_number(start)?;
        self.skip_whitespace();

        match self.peek() {
            Some(',') => {
                let mut indices = vec![first];
                while self.peek() == Some(',') {
                    self.next();
                    self.skip_whitespace();
                    indices.push(self.parse_number(start)?);
                    self.skip_whitespace();
                }
                Self::token_at(start, PathToken::index_sequence(indices))
            }
            Some(':') => {
                self.next();
                self.skip_whitespace();
                if self.peek() == Some(']') {
                    Self::token_at(start, PathToken::slice_from(first))
                } else {
                    let to = self.parse_number(start)?;
                    Self::token_at(start, PathToken::slice_between(first, to))
                }
            }
            _ => Self::token_at(start, PathToken::index(first)),
        }
    }

    /// Parses `@.size()` followed by a signed offset.
    fn parse_context_size(&mut self, start: usize) -> Result<PathToken, PathError> {
        const CONTEXT_SIZE: &str = "@.size()";
        if !self.input[self.position..].starts_with(CONTEXT_SIZE) {
            return Err(self.unexpected("'@.size()'"));
        }
        self.position += CONTEXT_SIZE.len();

        // The '-' stays in the number so i64::MIN parses.
        match self.peek() {
            Some('+') => {
                self.next();
            }
            Some('-') => {}
            _ => return Err(self.unexpected("'+' or '-'")),
        }

        let offset = self.parse_number(start)?;
        Self::token_at(start, PathToken::context_size(offset))
    }

    /// Parses an integer, with an optional leading `-`.
    fn parse_number(&mut self, bracket_start: usize) -> Result<i64, PathError> {
        let start = self.position;
        if self.peek() == Some('-') {
            self.next();
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.next();
            } else {
                break;
            }
        }

        let digits_end = self.position;
        match self.peek() {
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                self.read_word();
                return Err(PathError::syntax(
                    start,
                    SyntaxErrorKind::NonNumericIndex(self.input[start..self.position].to_string()),
                ));
            }
            None if digits_end == start => {
                return Err(PathError::syntax(
                    bracket_start,
                    SyntaxErrorKind::UnterminatedBracket,
                ))
            }
            _ => {}
        }

        let text = &self.input[start..digits_end];
        if text.is_empty() || text == "-" {
            self.position = start;
            return Err(self.unexpected("number"));
        }
        text.parse::<i64>().map_err(|_| {
            PathError::syntax(start, SyntaxErrorKind::IndexOutOfRange(text.to_string()))
        })
    }

    /// Parses quoted names inside brackets: `["key"]` or `['key1','key2']`
    fn parse_quoted_names(&mut self, bracket_start: usize) -> Result<Vec<String>, PathError> {
        let mut names = Vec::new();
        loop {
            self.skip_whitespace();
            let quote_start = self.position;
            let quote = match self.peek() {
                Some(q @ ('\'' | '"')) => {
                    self.next();
                    q
                }
                _ => return Err(self.unexpected("quoted name")),
            };

            let mut value = String::new();
            loop {
                match self.next() {
                    Some(ch) if ch == quote => break,
                    Some('\\') => match self.next() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('\\') => value.push('\\'),
                        Some('\'') => value.push('\''),
                        Some('"') => value.push('"'),
                        Some(other) => {
                            return Err(PathError::syntax(
                                self.position - other.len_utf8() - 1,
                                SyntaxErrorKind::InvalidEscape(other),
                            ))
                        }
                        None => {
                            return Err(PathError::syntax(
                                quote_start,
                                SyntaxErrorKind::UnterminatedString,
                            ))
                        }
                    },
                    Some(ch) => value.push(ch),
                    None => {
                        return Err(PathError::syntax(
                            quote_start,
                            SyntaxErrorKind::UnterminatedString,
                        ))
                    }
                }
            }
            names.push(value);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.next();
                }
                None => {
                    return Err(PathError::syntax(
                        bracket_start,
                        SyntaxErrorKind::UnterminatedBracket,
                    ))
                }
                _ => break,
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::token::IndexOperation;

    fn syntax_kind(input: &str) -> (usize, SyntaxErrorKind) {
        match Parser::parse(input) {
            Err(PathError::Syntax { offset, kind }) => (offset, kind),
            other => panic!("expected syntax error for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn test_parse_root() {
        let path = Parser::parse("$").unwrap();
        assert_eq!(path.token_count(), 1);
        assert_eq!(path.token(), &PathToken::Root);
    }

    #[test]
    fn test_parse_child() {
        let path = Parser::parse("$.store").unwrap();
        assert_eq!(path.token_count(), 2);
        assert_eq!(path.tokens()[1], PathToken::property("store").unwrap());
    }

    #[test]
    fn test_parse_nested_child() {
        let path = Parser::parse("$.store.book").unwrap();
        assert_eq!(path.token_count(), 3);
        assert_eq!(path.tokens()[2], PathToken::property("book").unwrap());
    }

    #[test]
    fn test_parse_array_index() {
        let path = Parser::parse("$[7]").unwrap();
        assert_eq!(path.tokens()[1], PathToken::index(7).unwrap());
        assert!(path.is_path_definite());
    }

    #[test]
    fn test_parse_slice_between() {
        let path = Parser::parse("$[2:5]").unwrap();
        assert_eq!(path.token_count(), 2);
        match &path.tokens()[1] {
            PathToken::Index(index) => {
                assert_eq!(index.operation(), IndexOperation::SliceBetween);
                assert_eq!(index.operands(), &[2, 5]);
            }
            other => panic!("expected an index token, got {:?}", other),
        }
        assert!(!path.is_path_definite());
    }

    #[test]
    fn test_parse_slice_start_only() {
        let path = Parser::parse("$.items[2:]").unwrap();
        assert_eq!(path.tokens()[2], PathToken::slice_from(2).unwrap());
    }

    #[test]
    fn test_parse_slice_end_only() {
        let path = Parser::parse("$.items[:5]").unwrap();
        assert_eq!(path.tokens()[2], PathToken::slice_to(5).unwrap());
    }

    #[test]
    fn test_parse_index_sequence() {
        let path = Parser::parse("$[1,3,5]").unwrap();
        assert_eq!(
            path.tokens()[1],
            PathToken::index_sequence(vec![1, 3, 5]).unwrap()
        );
    }

    #[test]
    fn test_parse_context_size() {
        let path = Parser::parse("$.items[@.size()-1]").unwrap();
        assert_eq!(path.tokens()[2], PathToken::context_size(-1).unwrap());
        assert!(path.is_path_definite());
    }

    #[test]
    fn test_parse_wildcards() {
        let star = Parser::parse("$.items[*]").unwrap();
        assert_eq!(star.tokens()[2], PathToken::wildcard());
        let all = Parser::parse("$[ALL][ALL]").unwrap();
        assert_eq!(all.tokens()[1], PathToken::all());
        let dotted = Parser::parse("$.items.*").unwrap();
        assert_eq!(dotted.tokens()[2], PathToken::wildcard());
    }

    #[test]
    fn test_parse_multi_property() {
        let path = Parser::parse("$.store['book','music']").unwrap();
        assert_eq!(
            path.tokens()[2],
            PathToken::properties(["book", "music"]).unwrap()
        );
    }

    #[test]
    fn test_parse_bracket_notation() {
        let path = Parser::parse("$['store'][\"my book\"]").unwrap();
        assert_eq!(path.tokens()[1], PathToken::property("store").unwrap());
        assert_eq!(path.tokens()[2], PathToken::property("my book").unwrap());
    }

    #[test]
    fn test_parse_escapes() {
        let path = Parser::parse(r#"$["a\"b\\c"]"#).unwrap();
        assert_eq!(path.tokens()[1], PathToken::property("a\"b\\c").unwrap());
    }

    #[test]
    fn test_bare_integer_is_always_an_index() {
        let index = Parser::parse("$[3]").unwrap();
        let property = Parser::parse("$[\"3\"]").unwrap();
        assert_eq!(index.tokens()[1], PathToken::index(3).unwrap());
        assert_eq!(property.tokens()[1], PathToken::property("3").unwrap());
        assert_ne!(index, property);
    }

    #[test]
    fn test_parse_relative() {
        let path = Parser::parse(".dataset[*].uri").unwrap();
        assert!(!path.is_absolute());
        assert_eq!(path.token_count(), 3);
    }

    #[test]
    fn test_parse_whitespace_handling() {
        let path = Parser::parse("$ . store [ 0 ]").unwrap();
        assert_eq!(path.token_count(), 3);
        assert_eq!(path.tokens()[1], PathToken::property("store").unwrap());
        assert_eq!(path.tokens()[2], PathToken::index(0).unwrap());
    }

    #[test]
    fn test_parse_empty_fails() {
        assert_eq!(syntax_kind(""), (0, SyntaxErrorKind::EmptyPath));
        assert_eq!(syntax_kind("   "), (0, SyntaxErrorKind::EmptyPath));
    }

    #[test]
    fn test_parse_missing_root_fails() {
        assert_eq!(syntax_kind("store.book"), (0, SyntaxErrorKind::MalformedRoot));
    }

    #[test]
    fn test_parse_unterminated_bracket() {
        assert_eq!(syntax_kind("$.a[3"), (3, SyntaxErrorKind::UnterminatedBracket));
        assert_eq!(syntax_kind("$["), (1, SyntaxErrorKind::UnterminatedBracket));
        assert_eq!(
            syntax_kind("$['a'"),
            (1, SyntaxErrorKind::UnterminatedBracket)
        );
    }

    #[test]
    fn test_parse_unterminated_string() {
        assert_eq!(syntax_kind("$['abc"), (2, SyntaxErrorKind::UnterminatedString));
    }

    #[test]
    fn test_parse_non_numeric_index() {
        assert_eq!(
            syntax_kind("$[abc]"),
            (2, SyntaxErrorKind::NonNumericIndex("abc".to_string()))
        );
        assert_eq!(
            syntax_kind("$[1a]"),
            (2, SyntaxErrorKind::NonNumericIndex("1a".to_string()))
        );
    }

    #[test]
    fn test_parse_negative_index_fails() {
        let (offset, kind) = syntax_kind("$.items[-1]");
        assert_eq!(offset, 7);
        assert!(matches!(kind, SyntaxErrorKind::InvalidToken(_)));
    }

    #[test]
    fn test_parse_reversed_slice_fails() {
        let (_, kind) = syntax_kind("$[5:2]");
        assert!(matches!(kind, SyntaxErrorKind::InvalidToken(_)));
    }

    #[test]
    fn test_parse_recursive_descent_fails() {
        assert_eq!(syntax_kind("$..price"), (2, SyntaxErrorKind::RecursiveDescent));
    }

    #[test]
    fn test_parse_trailing_garbage_fails() {
        let (offset, kind) = syntax_kind("$x");
        assert_eq!(offset, 1);
        assert!(matches!(kind, SyntaxErrorKind::UnexpectedCharacter { found: 'x', .. }));
    }

    #[test]
    fn test_parse_identifier_starting_with_digit_fails() {
        let (offset, _) = syntax_kind("$.4x");
        assert_eq!(offset, 2);
    }

    #[test]
    fn test_parse_context_size_extremes() {
        for offset in [i64::MIN, i64::MAX, 0] {
            let path = Path::root()
                .append(PathToken::context_size(offset).unwrap())
                .unwrap();
            assert_eq!(Parser::parse(&path.to_text()).unwrap(), path);
        }
        let (_, kind) = syntax_kind("$[@.size()-9223372036854775809]");
        assert!(matches!(kind, SyntaxErrorKind::IndexOutOfRange(_)));
        let (_, kind) = syntax_kind("$[@.size()--1]");
        assert!(matches!(kind, SyntaxErrorKind::UnexpectedCharacter { .. }));
    }

    #[test]
    fn test_parse_whitespace_after_dot() {
        assert_eq!(
            Parser::parse("$. dataset .*").unwrap(),
            Parser::parse("$.dataset[*]").unwrap()
        );
        assert_eq!(syntax_kind("$. .a"), (3, SyntaxErrorKind::RecursiveDescent));
    }

    #[test]
    fn test_parse_index_overflow() {
        let (_, kind) = syntax_kind("$[99999999999999999999]");
        assert!(matches!(kind, SyntaxErrorKind::IndexOutOfRange(_)));
    }
}
