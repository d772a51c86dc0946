//! Error types for path construction, parsing and schema checks.

use std::fmt;

use super::chain::Path;

/// Errors produced by the path subsystem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A token was constructed from invalid parts (empty names, bad slice bounds).
    #[error("Invalid path token: {message}")]
    InvalidToken { message: String },

    /// Text did not match the path grammar.
    #[error("Invalid path syntax at position {offset}: {kind}")]
    Syntax { offset: usize, kind: SyntaxErrorKind },

    /// `next()` was called on a leaf path.
    #[error("{message}")]
    NotFound { message: String },

    /// A schema-guided build or check referenced a field the schema doesn't have.
    #[error("Couldn't find property '{name}' after {path}")]
    UnknownProperty { name: String, path: Path },

    /// A helper received an argument outside its domain.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A path token can't be applied to the schema node it reached.
    #[error("Path {path} doesn't match schema: {reason}")]
    SchemaMismatch { path: Path, reason: String },
}

impl PathError {
    pub(crate) fn invalid_token(message: impl Into<String>) -> Self {
        PathError::InvalidToken {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        PathError::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn syntax(offset: usize, kind: SyntaxErrorKind) -> Self {
        PathError::Syntax { offset, kind }
    }
}

/// The reason a path string was rejected by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// The input was empty.
    EmptyPath,
    /// The input starts with something other than `$`, `.` or `[`.
    MalformedRoot,
    /// A `[` was never closed.
    UnterminatedBracket,
    /// A quoted name was never closed.
    UnterminatedString,
    /// A bracket holds a bare word that isn't a number or `ALL`.
    NonNumericIndex(String),
    /// Unknown `\x` escape inside a quoted name.
    InvalidEscape(char),
    /// A character that can't start or continue a segment.
    UnexpectedCharacter { found: char, expected: String },
    /// Input ended where more was required.
    UnexpectedEnd { expected: String },
    /// `..` is not part of the address grammar.
    RecursiveDescent,
    /// An index doesn't fit in 64 bits.
    IndexOutOfRange(String),
    /// The segment was well-formed but its token is invalid.
    InvalidToken(String),
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::EmptyPath => write!(f, "empty path"),
            SyntaxErrorKind::MalformedRoot => {
                write!(f, "path must start with '$' (or '.'/'[' when relative)")
            }
            SyntaxErrorKind::UnterminatedBracket => write!(f, "unterminated bracket"),
            SyntaxErrorKind::UnterminatedString => write!(f, "unterminated quoted name"),
            SyntaxErrorKind::NonNumericIndex(found) => {
                write!(f, "non-numeric index '{}'", found)
            }
            SyntaxErrorKind::InvalidEscape(ch) => write!(f, "invalid escape sequence '\\{}'", ch),
            SyntaxErrorKind::UnexpectedCharacter { found, expected } => {
                write!(f, "unexpected character '{}', expected {}", found, expected)
            }
            SyntaxErrorKind::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of input, expected {}", expected)
            }
            SyntaxErrorKind::RecursiveDescent => write!(f, "recursive descent is not supported"),
            SyntaxErrorKind::IndexOutOfRange(found) => write!(f, "index '{}' is out of range", found),
            SyntaxErrorKind::InvalidToken(message) => write!(f, "{}", message),
        }
    }
}
