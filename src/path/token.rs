//! Path tokens: the individual steps of a trace path.

use std::fmt;

use super::error::PathError;

/// Returns true if `name` can be used as an identifier.
///
/// A name is identifier-safe when it is non-empty, contains no space and
/// doesn't start with a digit.
pub fn is_identifier_safe(name: &str) -> bool {
    match name.chars().next() {
        Some(first) => !name.contains(' ') && !first.is_ascii_digit(),
        None => false,
    }
}

/// Checks `name` is identifier-safe, failing with `InvalidArgument` otherwise.
pub fn check_identifier(name: &str) -> Result<(), PathError> {
    if is_identifier_safe(name) {
        Ok(())
    } else {
        Err(PathError::invalid_argument(format!(
            "Invalid identifier! Found '{}'",
            name
        )))
    }
}

/// Characters the parser reads as part of a dotted identifier.
pub(crate) fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-'
}

/// Dotted `.name` rendering is used only when the parser reads the name back unchanged.
fn renders_dotted(name: &str) -> bool {
    is_identifier_safe(name) && name.chars().all(is_identifier_char)
}

/// Parses a canonical array index label: `0`, or digits without a leading zero.
fn array_index_label(label: &str) -> Option<i64> {
    let canonical = !label.is_empty()
        && label.chars().all(|c| c.is_ascii_digit())
        && (label == "0" || !label.starts_with('0'));
    if canonical {
        label.parse().ok()
    } else {
        None
    }
}

/// Index operations supported inside brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexOperation {
    /// `[i]`
    SingleIndex,
    /// `[i,j,...]`
    IndexSequence,
    /// `[from:]`
    SliceFrom,
    /// `[:to]`
    SliceTo,
    /// `[from:to]`
    SliceBetween,
    /// `[@.size()+k]`, relative to the size of the array
    ContextSize,
}

/// How a wildcard token is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WildcardStyle {
    /// `[*]`
    #[default]
    Star,
    /// `[ALL]`
    All,
}

/// One or more property names selected at a single step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyToken {
    names: Vec<String>,
}

impl PropertyToken {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn fragment(&self) -> String {
        match self.names.as_slice() {
            [name] if renders_dotted(name) => format!(".{}", name),
            names => {
                let quoted: Vec<String> = names.iter().map(|n| quote_name(n)).collect();
                format!("[{}]", quoted.join(","))
            }
        }
    }
}

/// An index or slice operation together with its operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexToken {
    operation: IndexOperation,
    operands: Vec<i64>,
}

impl IndexToken {
    pub fn operation(&self) -> IndexOperation {
        self.operation
    }

    pub fn operands(&self) -> &[i64] {
        &self.operands
    }

    fn fragment(&self) -> String {
        let ops = &self.operands;
        match self.operation {
            IndexOperation::SingleIndex | IndexOperation::IndexSequence => {
                let joined: Vec<String> = ops.iter().map(|i| i.to_string()).collect();
                format!("[{}]", joined.join(","))
            }
            IndexOperation::SliceFrom => format!("[{}:]", ops[0]),
            IndexOperation::SliceTo => format!("[:{}]", ops[0]),
            IndexOperation::SliceBetween => format!("[{}:{}]", ops[0], ops[1]),
            IndexOperation::ContextSize => format!("[@.size(){:+}]", ops[0]),
        }
    }
}

/// A single step in a path.
///
/// Payloads of `Property` and `Index` can only be built through the
/// validating constructors on `PathToken`, so every token in circulation
/// satisfies its operand invariants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathToken {
    /// Document root (`$`)
    Root,
    /// Named property (`.name`, `["my name"]`, `["a","b"]`)
    Property(PropertyToken),
    /// Index or slice (`[3]`, `[1,2]`, `[2:5]`, `[@.size()-1]`)
    Index(IndexToken),
    /// All elements (`[*]` or `[ALL]`)
    Wildcard(WildcardStyle),
}

impl PathToken {
    /// A single-name property token.
    pub fn property(name: impl Into<String>) -> Result<Self, PathError> {
        Self::properties(vec![name.into()])
    }

    /// A property token selecting each of `names`, in order.
    pub fn properties<I, S>(names: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(PathError::invalid_token(
                "property token needs at least one name",
            ));
        }
        if names.iter().any(|n| n.is_empty()) {
            return Err(PathError::invalid_token("property names must be non-empty"));
        }
        Ok(PathToken::Property(PropertyToken { names }))
    }

    /// A token for a textual label, using JavaScript array semantics: a
    /// canonical non-negative integer label addresses an index, anything
    /// else a property.
    pub fn from_label(label: &str) -> Result<Self, PathError> {
        match array_index_label(label) {
            Some(index) => Self::index(index),
            None => Self::property(label),
        }
    }

    pub fn index(index: i64) -> Result<Self, PathError> {
        Self::index_op(IndexOperation::SingleIndex, vec![index])
    }

    pub fn index_sequence(indices: Vec<i64>) -> Result<Self, PathError> {
        Self::index_op(IndexOperation::IndexSequence, indices)
    }

    pub fn slice_from(from: i64) -> Result<Self, PathError> {
        Self::index_op(IndexOperation::SliceFrom, vec![from])
    }

    pub fn slice_to(to: i64) -> Result<Self, PathError> {
        Self::index_op(IndexOperation::SliceTo, vec![to])
    }

    pub fn slice_between(from: i64, to: i64) -> Result<Self, PathError> {
        Self::index_op(IndexOperation::SliceBetween, vec![from, to])
    }

    /// `[@.size()+offset]`; the offset may be negative.
    pub fn context_size(offset: i64) -> Result<Self, PathError> {
        Self::index_op(IndexOperation::ContextSize, vec![offset])
    }

    pub fn wildcard() -> Self {
        PathToken::Wildcard(WildcardStyle::Star)
    }

    /// The `[ALL]` spelling of the wildcard, used by table paths.
    pub fn all() -> Self {
        PathToken::Wildcard(WildcardStyle::All)
    }

    /// Builds an index token, checking operand count and bounds for `operation`.
    pub fn index_op(operation: IndexOperation, operands: Vec<i64>) -> Result<Self, PathError> {
        let expected = match operation {
            IndexOperation::IndexSequence => None,
            IndexOperation::SliceBetween => Some(2),
            _ => Some(1),
        };
        match expected {
            Some(n) if operands.len() != n => {
                return Err(PathError::invalid_token(format!(
                    "{:?} requires exactly {} operand(s), found {}",
                    operation,
                    n,
                    operands.len()
                )))
            }
            None if operands.len() < 2 => {
                return Err(PathError::invalid_token(format!(
                    "IndexSequence requires at least 2 operands, found {}",
                    operands.len()
                )))
            }
            _ => {}
        }

        if operation != IndexOperation::ContextSize {
            if let Some(negative) = operands.iter().find(|i| **i < 0) {
                return Err(PathError::invalid_token(format!(
                    "index operands must be non-negative, found {}",
                    negative
                )));
            }
        }

        if operation == IndexOperation::SliceBetween && operands[0] > operands[1] {
            return Err(PathError::invalid_token(format!(
                "invalid slice: start ({}) > end ({})",
                operands[0], operands[1]
            )));
        }

        Ok(PathToken::Index(IndexToken {
            operation,
            operands,
        }))
    }

    /// True if this token alone selects at most one element.
    pub fn is_definite(&self) -> bool {
        match self {
            PathToken::Root => true,
            PathToken::Property(p) => p.names.len() == 1,
            PathToken::Index(i) => matches!(
                i.operation,
                IndexOperation::SingleIndex | IndexOperation::ContextSize
            ),
            PathToken::Wildcard(_) => false,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, PathToken::Root)
    }

    /// True for tokens that select elements of a collection.
    pub fn is_element_selector(&self) -> bool {
        matches!(self, PathToken::Index(_) | PathToken::Wildcard(_))
    }

    /// The textual fragment for this token.
    pub fn fragment(&self) -> String {
        match self {
            PathToken::Root => "$".to_string(),
            PathToken::Property(p) => p.fragment(),
            PathToken::Index(i) => i.fragment(),
            PathToken::Wildcard(WildcardStyle::Star) => "[*]".to_string(),
            PathToken::Wildcard(WildcardStyle::All) => "[ALL]".to_string(),
        }
    }

    /// The bare label of the token, without brackets or dots.
    pub fn label(&self) -> String {
        match self {
            PathToken::Root => "$".to_string(),
            PathToken::Property(p) => p.names.join(","),
            PathToken::Index(i) => {
                let fragment = i.fragment();
                fragment[1..fragment.len() - 1].to_string()
            }
            PathToken::Wildcard(WildcardStyle::Star) => "*".to_string(),
            PathToken::Wildcard(WildcardStyle::All) => "ALL".to_string(),
        }
    }
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragment())
    }
}

fn quote_name(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for ch in name.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}
