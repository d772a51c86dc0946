//! Immutable chains of path tokens.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::PathError;
use super::parser::Parser;
use super::token::PathToken;

/// An ordered, non-empty, immutable sequence of path tokens.
///
/// A `Path` can be read two ways that always agree:
///
/// - as a chain: [`token`](Path::token) is the current step,
///   [`has_next`](Path::has_next) / [`next`](Path::next) walk forward;
/// - as a sequence: [`tokens`](Path::tokens) returns every step at once.
///
/// Sub-paths returned by `next()` share the token buffer of the path they
/// came from, so walking a chain never copies tokens.
///
/// # Example
///
/// ```
/// use tracepath::path::{Path, PathToken};
///
/// let path = Path::root()
///     .append(PathToken::property("dataset").unwrap())
///     .unwrap()
///     .append(PathToken::wildcard())
///     .unwrap();
///
/// assert_eq!(path.to_text(), "$.dataset[*]");
/// assert_eq!(path.token_count(), 3);
/// assert!(!path.is_path_definite());
/// ```
#[derive(Clone)]
pub struct Path {
    tokens: Arc<[PathToken]>,
    start: usize,
}

impl Path {
    /// The single-token path `$`.
    pub fn root() -> Self {
        Self {
            tokens: Arc::from(vec![PathToken::Root]),
            start: 0,
        }
    }

    /// Builds a path from `tokens`.
    ///
    /// Fails with `InvalidArgument` if `tokens` is empty and with
    /// `InvalidToken` if `Root` appears anywhere but first.
    pub fn from_tokens(tokens: Vec<PathToken>) -> Result<Self, PathError> {
        if tokens.is_empty() {
            return Err(PathError::invalid_argument(
                "a path needs at least one token",
            ));
        }
        if tokens.iter().skip(1).any(PathToken::is_root) {
            return Err(PathError::invalid_token(
                "'$' is only valid as the first token of a path",
            ));
        }
        Ok(Self {
            tokens: Arc::from(tokens),
            start: 0,
        })
    }

    /// Builds `$` followed by one token per label.
    ///
    /// Labels follow JavaScript array semantics: `"3"` becomes `[3]`, while
    /// `"name"` becomes `.name`.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens = vec![PathToken::Root];
        for label in labels {
            tokens.push(PathToken::from_label(label.as_ref())?);
        }
        Self::from_tokens(tokens)
    }

    /// Parses `text` into a path. Same as [`Parser::parse`].
    pub fn parse(text: &str) -> Result<Self, PathError> {
        Parser::parse(text)
    }

    /// Tokens of this path, first to last.
    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens[self.start..]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathToken> {
        self.tokens().iter()
    }

    /// The current (first) token of the chain.
    pub fn token(&self) -> &PathToken {
        &self.tokens[self.start]
    }

    /// The final token.
    pub fn last(&self) -> &PathToken {
        &self.tokens[self.tokens.len() - 1]
    }

    pub fn has_next(&self) -> bool {
        self.start + 1 < self.tokens.len()
    }

    /// True if the path has no successor.
    pub fn is_leaf(&self) -> bool {
        !self.has_next()
    }

    /// Returns the sub-path that starts at the following token.
    ///
    /// Fails with `NotFound` if this path is a leaf.
    pub fn next(&self) -> Result<Path, PathError> {
        if self.is_leaf() {
            return Err(PathError::NotFound {
                message: format!("Current path token '{}' is a leaf", self.token()),
            });
        }
        Ok(Self {
            tokens: Arc::clone(&self.tokens),
            start: self.start + 1,
        })
    }

    /// Number of tokens, root included.
    pub fn token_count(&self) -> usize {
        self.tokens.len() - self.start
    }

    /// True if the path starts with `$`.
    pub fn is_absolute(&self) -> bool {
        self.token().is_root()
    }

    /// True if the path addresses exactly one element.
    ///
    /// Definiteness is prefix-closed: the first indefinite token makes the
    /// whole path indefinite, and nothing after it can restore it.
    pub fn is_path_definite(&self) -> bool {
        self.definite_prefix_len() == self.token_count()
    }

    /// Number of leading tokens that are all definite.
    pub fn definite_prefix_len(&self) -> usize {
        self.iter().take_while(|t| t.is_definite()).count()
    }

    /// True if the token at `index` and every token before it are definite.
    ///
    /// Out-of-range indices return `false`.
    pub fn is_upstream_definite(&self, index: usize) -> bool {
        index < self.token_count() && index < self.definite_prefix_len()
    }

    /// Returns a new path with `token` appended.
    ///
    /// Fails with `InvalidToken` if `token` is `Root`.
    pub fn append(&self, token: PathToken) -> Result<Path, PathError> {
        self.append_all(std::iter::once(token))
    }

    /// Returns a new path with every token of `tokens` appended.
    pub fn append_all<I>(&self, tokens: I) -> Result<Path, PathError>
    where
        I: IntoIterator<Item = PathToken>,
    {
        let mut all = self.tokens().to_vec();
        all.extend(tokens);
        Self::from_tokens(all)
    }

    /// Returns the absolute form of this path, prepending `$` if missing.
    pub fn with_root(&self) -> Path {
        if self.is_absolute() {
            return self.clone();
        }
        let mut all = Vec::with_capacity(self.token_count() + 1);
        all.push(PathToken::Root);
        all.extend_from_slice(self.tokens());
        Self {
            tokens: Arc::from(all),
            start: 0,
        }
    }

    /// Bare labels of each token, e.g. `["$", "dataset", "*", "uri"]`.
    pub fn labels(&self) -> Vec<String> {
        self.iter().map(PathToken::label).collect()
    }

    /// The textual form of the path. Parses back to an equal path.
    pub fn to_text(&self) -> String {
        self.iter().map(PathToken::fragment).collect()
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.tokens() == other.tokens()
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tokens().hash(state);
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in self.iter() {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({})", self)
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::parse(s)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathToken;
    type IntoIter = std::slice::Iter<'a, PathToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Parser::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Path addressing a set of data nodes by id: `$[7]` for one id, `$[1,3]` for several.
///
/// Fails with `InvalidArgument` if `ids` is empty.
pub fn data_nodes_path(ids: &[u64]) -> Result<Path, PathError> {
    let operands = ids
        .iter()
        .map(|id| {
            i64::try_from(*id)
                .map_err(|_| PathError::invalid_argument(format!("node id {} is too large", id)))
        })
        .collect::<Result<Vec<i64>, PathError>>()?;

    let token = match operands.as_slice() {
        [] => return Err(PathError::invalid_argument("Invalid node ids! Found none")),
        [single] => PathToken::index(*single)?,
        _ => PathToken::index_sequence(operands)?,
    };
    Path::root().append(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str) -> PathToken {
        PathToken::property(name).unwrap()
    }

    fn sample() -> Path {
        Path::from_tokens(vec![
            PathToken::Root,
            prop("dataset"),
            PathToken::index(3).unwrap(),
            prop("name"),
        ])
        .unwrap()
    }

    #[test]
    fn test_root() {
        let root = Path::root();
        assert_eq!(root.token_count(), 1);
        assert_eq!(root.to_text(), "$");
        assert!(root.is_leaf());
        assert!(root.is_path_definite());
    }

    #[test]
    fn test_next_walks_the_chain() {
        let path = sample();
        let next = path.next().unwrap();
        assert_eq!(next.token(), &prop("dataset"));
        assert_eq!(next.token_count(), 3);
        assert_eq!(next.to_text(), ".dataset[3].name");
        assert!(!next.is_absolute());

        let mut cursor = path.clone();
        let mut seen = vec![cursor.token().clone()];
        while cursor.has_next() {
            cursor = cursor.next().unwrap();
            seen.push(cursor.token().clone());
        }
        assert_eq!(seen.as_slice(), path.tokens());
    }

    #[test]
    fn test_next_on_leaf_fails() {
        let err = Path::root().next().unwrap_err();
        assert!(matches!(err, PathError::NotFound { .. }));
    }

    #[test]
    fn test_append_returns_new_path() {
        let root = Path::root();
        let longer = root.append(prop("a")).unwrap();
        assert_eq!(root.token_count(), 1);
        assert_eq!(longer.token_count(), 2);
        assert_eq!(longer.to_text(), "$.a");
    }

    #[test]
    fn test_append_root_fails() {
        assert!(matches!(
            Path::root().append(PathToken::Root),
            Err(PathError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_from_tokens_rejects_empty() {
        assert!(matches!(
            Path::from_tokens(vec![]),
            Err(PathError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_definite_is_prefix_closed() {
        let path = Path::from_tokens(vec![
            PathToken::Root,
            prop("a"),
            PathToken::wildcard(),
            prop("b"),
        ])
        .unwrap();
        assert!(!path.is_path_definite());
        assert_eq!(path.definite_prefix_len(), 2);
        assert!(path.is_upstream_definite(1));
        assert!(!path.is_upstream_definite(2));
        assert!(!path.is_upstream_definite(3));
        assert!(!path.is_upstream_definite(10));
        assert!(sample().is_path_definite());
    }

    #[test]
    fn test_equality_and_hash_follow_tokens() {
        use std::collections::HashSet;

        let tail = sample().next().unwrap();
        let rebuilt =
            Path::from_tokens(vec![prop("dataset"), PathToken::index(3).unwrap(), prop("name")])
                .unwrap();
        assert_eq!(tail, rebuilt);

        let mut set = HashSet::new();
        set.insert(tail);
        assert!(set.contains(&rebuilt));
    }

    #[test]
    fn test_with_root() {
        let tail = sample().next().unwrap();
        assert_eq!(tail.with_root().to_text(), "$.dataset[3].name");
        assert_eq!(sample().with_root(), sample());
    }

    #[test]
    fn test_labels() {
        let path = Path::from_labels(["dataset", "3", "my name"]).unwrap();
        assert_eq!(path.to_text(), "$.dataset[3][\"my name\"]");
        assert_eq!(path.labels(), vec!["$", "dataset", "3", "my name"]);
    }

    #[test]
    fn test_data_nodes_path() {
        assert_eq!(data_nodes_path(&[1, 3]).unwrap().to_text(), "$[1,3]");
        assert_eq!(data_nodes_path(&[7]).unwrap().to_text(), "$[7]");
        assert!(matches!(
            data_nodes_path(&[]),
            Err(PathError::InvalidArgument { .. })
        ));
    }
}
