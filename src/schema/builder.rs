//! Schema-guided path building and checking.

use tracing::{debug, warn};

use super::{FieldKind, NoFields, NodeRef, SchemaNode};
use crate::path::{Path, PathError, PathToken};

/// A path produced or checked against a schema.
///
/// When a collection field's element type can't be resolved, the rest of the
/// path is accepted without checking. [`unchecked_from`](Self::unchecked_from)
/// tells where that tail starts so callers can decide how far to trust it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPath {
    path: Path,
    unchecked_from: Option<usize>,
}

impl BuiltPath {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> Path {
        self.path
    }

    /// True when every token was checked against the schema.
    pub fn is_fully_checked(&self) -> bool {
        self.unchecked_from.is_none()
    }

    /// Index of the first token that wasn't checked, if any.
    pub fn unchecked_from(&self) -> Option<usize> {
        self.unchecked_from
    }

    /// Tokens accepted without checking; empty for a fully checked path.
    pub fn unchecked_tail(&self) -> &[PathToken] {
        match self.unchecked_from {
            Some(start) => &self.path.tokens()[start..],
            None => &[],
        }
    }
}

/// `$` followed by the tokens of `prefix`, for error reports.
fn path_so_far(prefix: &[PathToken]) -> Result<Path, PathError> {
    Path::root().append_all(prefix.iter().filter(|t| !t.is_root()).cloned())
}

/// Builds the path for a chain of property names starting at `root`.
///
/// A wildcard is inserted after every collection field and descent continues
/// into the element type, so `["dataset", "themes", "uri"]` over a catalog
/// schema yields `$.dataset[*].themes[*].uri`.
///
/// Fails with `UnknownProperty` as soon as a name isn't a field of the type
/// reached so far. If a collection's element type is unresolved, the
/// remaining names are appended unchecked and the result reports where the
/// unchecked tail starts.
pub fn property_path<'a, N, I, S>(root: N, names: I) -> Result<BuiltPath, PathError>
where
    N: SchemaNode<'a> + 'a,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut current: NodeRef<'a> = Box::new(root);
    let mut tokens = vec![PathToken::Root];
    let mut names = names.into_iter();

    while let Some(name) = names.next() {
        let name = name.as_ref();
        let Some(kind) = current.field(name) else {
            return Err(PathError::UnknownProperty {
                name: name.to_string(),
                path: path_so_far(&tokens)?,
            });
        };
        tokens.push(PathToken::property(name)?);

        current = match kind {
            FieldKind::Scalar => Box::new(NoFields),
            FieldKind::ClassLike(node) => node,
            FieldKind::Collection(Some(element)) => {
                tokens.push(PathToken::wildcard());
                element
            }
            FieldKind::Collection(None) => {
                tokens.push(PathToken::wildcard());
                let unchecked_start = tokens.len();
                for rest in names.by_ref() {
                    tokens.push(PathToken::property(rest.as_ref())?);
                }
                let path = Path::from_tokens(tokens)?;
                if path.token_count() == unchecked_start {
                    return Ok(BuiltPath {
                        path,
                        unchecked_from: None,
                    });
                }
                warn!(
                    path = %path,
                    field = name,
                    "Couldn't resolve element type of collection field, accepting path as it is"
                );
                return Ok(BuiltPath {
                    path,
                    unchecked_from: Some(unchecked_start),
                });
            }
        };
    }

    let path = Path::from_tokens(tokens)?;
    debug!(path = %path, "Built schema-checked path");
    Ok(BuiltPath {
        path,
        unchecked_from: None,
    })
}

/// Checks an existing path against `root`.
///
/// `$` is skipped and a relative path is checked from `root` as well. After a
/// collection field, one element selector (a wildcard or index token) may
/// follow; a property directly after a collection field addresses the
/// element type. A multi-name property is checked name by name and ends
/// checking when more tokens follow it.
pub fn validate_path<'a, N>(root: N, path: &Path) -> Result<BuiltPath, PathError>
where
    N: SchemaNode<'a> + 'a,
{
    let tokens = path.tokens();
    let mut current: NodeRef<'a> = Box::new(root);
    let mut after_collection = false;

    let unchecked = |start: usize, reason: &str| {
        warn!(path = %path, start, "{}, accepting path as it is", reason);
        BuiltPath {
            path: path.clone(),
            unchecked_from: Some(start),
        }
    };

    for (i, token) in tokens.iter().enumerate() {
        let has_more = i + 1 < tokens.len();
        match token {
            PathToken::Root => {}
            PathToken::Wildcard(_) | PathToken::Index(_) => {
                if !after_collection {
                    return Err(PathError::SchemaMismatch {
                        path: path_so_far(&tokens[..=i])?,
                        reason: format!(
                            "'{}' selects elements of a value of type '{}', which is not a collection",
                            token,
                            current.type_name()
                        ),
                    });
                }
                after_collection = false;
            }
            PathToken::Property(property) => {
                after_collection = false;
                let mut kinds = Vec::with_capacity(property.names().len());
                for name in property.names() {
                    let Some(kind) = current.field(name) else {
                        return Err(PathError::UnknownProperty {
                            name: name.clone(),
                            path: path_so_far(&tokens[..i])?,
                        });
                    };
                    kinds.push(kind);
                }

                if kinds.len() > 1 {
                    if has_more {
                        return Ok(unchecked(i + 1, "Can't descend into several properties"));
                    }
                    break;
                }

                current = match kinds.pop() {
                    Some(FieldKind::ClassLike(node)) => node,
                    Some(FieldKind::Collection(Some(element))) => {
                        after_collection = true;
                        element
                    }
                    Some(FieldKind::Collection(None)) => {
                        // One element selector right after the field is still checked.
                        let mut start = i + 1;
                        if tokens.get(start).is_some_and(PathToken::is_element_selector) {
                            start += 1;
                        }
                        if start < tokens.len() {
                            return Ok(unchecked(
                                start,
                                "Couldn't resolve element type of collection field",
                            ));
                        }
                        break;
                    }
                    Some(FieldKind::Scalar) | None => Box::new(NoFields),
                };
            }
        }
    }

    debug!(path = %path, "Path matches schema");
    Ok(BuiltPath {
        path: path.clone(),
        unchecked_from: None,
    })
}
