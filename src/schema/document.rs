//! Schema documents: named type declarations loaded from TOML or YAML.
//!
//! A document lists types by name; each field is declared with a short kind
//! string:
//!
//! - `"scalar"` (or `"string"`, `"number"`, `"integer"`, `"boolean"`) - a leaf value
//! - `"Agent"` - a nested value of the declared type `Agent`
//! - `"[Theme]"` - a collection of `Theme`
//! - `"[?]"` - a collection whose element type is unknown
//!
//! ```
//! use tracepath::schema::{property_path, SchemaDocument};
//!
//! let doc = SchemaDocument::from_toml_str(r#"
//! root = "Catalog"
//!
//! [types.Catalog]
//! dataset = "[Dataset]"
//!
//! [types.Dataset]
//! title = "scalar"
//! "#).unwrap();
//!
//! let built = property_path(doc.root_node().unwrap(), ["dataset", "title"]).unwrap();
//! assert_eq!(built.path().to_text(), "$.dataset[*].title");
//! ```

use std::fs;
use std::path::{Path as FsPath, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{FieldKind, NoFields, NodeRef, SchemaNode};

const SCALAR_KINDS: &[&str] = &["scalar", "string", "number", "integer", "boolean"];

/// Errors that can occur while loading a schema document.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML schema: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse YAML schema: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Field '{field}' of type '{owner}' has an invalid kind '{kind}'")]
    InvalidKind {
        owner: String,
        field: String,
        kind: String,
    },

    #[error("Field '{field}' of type '{owner}' refers to undeclared type '{target}'")]
    UnknownType {
        owner: String,
        field: String,
        target: String,
    },

    #[error("Type '{0}' is not declared")]
    UnknownRoot(String),

    #[error("Schema document doesn't name a root type")]
    MissingRoot,
}

/// A parsed field kind string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindSpec<'a> {
    Scalar,
    Class(&'a str),
    Collection(Option<&'a str>),
}

fn is_type_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(|c: char| c.is_whitespace() || matches!(c, '[' | ']' | '?'))
}

fn parse_kind(spec: &str) -> Option<KindSpec<'_>> {
    let spec = spec.trim();
    if SCALAR_KINDS.contains(&spec) {
        return Some(KindSpec::Scalar);
    }
    if let Some(inner) = spec.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let inner = inner.trim();
        return match inner {
            "?" => Some(KindSpec::Collection(None)),
            name if is_type_name(name) => Some(KindSpec::Collection(Some(name))),
            _ => None,
        };
    }
    if is_type_name(spec) {
        Some(KindSpec::Class(spec))
    } else {
        None
    }
}

/// A registry of named types, each mapping field names to kind strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Type the root of a path refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    root: Option<String>,

    /// Declared types, in declaration order.
    #[serde(default)]
    types: IndexMap<String, IndexMap<String, String>>,
}

impl SchemaDocument {
    /// Parses and validates a TOML schema document.
    pub fn from_toml_str(content: &str) -> Result<Self, SchemaError> {
        let doc: SchemaDocument = toml::from_str(content)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parses and validates a YAML schema document.
    pub fn from_yaml_str(content: &str) -> Result<Self, SchemaError> {
        let doc: SchemaDocument = serde_yaml::from_str(content)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Loads a schema file; `.yaml`/`.yml` files are read as YAML, anything else as TOML.
    pub fn load<P: AsRef<FsPath>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Checks every field kind and type reference.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if let Some(root) = &self.root {
            if !self.types.contains_key(root) {
                return Err(SchemaError::UnknownRoot(root.clone()));
            }
        }

        for (owner, fields) in &self.types {
            for (field, spec) in fields {
                let target = match parse_kind(spec) {
                    None => {
                        return Err(SchemaError::InvalidKind {
                            owner: owner.clone(),
                            field: field.clone(),
                            kind: spec.clone(),
                        })
                    }
                    Some(KindSpec::Class(target)) | Some(KindSpec::Collection(Some(target))) => {
                        target
                    }
                    Some(_) => continue,
                };
                if !self.types.contains_key(target) {
                    return Err(SchemaError::UnknownType {
                        owner: owner.clone(),
                        field: field.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Names of the declared types.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Schema view of the type called `name`.
    pub fn node(&self, name: &str) -> Option<DocumentNode<'_>> {
        self.types
            .get_key_value(name)
            .map(|(name, fields)| DocumentNode {
                doc: self,
                name: name.as_str(),
                fields,
            })
    }

    /// Schema view of the root type.
    pub fn root_node(&self) -> Result<DocumentNode<'_>, SchemaError> {
        let root = self.root.as_deref().ok_or(SchemaError::MissingRoot)?;
        self.node(root)
            .ok_or_else(|| SchemaError::UnknownRoot(root.to_string()))
    }
}

/// One declared type of a [`SchemaDocument`].
#[derive(Debug, Clone, Copy)]
pub struct DocumentNode<'a> {
    doc: &'a SchemaDocument,
    name: &'a str,
    fields: &'a IndexMap<String, String>,
}

impl<'a> DocumentNode<'a> {
    fn kind_of(&self, spec: &'a str) -> FieldKind<'a> {
        match parse_kind(spec) {
            Some(KindSpec::Class(target)) => match self.doc.node(target) {
                Some(node) => FieldKind::ClassLike(Box::new(node)),
                None => FieldKind::ClassLike(Box::new(NoFields)),
            },
            Some(KindSpec::Collection(Some(target))) => FieldKind::Collection(
                self.doc
                    .node(target)
                    .map(|node| -> NodeRef<'a> { Box::new(node) }),
            ),
            Some(KindSpec::Collection(None)) => FieldKind::Collection(None),
            Some(KindSpec::Scalar) | None => FieldKind::Scalar,
        }
    }
}

impl<'a> SchemaNode<'a> for DocumentNode<'a> {
    fn type_name(&self) -> &str {
        self.name
    }

    fn fields(&self) -> IndexMap<&'a str, FieldKind<'a>> {
        let fields: &'a IndexMap<String, String> = self.fields;
        fields
            .iter()
            .map(|(name, spec)| (name.as_str(), self.kind_of(spec)))
            .collect()
    }

    fn field(&self, name: &str) -> Option<FieldKind<'a>> {
        let fields: &'a IndexMap<String, String> = self.fields;
        fields.get(name).map(|spec| self.kind_of(spec))
    }
}
