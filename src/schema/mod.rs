//! Type schemas used to build and check paths without inspecting data.
//!
//! The path builder never looks at concrete Rust types. Anything that can
//! list the fields of a type and say whether each one is a scalar, a nested
//! class-like type or a collection implements [`SchemaNode`]. Two
//! implementations ship with the crate:
//!
//! - [`Schema`], an owned in-memory tree, handy for types known at compile time;
//! - [`SchemaDocument`], a named-type registry loaded from TOML or YAML,
//!   which also supports recursive types.
//!
//! # Example
//!
//! ```
//! use tracepath::schema::{property_path, Schema};
//!
//! let theme = Schema::new("Theme").scalar("uri");
//! let catalog = Schema::new("Catalog").collection("dataset", theme);
//!
//! let built = property_path(&catalog, ["dataset", "uri"]).unwrap();
//! assert_eq!(built.path().to_text(), "$.dataset[*].uri");
//! assert!(!built.path().is_path_definite());
//! ```

pub mod builder;
pub mod document;

use std::fmt;

use indexmap::IndexMap;

pub use builder::{property_path, validate_path, BuiltPath};
pub use document::{DocumentNode, SchemaDocument, SchemaError};

/// A boxed schema node borrowed from some schema source for `'a`.
pub type NodeRef<'a> = Box<dyn SchemaNode<'a> + 'a>;

/// The kind of a field.
pub enum FieldKind<'a> {
    /// A leaf value with no fields of its own.
    Scalar,
    /// A nested type with its own fields.
    ClassLike(NodeRef<'a>),
    /// A collection; `None` when the element type can't be determined.
    Collection(Option<NodeRef<'a>>),
}

impl fmt::Debug for FieldKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar => write!(f, "Scalar"),
            FieldKind::ClassLike(node) => write!(f, "ClassLike({})", node.type_name()),
            FieldKind::Collection(Some(node)) => write!(f, "Collection({})", node.type_name()),
            FieldKind::Collection(None) => write!(f, "Collection(?)"),
        }
    }
}

/// The fields of one type, as seen by the path builder.
///
/// Nodes handed out through [`FieldKind`] live for `'a`, independent of the
/// node that returned them, so a builder can keep descending without holding
/// on to the parent.
pub trait SchemaNode<'a> {
    /// Name of the type, used in messages.
    fn type_name(&self) -> &str;

    /// Every field of the type, in declaration order.
    fn fields(&self) -> IndexMap<&'a str, FieldKind<'a>>;

    /// Looks up a single field.
    fn field(&self, name: &str) -> Option<FieldKind<'a>> {
        self.fields().shift_remove(name)
    }
}

/// The schema reached after a scalar field: it has no fields.
pub(crate) struct NoFields;

impl<'a> SchemaNode<'a> for NoFields {
    fn type_name(&self) -> &str {
        "scalar"
    }

    fn fields(&self) -> IndexMap<&'a str, FieldKind<'a>> {
        IndexMap::new()
    }

    fn field(&self, _name: &str) -> Option<FieldKind<'a>> {
        None
    }
}

/// An owned type schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    name: String,
    fields: IndexMap<String, Field>,
}

/// A field of an owned [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Scalar,
    ClassLike(Schema),
    Collection(Option<Schema>),
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn scalar(self, name: impl Into<String>) -> Self {
        self.with_field(name, Field::Scalar)
    }

    pub fn class(self, name: impl Into<String>, schema: Schema) -> Self {
        self.with_field(name, Field::ClassLike(schema))
    }

    pub fn collection(self, name: impl Into<String>, element: Schema) -> Self {
        self.with_field(name, Field::Collection(Some(element)))
    }

    /// A collection field whose element type is unknown.
    pub fn opaque_collection(self, name: impl Into<String>) -> Self {
        self.with_field(name, Field::Collection(None))
    }
}

impl Field {
    fn kind(&self) -> FieldKind<'_> {
        match self {
            Field::Scalar => FieldKind::Scalar,
            Field::ClassLike(schema) => FieldKind::ClassLike(Box::new(schema)),
            Field::Collection(Some(schema)) => FieldKind::Collection(Some(Box::new(schema))),
            Field::Collection(None) => FieldKind::Collection(None),
        }
    }
}

impl<'a> SchemaNode<'a> for &'a Schema {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> IndexMap<&'a str, FieldKind<'a>> {
        let schema: &'a Schema = *self;
        schema
            .fields
            .iter()
            .map(|(name, field)| (name.as_str(), field.kind()))
            .collect()
    }

    fn field(&self, name: &str) -> Option<FieldKind<'a>> {
        let schema: &'a Schema = *self;
        schema.fields.get(name).map(Field::kind)
    }
}
