//! TracePath - JSONPath-style addresses for documents, tables and typed object graphs.
//!
//! A [`Path`] names one element (definite) or a set of elements (indefinite)
//! inside some hierarchical data. Paths can be parsed from text, built token
//! by token, built from a chain of property names guided by a schema, or
//! produced by the table helpers. Every path serializes back to text that
//! parses to an equal path.
//!
//! ```
//! use tracepath::{Path, PathToken};
//!
//! let path = Path::root()
//!     .append(PathToken::property("dataset").unwrap())
//!     .unwrap()
//!     .append(PathToken::wildcard())
//!     .unwrap();
//! assert_eq!(path.to_text(), "$.dataset[*]");
//! assert_eq!(Path::parse("$.dataset[*]").unwrap(), path);
//! ```

pub mod config;
pub mod path;
pub mod schema;
pub mod table;

pub use path::{data_nodes_path, Path, PathError, PathToken};
pub use schema::{property_path, validate_path, BuiltPath, SchemaNode};
pub use table::{table_header_path, table_path};
