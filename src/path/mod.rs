//! Trace paths: JSONPath-style addresses for locations inside documents.
//!
//! A trace path names one element (a *definite* path) or a set of elements
//! (an *indefinite* path) inside a JSON-like tree, a table or a typed object
//! graph. This module only produces, checks and serializes addresses; it
//! never reads the documents they point into.
//!
//! # Supported Syntax
//!
//! - `$` - Root node
//! - `.property` - Named property access
//! - `["property"]` / `['property']` - Bracket notation
//! - `["a","b"]` - Multiple properties
//! - `[3]` - Array index
//! - `[1,3,5]` - Index sequence
//! - `[2:]`, `[:5]`, `[2:5]` - Array slicing
//! - `[@.size()-1]` - Index relative to the array size
//! - `[*]` or `[ALL]` - All children (wildcard)
//!
//! # Examples
//!
//! ```
//! use tracepath::path::Path;
//!
//! let path: Path = "$.dataset[3].name".parse().unwrap();
//! assert!(path.is_path_definite());
//! assert_eq!(path.to_string(), "$.dataset[3].name");
//!
//! let slice = Path::parse("$.dataset[2:5]").unwrap();
//! assert!(!slice.is_path_definite());
//! ```

pub mod chain;
pub mod error;
pub mod parser;
pub mod token;

pub use chain::{data_nodes_path, Path};
pub use error::{PathError, SyntaxErrorKind};
pub use parser::Parser;
pub use token::{
    check_identifier, is_identifier_safe, IndexOperation, IndexToken, PathToken, PropertyToken,
    WildcardStyle,
};
