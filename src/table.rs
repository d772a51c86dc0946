//! Paths addressing cells, rows and columns of a table.
//!
//! A table is seen as an array of rows. A row or column selector of `-1`
//! (see [`ALL_INDEX`]) or a header of `"ALL"` (see [`ALL_HEADER`]) selects
//! every row or column, rendered as `[ALL]`.
//!
//! ```
//! use tracepath::path::Path;
//! use tracepath::table::{table_header_path, table_path};
//!
//! let root = Path::root();
//! assert_eq!(table_path(&root, 2, -1).unwrap().to_text(), "$[2][ALL]");
//! assert_eq!(table_header_path(&root, -1, "h1").unwrap().to_text(), "$[ALL].h1");
//! ```

use crate::path::{Path, PathError, PathToken};

/// Index selector meaning "every row" or "every column".
pub const ALL_INDEX: i64 = -1;

/// Header selector meaning "every column".
pub const ALL_HEADER: &str = "ALL";

fn selector(index: i64, what: &str) -> Result<PathToken, PathError> {
    match index {
        ALL_INDEX => Ok(PathToken::all()),
        i if i >= 0 => PathToken::index(i),
        i => Err(PathError::invalid_argument(format!(
            "Invalid {} index {}! To select all {}s use {}",
            what, i, what, ALL_INDEX
        ))),
    }
}

/// Appends a row selector and a column selector to `base`.
pub fn table_path(base: &Path, row: i64, col: i64) -> Result<Path, PathError> {
    let row = selector(row, "row")?;
    let col = selector(col, "column")?;
    base.append_all([row, col])
}

/// Appends a row selector and a column header to `base`.
///
/// Blank headers are rejected; use [`ALL_HEADER`] to select every column.
pub fn table_header_path(base: &Path, row: i64, header: &str) -> Result<Path, PathError> {
    let row = selector(row, "row")?;
    if header.trim().is_empty() {
        return Err(PathError::invalid_argument(format!(
            "Invalid header '{}'! To select all headers use {}",
            header, ALL_HEADER
        )));
    }
    let col = if header == ALL_HEADER {
        PathToken::all()
    } else {
        PathToken::property(header)?
    };
    base.append_all([row, col])
}

/// Path addressing a whole row.
pub fn row_path(base: &Path, row: i64) -> Result<Path, PathError> {
    base.append(selector(row, "row")?)
}
