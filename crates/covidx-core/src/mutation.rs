//! Pending row mutations.

use bytes::Bytes;

use crate::cell::Cell;
use crate::column::CoveredColumn;
use crate::error::{Error, Result};

/// Cells about to be applied to a single row.
///
/// Built with chained calls:
///
/// ```rust
/// use covidx_core::Mutation;
///
/// let mutation = Mutation::new("user#42")
///     .put("info", "email", 10, "a@example.com")
///     .delete_column("info", "phone", 10);
/// assert_eq!(mutation.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    row: Bytes,
    cells: Vec<Cell>,
}

impl Mutation {
    /// Creates an empty mutation for `row`.
    #[must_use]
    pub fn new(row: impl Into<Bytes>) -> Self {
        Self {
            row: row.into(),
            cells: Vec::new(),
        }
    }

    /// Adds a put.
    #[must_use]
    pub fn put(
        mut self,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        timestamp: u64,
        value: impl Into<Bytes>,
    ) -> Self {
        let cell = Cell::put(self.row.clone(), family, qualifier, timestamp, value);
        self.cells.push(cell);
        self
    }

    /// Adds an exact-version delete.
    #[must_use]
    pub fn delete_exact(
        mut self,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        timestamp: u64,
    ) -> Self {
        let cell = Cell::delete_exact(self.row.clone(), family, qualifier, timestamp);
        self.cells.push(cell);
        self
    }

    /// Adds a delete of every version of a column up to `timestamp`.
    #[must_use]
    pub fn delete_column(
        mut self,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        timestamp: u64,
    ) -> Self {
        let cell = Cell::delete_column(self.row.clone(), family, qualifier, timestamp);
        self.cells.push(cell);
        self
    }

    /// Adds a delete of the whole family up to `timestamp`.
    #[must_use]
    pub fn delete_family(mut self, family: impl Into<Bytes>, timestamp: u64) -> Self {
        let cell = Cell::delete_family(self.row.clone(), family, timestamp);
        self.cells.push(cell);
        self
    }

    /// Adds a prebuilt cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowMismatch`] if the cell belongs to another row.
    pub fn add_cell(&mut self, cell: Cell) -> Result<()> {
        if cell.row != self.row {
            return Err(Error::RowMismatch {
                expected: hex::encode(&self.row),
                actual: hex::encode(&cell.row),
            });
        }
        self.cells.push(cell);
        Ok(())
    }

    /// Row the mutation applies to.
    #[must_use]
    pub fn row(&self) -> &Bytes {
        &self.row
    }

    /// Cells in insertion order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the mutation carries no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns true if any cell addresses one of `columns`.
    ///
    /// A mutation that touches none of a group's columns cannot change the
    /// group's index key.
    #[must_use]
    pub fn touches(&self, columns: &[CoveredColumn]) -> bool {
        self.cells
            .iter()
            .any(|cell| columns.iter().any(|column| column.matches(cell)))
    }
}
