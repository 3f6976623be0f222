//! Row-scoped multi-version cell store and its scanners.
//!
//! A [`RowVersionStore`] holds every known version of one row: the cells
//! already persisted plus the cells of one pending [`Mutation`]. It is built
//! for a single row-update event and dropped afterwards. Reads go through
//! [`Scanner`]s, optionally decorated with [`CellFilter`]s.
//!
//! # Public Types
//!
//! - [`RowVersionStore`]: sorted, append-only cell container
//! - [`Scanner`]: seek/next/peek cursor contract
//! - [`StoreScanner`], [`EmptyScanner`]: scanner implementations
//! - [`filter`]: composable cell predicates

pub mod filter;
mod scanner;

#[cfg(test)]
mod scanner_tests;
#[cfg(test)]
mod tests;

pub use filter::{
    AcceptAll, And, ApplyDeletes, CellFilter, ColumnFilter, FamilyOnly, MaxTimestamp,
};
pub use scanner::{covered_columns_scanner, EmptyScanner, Scanner, StoreScanner};

use bytes::Bytes;
use std::cmp::Ordering;

use crate::cell::Cell;
use crate::column::CoveredColumn;
use crate::error::{Error, Result};
use crate::mutation::Mutation;

/// Sorted container of every known version of a single row.
///
/// Cells are kept in [`Cell::key_cmp`] order and never modified once added.
/// A cell whose coordinate (including kind) is already present is ignored,
/// so whichever source is merged first wins ties.
#[derive(Debug, Clone)]
pub struct RowVersionStore {
    row: Bytes,
    cells: Vec<Cell>,
}

impl RowVersionStore {
    /// Creates an empty store for `row`.
    #[must_use]
    pub fn new(row: impl Into<Bytes>) -> Self {
        Self {
            row: row.into(),
            cells: Vec::new(),
        }
    }

    /// Builds the store for one update event: the pending mutation's cells
    /// first, then the persisted ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowMismatch`] if any cell belongs to another row.
    pub fn from_row<I>(row: impl Into<Bytes>, persisted: I, mutation: &Mutation) -> Result<Self>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut store = Self::new(row);
        store.merge(persisted, mutation.cells().iter().cloned())?;
        Ok(store)
    }

    /// Merges persisted cells with pending cells; pending cells are added
    /// first and take precedence on identical coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowMismatch`] if any cell belongs to another row.
    pub fn merge<P, M>(&mut self, persisted: P, pending: M) -> Result<()>
    where
        P: IntoIterator<Item = Cell>,
        M: IntoIterator<Item = Cell>,
    {
        for cell in pending {
            self.add(cell)?;
        }
        for cell in persisted {
            self.add(cell)?;
        }
        Ok(())
    }

    /// Inserts a cell at its sorted position.
    ///
    /// Returns `false` if a cell with the same coordinate was already present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowMismatch`] if the cell belongs to another row.
    pub fn add(&mut self, cell: Cell) -> Result<bool> {
        if cell.row != self.row {
            return Err(Error::RowMismatch {
                expected: hex::encode(&self.row),
                actual: hex::encode(&cell.row),
            });
        }

        let pos = self
            .cells
            .partition_point(|existing| existing.key_cmp(&cell) == Ordering::Less);
        if self
            .cells
            .get(pos)
            .is_some_and(|existing| existing.key_cmp(&cell) == Ordering::Equal)
        {
            tracing::trace!(%cell, "duplicate coordinate ignored");
            return Ok(false);
        }
        self.cells.insert(pos, cell);
        Ok(true)
    }

    /// Row this store holds versions for.
    #[must_use]
    pub fn row(&self) -> &Bytes {
        &self.row
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the store holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Opens a scanner over the store, filtered by `filter`.
    #[must_use]
    pub fn scanner<F: CellFilter>(&self, filter: F) -> StoreScanner<'_, F> {
        StoreScanner::new(&self.cells, filter)
    }

    /// Visible puts of `columns` as of `timestamp`, in store order.
    ///
    /// Delete markers and the versions they shadow are left out.
    ///
    /// # Errors
    ///
    /// Propagates scanner errors.
    pub fn visible_cells(&self, columns: &[CoveredColumn], timestamp: u64) -> Result<Vec<Cell>> {
        let mut scanner = covered_columns_scanner(self, columns, timestamp)?;
        let mut cells = Vec::new();
        while let Some(cell) = scanner.next()? {
            cells.push(cell);
        }
        Ok(cells)
    }
}
