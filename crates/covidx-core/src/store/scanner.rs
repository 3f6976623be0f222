//! Forward-only, seekable cursors over a row's cells.

use std::cmp::Ordering;

use super::filter::{ApplyDeletes, CellFilter, ColumnFilter, MaxTimestamp};
use super::RowVersionStore;
use crate::cell::Cell;
use crate::column::CoveredColumn;
use crate::error::Result;

/// Seekable, peekable forward cursor over versioned cells.
///
/// This is the contract resolution passes consume; any delete-aware source
/// of a row's cells can implement it.
pub trait Scanner {
    /// Positions the cursor at the first visible cell `>=` `target`.
    ///
    /// Returns whether such a cell exists.
    fn seek(&mut self, target: &Cell) -> Result<bool>;

    /// Returns the next visible cell and advances, `None` once exhausted.
    fn next(&mut self) -> Result<Option<Cell>>;

    /// Returns the next visible cell without advancing.
    fn peek(&mut self) -> Result<Option<&Cell>>;
}

impl<S: Scanner + ?Sized> Scanner for Box<S> {
    fn seek(&mut self, target: &Cell) -> Result<bool> {
        (**self).seek(target)
    }

    fn next(&mut self) -> Result<Option<Cell>> {
        (**self).next()
    }

    fn peek(&mut self) -> Result<Option<&Cell>> {
        (**self).peek()
    }
}

/// Scanner with no underlying data.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyScanner;

impl Scanner for EmptyScanner {
    fn seek(&mut self, _target: &Cell) -> Result<bool> {
        Ok(false)
    }

    fn next(&mut self) -> Result<Option<Cell>> {
        Ok(None)
    }

    fn peek(&mut self) -> Result<Option<&Cell>> {
        Ok(None)
    }
}

/// Filtered scanner over a [`RowVersionStore`].
///
/// Seeking forward from the current position continues the scan; seeking
/// backwards restarts it and resets the filter.
#[derive(Debug)]
pub struct StoreScanner<'a, F> {
    cells: &'a [Cell],
    /// Next index handed to the filter.
    pos: usize,
    /// Index of the accepted cell waiting to be returned.
    peeked: Option<usize>,
    filter: F,
}

impl<'a, F: CellFilter> StoreScanner<'a, F> {
    pub(crate) fn new(cells: &'a [Cell], filter: F) -> Self {
        Self {
            cells,
            pos: 0,
            peeked: None,
            filter,
        }
    }

    fn fill(&mut self) {
        if self.peeked.is_some() {
            return;
        }
        while let Some(cell) = self.cells.get(self.pos) {
            let index = self.pos;
            self.pos += 1;
            if self.filter.accept(cell) {
                self.peeked = Some(index);
                return;
            }
        }
    }

    fn first_at_or_after(&self, from: usize, target: &Cell) -> usize {
        from + self.cells[from..].partition_point(|cell| cell.key_cmp(target) == Ordering::Less)
    }
}

impl<F: CellFilter> Scanner for StoreScanner<'_, F> {
    fn seek(&mut self, target: &Cell) -> Result<bool> {
        match self.peeked.map(|index| (index, self.cells[index].key_cmp(target))) {
            Some((_, Ordering::Equal)) => return Ok(true),
            Some((index, Ordering::Less)) => {
                self.peeked = None;
                self.pos = self.first_at_or_after(index, target);
            }
            _ => {
                self.filter.reset();
                self.peeked = None;
                self.pos = self.first_at_or_after(0, target);
            }
        }
        self.fill();
        Ok(self.peeked.is_some())
    }

    fn next(&mut self) -> Result<Option<Cell>> {
        self.fill();
        Ok(self.peeked.take().map(|index| self.cells[index].clone()))
    }

    fn peek(&mut self) -> Result<Option<&Cell>> {
        self.fill();
        Ok(self.peeked.map(|index| &self.cells[index]))
    }
}

/// Delete-aware view of `store` restricted to `columns`, as of `timestamp`.
///
/// Yields only visible puts, starting at the first cell of the row. Returns an
/// [`EmptyScanner`] when nothing is visible.
///
/// # Errors
///
/// Propagates errors from the initial seek.
pub fn covered_columns_scanner<'a>(
    store: &'a RowVersionStore,
    columns: &[CoveredColumn],
    timestamp: u64,
) -> Result<Box<dyn Scanner + 'a>> {
    let filter = ColumnFilter::new(columns)
        .and(MaxTimestamp::new(timestamp))
        .and(ApplyDeletes::new());
    let mut scanner = store.scanner(filter);
    if !scanner.seek(&Cell::first_on_row(store.row().clone()))? {
        return Ok(Box::new(EmptyScanner));
    }
    Ok(Box::new(scanner))
}
