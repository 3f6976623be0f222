//! Covered-column index codec.
//!
//! For one [`ColumnGroup`] and one row, resolves the single most recent
//! visible value of every covered column as of a timestamp ceiling and packs
//! the values, plus the row's primary key, into one composite key (see
//! [`key`] for the byte layout).
//!
//! # Resolution
//!
//! Each covered column is resolved with its own scanner restricted to the
//! column's family and the ceiling:
//!
//! - no cell in the family: one empty slot
//! - a family delete: one empty slot, nothing else from the family
//! - exact qualifier: the first matching cell wins (empty if it is a delete)
//! - wildcard: one slot per distinct qualifier, first occurrence wins
//!
//! "First occurrence wins" holds because the store iterates each qualifier
//! newest first with delete markers ahead of puts.
//!
//! An empty slot cannot be told apart from a column holding an empty value;
//! both encode as a zero-length slot.

pub mod key;

#[cfg(test)]
mod tests;

pub use key::{all_values_null, compose, decode, decode_with_primary_key, slot_count};

use bytes::Bytes;

use crate::cell::Cell;
use crate::column::CoveredColumn;
use crate::error::Result;
use crate::group::ColumnGroup;
use crate::projection::{IndexWrite, IndexWriteLayout};
use crate::store::{CellFilter, FamilyOnly, MaxTimestamp, RowVersionStore, Scanner};

/// One resolved value and the covered column it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlot {
    /// Visible value, empty when nothing is visible.
    pub value: Bytes,
    /// Covered column owning the slot.
    pub column: CoveredColumn,
}

impl ResolvedSlot {
    fn new(value: Bytes, column: &CoveredColumn) -> Self {
        Self {
            value,
            column: column.clone(),
        }
    }

    fn null(column: &CoveredColumn) -> Self {
        Self::new(Bytes::new(), column)
    }

    /// Returns true if the slot carries no value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_empty()
    }
}

/// Composite key plus the covered column behind each slot, in slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRowKey {
    /// Encoded composite key.
    pub key: Vec<u8>,
    /// Provenance of each slot.
    pub columns: Vec<CoveredColumn>,
}

impl IndexRowKey {
    /// Returns true if every slot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`](crate::error::Error::Format) if the key is malformed.
    pub fn is_all_null(&self) -> Result<bool> {
        all_values_null(&self.key)
    }
}

/// Builds index keys for one column group over one row's versions.
///
/// Construct a fresh codec per row-update event; it only borrows the store
/// and the group.
#[derive(Debug, Clone)]
pub struct CoveredColumnIndexCodec<'a> {
    store: &'a RowVersionStore,
    group: &'a ColumnGroup,
    layout: IndexWriteLayout,
}

impl<'a> CoveredColumnIndexCodec<'a> {
    /// Creates a codec using the default index write layout.
    #[must_use]
    pub fn new(store: &'a RowVersionStore, group: &'a ColumnGroup) -> Self {
        Self {
            store,
            group,
            layout: IndexWriteLayout::default(),
        }
    }

    /// Overrides the index write layout.
    #[must_use]
    pub fn with_layout(mut self, layout: IndexWriteLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Primary key of the indexed row.
    #[must_use]
    pub fn primary_key(&self) -> &Bytes {
        self.store.row()
    }

    /// Resolves every covered column of the group as of `timestamp`.
    ///
    /// Every covered column contributes at least one slot.
    ///
    /// # Errors
    ///
    /// Propagates scanner errors; no partial result is returned.
    pub fn resolve(&self, timestamp: u64) -> Result<Vec<ResolvedSlot>> {
        let mut slots = Vec::with_capacity(self.group.len());
        for column in self.group {
            let filter = MaxTimestamp::new(timestamp).and(FamilyOnly::new(column.family().clone()));
            let mut scanner = self.store.scanner(filter);
            resolve_column(&mut scanner, self.store.row(), column, &mut slots)?;
        }
        tracing::debug!(
            table = self.group.table(),
            timestamp,
            slots = slots.len(),
            "resolved column group"
        );
        Ok(slots)
    }

    /// Composite key for the row as of `timestamp`.
    ///
    /// # Errors
    ///
    /// Propagates resolution errors and key length overflows.
    pub fn index_row_key(&self, timestamp: u64) -> Result<IndexRowKey> {
        let slots = self.resolve(timestamp)?;
        let values: Vec<&[u8]> = slots.iter().map(|slot| slot.value.as_ref()).collect();
        let key = compose(self.primary_key(), &values)?;
        Ok(IndexRowKey {
            key,
            columns: slots.into_iter().map(|slot| slot.column).collect(),
        })
    }

    /// Composite key for the newest state of the row.
    ///
    /// # Errors
    ///
    /// See [`CoveredColumnIndexCodec::index_row_key`].
    pub fn index_row_key_latest(&self) -> Result<IndexRowKey> {
        self.index_row_key(u64::MAX)
    }

    /// Index write for the newest state of the row, stamped with `timestamp`.
    ///
    /// # Errors
    ///
    /// Propagates key and projection errors.
    pub fn put_to_index(&self, timestamp: u64) -> Result<IndexWrite> {
        let key = self.index_row_key_latest()?;
        IndexWrite::project(&key, &self.layout, timestamp)
    }
}

/// Resolves one covered column from `scanner`, appending its slots.
///
/// The scanner must yield cells in store order; only cells of the column's
/// family are considered and the scan stops at the end of the family.
pub(crate) fn resolve_column<S: Scanner + ?Sized>(
    scanner: &mut S,
    row: &Bytes,
    column: &CoveredColumn,
    slots: &mut Vec<ResolvedSlot>,
) -> Result<()> {
    let start = slots.len();
    // seek to the family rather than the qualifier so a family delete is seen
    let target = Cell::first_on_row_family(row.clone(), column.family().clone());
    if !scanner.seek(&target)? {
        slots.push(ResolvedSlot::null(column));
        return Ok(());
    }

    let mut last_qualifier: Option<Bytes> = None;
    while let Some(cell) = scanner.next()? {
        if !column.matches_family(&cell.family) {
            break;
        }
        debug_assert!(
            last_qualifier
                .as_ref()
                .map_or(true, |last| *last <= cell.qualifier),
            "cells out of order: {cell} after qualifier {last_qualifier:?}"
        );

        if cell.is_delete_family() {
            if slots.len() == start {
                slots.push(ResolvedSlot::null(column));
            }
            break;
        }
        if !column.matches_qualifier(&cell.qualifier) {
            continue;
        }

        let value = if cell.is_delete() {
            Bytes::new()
        } else {
            cell.value.clone()
        };

        if !column.is_wildcard() {
            tracing::trace!(%column, %cell, "resolved exact column");
            slots.push(ResolvedSlot::new(value, column));
            return Ok(());
        }
        if last_qualifier.as_ref() != Some(&cell.qualifier) {
            tracing::trace!(%column, %cell, "resolved wildcard qualifier");
            slots.push(ResolvedSlot::new(value, column));
        }
        last_qualifier = Some(cell.qualifier);
    }

    if slots.len() == start {
        slots.push(ResolvedSlot::null(column));
    }
    Ok(())
}
