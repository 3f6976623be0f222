//! Versioned cell model.
//!
//! A [`Cell`] is one `(row, family, qualifier, timestamp, kind, value)` entry
//! of a multi-versioned, column-family-organized row. Cells are compared with
//! [`Cell::key_cmp`], which orders them the way the row store iterates:
//!
//! ```text
//! row asc | family asc | qualifier asc | timestamp DESC | kind (deletes first)
//! ```
//!
//! The value never takes part in the ordering. Two cells at the same
//! coordinate with different values compare equal; the store keeps the one
//! inserted first.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Type of a cell.
///
/// Declaration order is the sort order at a single coordinate: delete markers
/// come before puts so a forward scan sees a tombstone before the values it
/// shadows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Deletes every qualifier of the family at or below the timestamp.
    DeleteFamily,
    /// Deletes every version of one qualifier at or below the timestamp.
    DeleteColumn,
    /// Deletes the single version at exactly the timestamp.
    DeleteExact,
    /// Regular value.
    Put,
}

impl CellKind {
    /// Returns true for any delete marker.
    #[must_use]
    pub const fn is_delete(self) -> bool {
        !matches!(self, Self::Put)
    }
}

/// One versioned entry of a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Row key.
    pub row: Bytes,
    /// Column family.
    pub family: Bytes,
    /// Column qualifier (empty for family delete markers).
    pub qualifier: Bytes,
    /// Version timestamp.
    pub timestamp: u64,
    /// Put or delete marker.
    pub kind: CellKind,
    /// Cell payload (empty for delete markers).
    pub value: Bytes,
}

impl Cell {
    /// Creates a cell from its parts.
    #[must_use]
    pub fn new(
        row: impl Into<Bytes>,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        timestamp: u64,
        kind: CellKind,
        value: impl Into<Bytes>,
    ) -> Self {
        Self {
            row: row.into(),
            family: family.into(),
            qualifier: qualifier.into(),
            timestamp,
            kind,
            value: value.into(),
        }
    }

    /// Creates a put.
    #[must_use]
    pub fn put(
        row: impl Into<Bytes>,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        timestamp: u64,
        value: impl Into<Bytes>,
    ) -> Self {
        Self::new(row, family, qualifier, timestamp, CellKind::Put, value)
    }

    /// Creates a marker deleting the version of `qualifier` at exactly `timestamp`.
    #[must_use]
    pub fn delete_exact(
        row: impl Into<Bytes>,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        timestamp: u64,
    ) -> Self {
        Self::new(
            row,
            family,
            qualifier,
            timestamp,
            CellKind::DeleteExact,
            Bytes::new(),
        )
    }

    /// Creates a marker deleting every version of `qualifier` up to `timestamp`.
    #[must_use]
    pub fn delete_column(
        row: impl Into<Bytes>,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        timestamp: u64,
    ) -> Self {
        Self::new(
            row,
            family,
            qualifier,
            timestamp,
            CellKind::DeleteColumn,
            Bytes::new(),
        )
    }

    /// Creates a marker deleting the whole family up to `timestamp`.
    ///
    /// The qualifier is empty so the marker sorts ahead of every qualifier
    /// of the family.
    #[must_use]
    pub fn delete_family(row: impl Into<Bytes>, family: impl Into<Bytes>, timestamp: u64) -> Self {
        Self::new(
            row,
            family,
            Bytes::new(),
            timestamp,
            CellKind::DeleteFamily,
            Bytes::new(),
        )
    }

    /// Smallest possible cell at `(row, family)`, used as a seek target.
    #[must_use]
    pub fn first_on_row_family(row: impl Into<Bytes>, family: impl Into<Bytes>) -> Self {
        Self::new(
            row,
            family,
            Bytes::new(),
            u64::MAX,
            CellKind::DeleteFamily,
            Bytes::new(),
        )
    }

    /// Smallest possible cell of `row`.
    #[must_use]
    pub fn first_on_row(row: impl Into<Bytes>) -> Self {
        Self::first_on_row_family(row, Bytes::new())
    }

    /// Returns true for any delete marker.
    #[must_use]
    pub const fn is_delete(&self) -> bool {
        self.kind.is_delete()
    }

    /// Returns true for a family-wide delete marker.
    #[must_use]
    pub fn is_delete_family(&self) -> bool {
        self.kind == CellKind::DeleteFamily
    }

    /// Compares the coordinates of two cells in store iteration order.
    ///
    /// Timestamps sort descending so the newest version of a qualifier is
    /// met first.
    #[must_use]
    pub fn key_cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.family.cmp(&other.family))
            .then_with(|| self.qualifier.cmp(&other.qualifier))
            .then_with(|| other.timestamp.cmp(&self.timestamp))
            .then_with(|| self.kind.cmp(&other.kind))
    }

    /// Returns true if both cells address the same family and qualifier.
    #[must_use]
    pub fn same_column(&self, other: &Self) -> bool {
        self.family == other.family && self.qualifier == other.qualifier
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{}/{}/{:?}",
            String::from_utf8_lossy(&self.row),
            String::from_utf8_lossy(&self.family),
            String::from_utf8_lossy(&self.qualifier),
            self.timestamp,
            self.kind
        )
    }
}
