//! Index-table write projection.
//!
//! Turns a composite key and its slot provenance into a sparse index row:
//! the key is the row, and each slot contributes one empty-valued column
//! under a fixed family:
//!
//! ```text
//! row       = composite key
//! family    = ROW
//! qualifier = [ordinal: u8][covered family][separator][covered qualifier]
//! value     = <empty>
//! ```
//!
//! The payload already lives in the key; the columns only record which
//! covered column produced each slot.

use bytes::Bytes;

use crate::cell::{Cell, CellKind};
use crate::codec::{self, IndexRowKey};
use crate::error::{Error, Result};

/// Default family of index-table columns.
pub const INDEX_ROW_FAMILY: &str = "ROW";

/// Default separator between covered family and qualifier.
pub const DEFAULT_QUALIFIER_SEPARATOR: u8 = b':';

/// Family and separator used when projecting index writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexWriteLayout {
    /// Family holding the provenance columns.
    pub family: Bytes,
    /// Byte placed between covered family and qualifier.
    pub separator: u8,
}

impl Default for IndexWriteLayout {
    fn default() -> Self {
        Self {
            family: Bytes::from_static(INDEX_ROW_FAMILY.as_bytes()),
            separator: DEFAULT_QUALIFIER_SEPARATOR,
        }
    }
}

/// One provenance column of an index write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    /// `ordinal ‖ family ‖ separator ‖ qualifier`.
    pub qualifier: Bytes,
    /// Always empty.
    pub value: Bytes,
}

impl IndexColumn {
    /// Slot position this column describes.
    #[must_use]
    pub fn ordinal(&self) -> Option<u8> {
        self.qualifier.first().copied()
    }
}

/// Sparse write destined for an index table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexWrite {
    /// Composite key.
    pub row: Bytes,
    /// Family of every column.
    pub family: Bytes,
    /// One column per slot, in slot order.
    pub columns: Vec<IndexColumn>,
    /// Timestamp stamped on every column.
    pub timestamp: u64,
}

impl IndexWrite {
    /// Projects a composite key and its provenance into an index write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if the key holds more slots than a one
    /// byte ordinal can address.
    pub fn project(key: &IndexRowKey, layout: &IndexWriteLayout, timestamp: u64) -> Result<Self> {
        let columns = key
            .columns
            .iter()
            .enumerate()
            .map(|(ordinal, column)| {
                let ordinal = u8::try_from(ordinal).map_err(|_| {
                    Error::Overflow(format!("slot ordinal {ordinal} exceeds one byte"))
                })?;
                let mut qualifier = vec![ordinal];
                qualifier.extend_from_slice(&column.index_qualifier(layout.separator));
                Ok(IndexColumn {
                    qualifier: qualifier.into(),
                    value: Bytes::new(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            row: Bytes::copy_from_slice(&key.key),
            family: layout.family.clone(),
            columns,
            timestamp,
        })
    }

    /// Returns true if no slot of the key carries a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the row is not a composite key.
    pub fn is_all_null(&self) -> Result<bool> {
        codec::all_values_null(&self.row)
    }

    /// Renders the write as put cells for a cell sink.
    #[must_use]
    pub fn to_cells(&self) -> Vec<Cell> {
        self.columns
            .iter()
            .map(|column| {
                Cell::new(
                    self.row.clone(),
                    self.family.clone(),
                    column.qualifier.clone(),
                    self.timestamp,
                    CellKind::Put,
                    column.value.clone(),
                )
            })
            .collect()
    }
}
