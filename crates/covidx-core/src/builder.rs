//! Index maintenance for one row-update event.
//!
//! [`IndexBuilder`] runs the codec for every registered group a mutation
//! touches and turns the result into index-table operations:
//!
//! 1. A store holding the persisted cells plus the mutation yields the new key.
//! 2. A store holding only the persisted cells yields the key currently in the
//!    index table.
//! 3. A changed, non-null old key is deleted; a non-null new key is written.

use bytes::Bytes;

use crate::cell::Cell;
use crate::codec::CoveredColumnIndexCodec;
use crate::error::Result;
use crate::group::ColumnGroup;
use crate::mutation::Mutation;
use crate::projection::{IndexWrite, IndexWriteLayout};
use crate::store::RowVersionStore;

/// Operation against an index table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexUpdate {
    /// Write a new index row.
    Put {
        /// Index table receiving the write.
        table: String,
        /// Row and provenance columns.
        write: IndexWrite,
    },
    /// Remove an index row that no longer describes the data row.
    Delete {
        /// Index table holding the stale row.
        table: String,
        /// Composite key of the stale row.
        row: Bytes,
        /// Delete timestamp.
        timestamp: u64,
    },
}

impl IndexUpdate {
    /// Index table the operation targets.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::Put { table, .. } | Self::Delete { table, .. } => table,
        }
    }

    /// Composite key the operation targets.
    #[must_use]
    pub fn row(&self) -> &Bytes {
        match self {
            Self::Put { write, .. } => &write.row,
            Self::Delete { row, .. } => row,
        }
    }
}

/// Computes index updates for the registered column groups of a table.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    groups: Vec<ColumnGroup>,
    layout: IndexWriteLayout,
}

impl IndexBuilder {
    /// Creates a builder for `groups`, projecting writes with `layout`.
    #[must_use]
    pub fn new(groups: Vec<ColumnGroup>, layout: IndexWriteLayout) -> Self {
        Self { groups, layout }
    }

    /// Registered groups, in registration order.
    #[must_use]
    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    /// Index updates caused by applying `mutation` on top of `persisted`.
    ///
    /// The new state is resolved as of `timestamp`; every update is stamped
    /// with it. Groups the mutation does not touch produce nothing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::RowMismatch`] if a persisted cell belongs to
    /// another row, and propagates codec errors.
    pub fn build(
        &self,
        persisted: &[Cell],
        mutation: &Mutation,
        timestamp: u64,
    ) -> Result<Vec<IndexUpdate>> {
        let row = mutation.row().clone();
        let current = RowVersionStore::from_row(row.clone(), persisted.iter().cloned(), mutation)?;
        let mut previous = RowVersionStore::new(row);
        previous.merge(persisted.iter().cloned(), std::iter::empty::<Cell>())?;

        let mut updates = Vec::new();
        for group in &self.groups {
            if !mutation.touches(group.columns()) {
                tracing::debug!(table = group.table(), "mutation does not touch group");
                continue;
            }

            let new_key = CoveredColumnIndexCodec::new(&current, group).index_row_key(timestamp)?;
            let old_key = CoveredColumnIndexCodec::new(&previous, group).index_row_key(timestamp)?;

            if old_key.key != new_key.key && !old_key.is_all_null()? {
                updates.push(IndexUpdate::Delete {
                    table: group.table().to_string(),
                    row: Bytes::from(old_key.key),
                    timestamp,
                });
            }
            if new_key.is_all_null()? {
                tracing::debug!(table = group.table(), "all covered values null, no index row");
                continue;
            }
            let write = IndexWrite::project(&new_key, &self.layout, timestamp)?;
            tracing::debug!(
                table = group.table(),
                columns = write.columns.len(),
                key = %hex::encode(&write.row),
                "index row computed"
            );
            updates.push(IndexUpdate::Put {
                table: group.table().to_string(),
                write,
            });
        }
        Ok(updates)
    }
}
