//! Row fixtures: one row's persisted cells plus a pending mutation, as JSON.
//!
//! ```json
//! {
//!   "row": "user-1",
//!   "persisted": [
//!     { "family": "info", "qualifier": "name", "timestamp": 5, "value": "alice" }
//!   ],
//!   "mutation": [
//!     { "family": "info", "qualifier": "name", "timestamp": 9, "kind": "delete_column" }
//!   ]
//! }
//! ```
//!
//! `kind` defaults to `put`; `qualifier` and `value` default to empty.

use anyhow::{Context, Result};
use covidx_core::{Cell, CellKind, Mutation, RowVersionStore};
use serde::Deserialize;
use std::path::Path;

/// One cell of a fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureCell {
    pub family: String,
    #[serde(default)]
    pub qualifier: String,
    pub timestamp: u64,
    #[serde(default = "default_kind")]
    pub kind: CellKind,
    #[serde(default)]
    pub value: String,
}

fn default_kind() -> CellKind {
    CellKind::Put
}

/// Row state loaded from a fixture file.
#[derive(Debug, Clone, Deserialize)]
pub struct RowFixture {
    pub row: String,
    #[serde(default)]
    pub persisted: Vec<FixtureCell>,
    #[serde(default)]
    pub mutation: Vec<FixtureCell>,
}

impl RowFixture {
    /// Reads and parses a fixture file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid fixture {}", path.display()))
    }

    /// Parses fixture JSON.
    pub fn parse(raw: &str) -> Result<Self> {
        let fixture: Self = serde_json::from_str(raw)?;
        if fixture.row.is_empty() {
            anyhow::bail!("fixture row must not be empty");
        }
        Ok(fixture)
    }

    /// Persisted cells, stamped with the fixture row.
    pub fn persisted_cells(&self) -> Vec<Cell> {
        self.persisted.iter().map(|cell| self.cell(cell)).collect()
    }

    /// Pending mutation.
    pub fn mutation(&self) -> Result<Mutation> {
        let mut mutation = Mutation::new(self.row.clone());
        for cell in &self.mutation {
            mutation.add_cell(self.cell(cell))?;
        }
        Ok(mutation)
    }

    /// Store holding persisted and pending cells.
    pub fn store(&self) -> Result<RowVersionStore> {
        let store =
            RowVersionStore::from_row(self.row.clone(), self.persisted_cells(), &self.mutation()?)?;
        Ok(store)
    }

    fn cell(&self, cell: &FixtureCell) -> Cell {
        Cell::new(
            self.row.clone(),
            cell.family.clone(),
            cell.qualifier.clone(),
            cell.timestamp,
            cell.kind,
            cell.value.clone(),
        )
    }
}
