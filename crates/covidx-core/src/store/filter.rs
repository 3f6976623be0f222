//! Composable cell predicates for store scanners.
//!
//! Filters are applied in sequence: with `a.and(b)`, `b` only sees cells that
//! `a` accepted. Stateful filters such as [`ApplyDeletes`] rely on seeing
//! cells in store order and are reset when their scanner seeks backwards.
//!
//! ```rust
//! use covidx_core::store::{CellFilter, FamilyOnly, MaxTimestamp};
//! use covidx_core::Cell;
//!
//! let mut filter = MaxTimestamp::new(10).and(FamilyOnly::new("f"));
//! assert!(filter.accept(&Cell::put("r", "f", "q", 5, "v")));
//! assert!(!filter.accept(&Cell::put("r", "f", "q", 11, "v")));
//! assert!(!filter.accept(&Cell::put("r", "g", "q", 5, "v")));
//! ```

use bytes::Bytes;

use crate::cell::{Cell, CellKind};
use crate::column::CoveredColumn;

/// Predicate deciding which cells a scanner yields.
pub trait CellFilter {
    /// Returns true if the cell should be yielded.
    fn accept(&mut self, cell: &Cell) -> bool;

    /// Clears any state accumulated from previously seen cells.
    fn reset(&mut self) {}

    /// Chains `next` after this filter.
    fn and<G: CellFilter>(self, next: G) -> And<Self, G>
    where
        Self: Sized,
    {
        And {
            first: self,
            second: next,
        }
    }
}

impl<F: CellFilter + ?Sized> CellFilter for Box<F> {
    fn accept(&mut self, cell: &Cell) -> bool {
        (**self).accept(cell)
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Accepts every cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl CellFilter for AcceptAll {
    fn accept(&mut self, _cell: &Cell) -> bool {
        true
    }
}

/// Sequential conjunction of two filters.
#[derive(Debug, Clone)]
pub struct And<A, B> {
    first: A,
    second: B,
}

impl<A: CellFilter, B: CellFilter> CellFilter for And<A, B> {
    fn accept(&mut self, cell: &Cell) -> bool {
        self.first.accept(cell) && self.second.accept(cell)
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }
}

/// Hides cells newer than a timestamp ceiling.
#[derive(Debug, Clone, Copy)]
pub struct MaxTimestamp {
    ceiling: u64,
}

impl MaxTimestamp {
    /// Accepts cells with `timestamp <= ceiling`.
    #[must_use]
    pub const fn new(ceiling: u64) -> Self {
        Self { ceiling }
    }
}

impl CellFilter for MaxTimestamp {
    fn accept(&mut self, cell: &Cell) -> bool {
        cell.timestamp <= self.ceiling
    }
}

/// Accepts cells of a single family.
#[derive(Debug, Clone)]
pub struct FamilyOnly {
    family: Bytes,
}

impl FamilyOnly {
    /// Accepts cells whose family equals `family`.
    #[must_use]
    pub fn new(family: impl Into<Bytes>) -> Self {
        Self {
            family: family.into(),
        }
    }
}

impl CellFilter for FamilyOnly {
    fn accept(&mut self, cell: &Cell) -> bool {
        cell.family == self.family
    }
}

/// Accepts cells addressing any of a set of covered columns, plus family
/// delete markers of their families.
#[derive(Debug, Clone)]
pub struct ColumnFilter {
    columns: Vec<CoveredColumn>,
}

impl ColumnFilter {
    /// Accepts cells matched by at least one of `columns`.
    #[must_use]
    pub fn new(columns: &[CoveredColumn]) -> Self {
        Self {
            columns: columns.to_vec(),
        }
    }
}

impl CellFilter for ColumnFilter {
    fn accept(&mut self, cell: &Cell) -> bool {
        self.columns.iter().any(|column| column.matches(cell))
    }
}

/// Applies delete markers: hides every marker and the puts it shadows.
///
/// - a family delete at `t` hides the family's puts at or below `t`
/// - a column delete at `t` hides the qualifier's puts at or below `t`
/// - an exact delete at `t` hides the qualifier's put at exactly `t`
///
/// Markers always precede the puts they shadow in store order, so a single
/// forward pass is enough.
#[derive(Debug, Clone, Default)]
pub struct ApplyDeletes {
    family: Option<Bytes>,
    family_delete: Option<u64>,
    qualifier: Option<Bytes>,
    column_delete: Option<u64>,
    exact_deletes: Vec<u64>,
}

impl ApplyDeletes {
    /// Creates a filter with no recorded markers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn track_position(&mut self, cell: &Cell) {
        if self.family.as_ref() != Some(&cell.family) {
            self.family = Some(cell.family.clone());
            self.family_delete = None;
            self.qualifier = None;
        }
        if self.qualifier.as_ref() != Some(&cell.qualifier) {
            self.qualifier = Some(cell.qualifier.clone());
            self.column_delete = None;
            self.exact_deletes.clear();
        }
    }

    fn is_shadowed(&self, timestamp: u64) -> bool {
        self.family_delete.is_some_and(|ts| timestamp <= ts)
            || self.column_delete.is_some_and(|ts| timestamp <= ts)
            || self.exact_deletes.contains(&timestamp)
    }
}

impl CellFilter for ApplyDeletes {
    fn accept(&mut self, cell: &Cell) -> bool {
        self.track_position(cell);
        match cell.kind {
            CellKind::DeleteFamily => {
                self.family_delete = Some(self.family_delete.map_or(cell.timestamp, |ts| {
                    ts.max(cell.timestamp)
                }));
                false
            }
            CellKind::DeleteColumn => {
                self.column_delete = Some(self.column_delete.map_or(cell.timestamp, |ts| {
                    ts.max(cell.timestamp)
                }));
                false
            }
            CellKind::DeleteExact => {
                self.exact_deletes.push(cell.timestamp);
                false
            }
            CellKind::Put => !self.is_shadowed(cell.timestamp),
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
