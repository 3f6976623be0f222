//! Tests for the covered-column codec.

use bytes::Bytes;

use super::*;
use crate::cell::Cell;
use crate::error::Error;
use crate::store::EmptyScanner;

fn store_with(cells: Vec<Cell>) -> RowVersionStore {
    let mut store = RowVersionStore::new("r");
    for cell in cells {
        store.add(cell).expect("add");
    }
    store
}

fn group(columns: &[&str]) -> ColumnGroup {
    let columns = columns
        .iter()
        .map(|spec| CoveredColumn::parse(spec).expect("column"))
        .collect();
    ColumnGroup::new("idx", columns).expect("group")
}

fn values(slots: &[ResolvedSlot]) -> Vec<String> {
    slots
        .iter()
        .map(|slot| String::from_utf8_lossy(&slot.value).into_owned())
        .collect()
}

#[test]
fn test_exact_qualifier_resolution_respects_ceiling() {
    // Arrange
    let store = store_with(vec![
        Cell::put("r", "f", "q", 5, "A"),
        Cell::put("r", "f", "q", 3, "B"),
    ]);
    let group = group(&["f:q"]);
    let codec = CoveredColumnIndexCodec::new(&store, &group);

    // Act & Assert
    assert_eq!(values(&codec.resolve(10).expect("resolve")), vec!["A"]);
    assert_eq!(values(&codec.resolve(4).expect("resolve")), vec!["B"]);
    assert_eq!(values(&codec.resolve(2).expect("resolve")), vec![""]);
}

#[test]
fn test_exact_delete_shadows_older_put() {
    let store = store_with(vec![
        Cell::delete_exact("r", "f", "q", 5),
        Cell::put("r", "f", "q", 3, "B"),
    ]);
    let group = group(&["f:q"]);

    let slots = CoveredColumnIndexCodec::new(&store, &group)
        .resolve(10)
        .expect("resolve");

    assert_eq!(slots.len(), 1);
    assert!(slots[0].is_null());
}

#[test]
fn test_family_delete_dominates_wildcard() {
    let store = store_with(vec![
        Cell::put("r", "f", "q1", 5, "A"),
        Cell::delete_family("r", "f", 6),
    ]);
    let group = group(&["f:"]);

    let slots = CoveredColumnIndexCodec::new(&store, &group)
        .resolve(10)
        .expect("resolve");

    assert_eq!(values(&slots), vec![""]);
}

#[test]
fn test_family_delete_dominates_exact_column() {
    let store = store_with(vec![
        Cell::put("r", "f", "q", 5, "A"),
        Cell::delete_family("r", "f", 6),
    ]);
    let group = group(&["f:q"]);

    let slots = CoveredColumnIndexCodec::new(&store, &group)
        .resolve(10)
        .expect("resolve");

    assert_eq!(values(&slots), vec![""]);
}

#[test]
fn test_family_delete_above_ceiling_is_invisible() {
    let store = store_with(vec![
        Cell::put("r", "f", "q", 5, "A"),
        Cell::delete_family("r", "f", 6),
    ]);
    let group = group(&["f:"]);

    let slots = CoveredColumnIndexCodec::new(&store, &group)
        .resolve(5)
        .expect("resolve");

    assert_eq!(values(&slots), vec!["A"]);
}

#[test]
fn test_wildcard_yields_one_slot_per_qualifier() {
    // Arrange - the older q1 version must be suppressed
    let store = store_with(vec![
        Cell::put("r", "f", "q1", 5, "A"),
        Cell::put("r", "f", "q2", 4, "B"),
        Cell::put("r", "f", "q1", 2, "C"),
    ]);
    let group = group(&["f:"]);

    // Act
    let slots = CoveredColumnIndexCodec::new(&store, &group)
        .resolve(10)
        .expect("resolve");

    // Assert
    assert_eq!(values(&slots), vec!["A", "B"]);
    assert!(slots.iter().all(|slot| slot.column.is_wildcard()));
}

#[test]
fn test_wildcard_column_delete_yields_empty_slot_for_qualifier() {
    let store = store_with(vec![
        Cell::delete_column("r", "f", "q1", 7),
        Cell::put("r", "f", "q1", 5, "A"),
        Cell::put("r", "f", "q2", 4, "B"),
    ]);
    let group = group(&["f:"]);

    let slots = CoveredColumnIndexCodec::new(&store, &group)
        .resolve(10)
        .expect("resolve");

    assert_eq!(values(&slots), vec!["", "B"]);
}

#[test]
fn test_empty_family_yields_single_empty_slot() {
    let store = store_with(vec![Cell::put("r", "other", "q", 1, "x")]);

    for spec in ["f:q", "f:"] {
        let group = group(&[spec]);
        let slots = CoveredColumnIndexCodec::new(&store, &group)
            .resolve(u64::MAX)
            .expect("resolve");

        assert_eq!(slots.len(), 1, "column {spec}");
        assert!(slots[0].is_null(), "column {spec}");
    }
}

#[test]
fn test_exact_column_ignores_sibling_qualifiers() {
    let store = store_with(vec![
        Cell::put("r", "f", "a", 3, "sibling"),
        Cell::put("r", "f", "b", 3, "sibling"),
        Cell::put("r", "f", "q", 2, "wanted"),
    ]);
    let group = group(&["f:q"]);

    let slots = CoveredColumnIndexCodec::new(&store, &group)
        .resolve(10)
        .expect("resolve");

    assert_eq!(values(&slots), vec!["wanted"]);
}

#[test]
fn test_group_order_is_independent_of_insertion_order() {
    // Arrange
    let cells = vec![
        Cell::put("r", "f2", "b", 1, "f2-b"),
        Cell::put("r", "f1", "q1", 1, "f1-q1"),
        Cell::put("r", "f2", "a", 1, "f2-a"),
    ];
    let mut reversed = cells.clone();
    reversed.reverse();
    let group = group(&["f1:q1", "f2:"]);

    // Act
    let forward = CoveredColumnIndexCodec::new(&store_with(cells), &group)
        .index_row_key_latest()
        .expect("key");
    let backward = CoveredColumnIndexCodec::new(&store_with(reversed), &group)
        .index_row_key_latest()
        .expect("key");

    // Assert
    assert_eq!(forward, backward);
    assert_eq!(
        decode(&forward.key).expect("decode"),
        vec!["f1-q1", "f2-a", "f2-b"]
    );
    assert_eq!(forward.columns[0], CoveredColumn::exact("f1", "q1").expect("column"));
    assert!(forward.columns[1..].iter().all(CoveredColumn::is_wildcard));
}

#[test]
fn test_index_row_key_embeds_primary_key() {
    let store = store_with(vec![Cell::put("r", "f", "q", 1, "v")]);
    let group = group(&["f:q", "g:"]);

    let key = CoveredColumnIndexCodec::new(&store, &group)
        .index_row_key(1)
        .expect("key");

    let (values, primary_key) = decode_with_primary_key(&key.key).expect("decode");
    assert_eq!(values, vec!["v", ""]);
    assert_eq!(primary_key, "r");
    assert!(!key.is_all_null().expect("null check"));
}

#[test]
fn test_index_row_key_all_null_for_empty_row() {
    let store = RowVersionStore::new("r");
    let group = group(&["f:q", "g:"]);

    let key = CoveredColumnIndexCodec::new(&store, &group)
        .index_row_key_latest()
        .expect("key");

    assert!(key.is_all_null().expect("null check"));
    assert_eq!(key.columns.len(), 2);
}

#[test]
fn test_put_to_index_uses_latest_state() {
    // Arrange
    let store = store_with(vec![
        Cell::put("r", "f", "q", 9, "new"),
        Cell::put("r", "f", "q", 1, "old"),
    ]);
    let group = group(&["f:q"]);
    let codec = CoveredColumnIndexCodec::new(&store, &group);

    // Act
    let write = codec.put_to_index(3).expect("write");

    // Assert
    assert_eq!(decode(&write.row).expect("decode"), vec!["new"]);
    assert_eq!(write.timestamp, 3);
    assert_eq!(write.family, "ROW");
    assert_eq!(write.columns.len(), 1);
    assert_eq!(write.columns[0].qualifier.as_ref(), b"\x00f:q");
}

#[test]
fn test_custom_layout_is_applied() {
    let store = store_with(vec![Cell::put("r", "f", "q", 1, "v")]);
    let group = group(&["f:"]);
    let layout = crate::projection::IndexWriteLayout {
        family: Bytes::from_static(b"IDX"),
        separator: b'|',
    };

    let write = CoveredColumnIndexCodec::new(&store, &group)
        .with_layout(layout)
        .put_to_index(1)
        .expect("write");

    assert_eq!(write.family, "IDX");
    assert_eq!(write.columns[0].qualifier.as_ref(), b"\x00f|");
}

/// Scanner failing after a configurable number of successful calls.
struct FailingScanner {
    remaining: usize,
}

impl Scanner for FailingScanner {
    fn seek(&mut self, _target: &Cell) -> crate::error::Result<bool> {
        self.tick()?;
        Ok(true)
    }

    fn next(&mut self) -> crate::error::Result<Option<Cell>> {
        self.tick()?;
        Ok(Some(Cell::put("r", "f", "q", 1, "v")))
    }

    fn peek(&mut self) -> crate::error::Result<Option<&Cell>> {
        Ok(None)
    }
}

impl FailingScanner {
    fn tick(&mut self) -> crate::error::Result<()> {
        if self.remaining == 0 {
            return Err(Error::Scan("cursor closed".to_string()));
        }
        self.remaining -= 1;
        Ok(())
    }
}

#[test]
fn test_scanner_error_on_seek_propagates() {
    let column = CoveredColumn::exact("f", "q").expect("column");
    let mut slots = Vec::new();

    let result = resolve_column(
        &mut FailingScanner { remaining: 0 },
        &Bytes::from_static(b"r"),
        &column,
        &mut slots,
    );

    assert!(matches!(result, Err(Error::Scan(_))));
}

#[test]
fn test_scanner_error_mid_scan_propagates() {
    // Arrange - seek succeeds, the wildcard keeps pulling until the cursor fails
    let column = CoveredColumn::all_qualifiers("f").expect("column");
    let mut slots = Vec::new();

    // Act
    let result = resolve_column(
        &mut FailingScanner { remaining: 3 },
        &Bytes::from_static(b"r"),
        &column,
        &mut slots,
    );

    // Assert
    let err = result.expect_err("scan must fail");
    assert_eq!(err.code(), "COVIDX-006");
    assert!(err.is_recoverable());
}

#[test]
fn test_empty_scanner_yields_null_slot() {
    let column = CoveredColumn::all_qualifiers("f").expect("column");
    let mut slots = Vec::new();

    resolve_column(
        &mut EmptyScanner,
        &Bytes::from_static(b"r"),
        &column,
        &mut slots,
    )
    .expect("resolve");

    assert_eq!(slots, vec![ResolvedSlot::null(&column)]);
}

/// Replays a fixed sequence of cells regardless of seek target.
struct ReplayScanner {
    cells: std::vec::IntoIter<Cell>,
}

impl Scanner for ReplayScanner {
    fn seek(&mut self, _target: &Cell) -> crate::error::Result<bool> {
        Ok(true)
    }

    fn next(&mut self) -> crate::error::Result<Option<Cell>> {
        Ok(self.cells.next())
    }

    fn peek(&mut self) -> crate::error::Result<Option<&Cell>> {
        Ok(None)
    }
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "cells out of order")]
fn test_wildcard_rejects_unsorted_qualifiers() {
    let column = CoveredColumn::all_qualifiers("f").expect("column");
    let mut scanner = ReplayScanner {
        cells: vec![
            Cell::put("r", "f", "q2", 5, "b"),
            Cell::put("r", "f", "q1", 5, "a"),
        ]
        .into_iter(),
    };
    let mut slots = Vec::new();

    let _ = resolve_column(&mut scanner, &Bytes::from_static(b"r"), &column, &mut slots);
}

#[test]
fn test_malformed_key_is_not_reported_all_null() {
    let key = IndexRowKey {
        key: vec![0, 1],
        columns: Vec::new(),
    };

    let err = key.is_all_null().expect_err("short key");
    assert_eq!(err.code(), "COVIDX-007");
}
