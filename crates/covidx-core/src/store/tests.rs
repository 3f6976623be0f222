//! Tests for `RowVersionStore`.

use super::*;
use crate::cell::{Cell, CellKind};
use crate::column::CoveredColumn;
use crate::mutation::Mutation;

fn drain<S: Scanner>(scanner: &mut S) -> Vec<Cell> {
    let mut out = Vec::new();
    while let Some(cell) = scanner.next().expect("scan") {
        out.push(cell);
    }
    out
}

#[test]
fn test_new_store_is_empty() {
    let store = RowVersionStore::new("r");

    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert_eq!(store.row().as_ref(), b"r");
}

#[test]
fn test_add_keeps_total_order() {
    // Arrange - insert deliberately out of order
    let mut store = RowVersionStore::new("r");
    let cells = vec![
        Cell::put("r", "f", "q", 3, "B"),
        Cell::put("r", "g", "a", 1, "X"),
        Cell::put("r", "f", "q", 5, "A"),
        Cell::delete_family("r", "f", 2),
        Cell::delete_exact("r", "f", "q", 5),
    ];

    // Act
    for cell in cells {
        assert!(store.add(cell).expect("add"));
    }
    let scanned = drain(&mut store.scanner(AcceptAll));

    // Assert
    let rendered: Vec<String> = scanned.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "r/f:/2/DeleteFamily",
            "r/f:q/5/DeleteExact",
            "r/f:q/5/Put",
            "r/f:q/3/Put",
            "r/g:a/1/Put",
        ]
    );
}

#[test]
fn test_add_rejects_foreign_row() {
    let mut store = RowVersionStore::new("r");

    let err = store.add(Cell::put("other", "f", "q", 1, "v")).unwrap_err();

    assert_eq!(err.code(), "COVIDX-005");
    assert!(store.is_empty());
}

#[test]
fn test_duplicate_coordinate_keeps_first() {
    let mut store = RowVersionStore::new("r");

    assert!(store.add(Cell::put("r", "f", "q", 5, "first")).expect("add"));
    assert!(!store.add(Cell::put("r", "f", "q", 5, "second")).expect("add"));

    let scanned = drain(&mut store.scanner(AcceptAll));
    assert_eq!(scanned.len(), 1);
    assert_eq!(scanned[0].value.as_ref(), b"first");
}

#[test]
fn test_pending_cells_take_precedence_on_ties() {
    // Arrange
    let persisted = vec![Cell::put("r", "f", "q", 7, "old")];
    let mutation = Mutation::new("r").put("f", "q", 7, "new");

    // Act
    let store = RowVersionStore::from_row("r", persisted, &mutation).expect("store");

    // Assert
    let scanned = drain(&mut store.scanner(AcceptAll));
    assert_eq!(scanned.len(), 1);
    assert_eq!(scanned[0].value.as_ref(), b"new");
}

#[test]
fn test_merge_combines_both_sources() {
    let mut store = RowVersionStore::new("r");

    store
        .merge(
            vec![Cell::put("r", "f", "a", 1, "1")],
            vec![Cell::put("r", "f", "b", 2, "2")],
        )
        .expect("merge");

    assert_eq!(store.len(), 2);
}

#[test]
fn test_merge_fails_on_foreign_pending_cell() {
    let mut store = RowVersionStore::new("r");

    let result = store.merge(Vec::new(), vec![Cell::put("x", "f", "q", 1, "v")]);

    assert!(result.is_err());
}

#[test]
fn test_visible_cells_applies_deletes_and_ceiling() {
    // Arrange
    let persisted = vec![
        Cell::put("r", "f", "a", 5, "a5"),
        Cell::put("r", "f", "a", 3, "a3"),
        Cell::put("r", "f", "b", 4, "b4"),
        Cell::put("r", "f", "c", 9, "c9"),
        Cell::put("r", "g", "z", 1, "z1"),
    ];
    let mutation = Mutation::new("r").delete_column("f", "b", 4);
    let store = RowVersionStore::from_row("r", persisted, &mutation).expect("store");
    let columns = vec![CoveredColumn::all_qualifiers("f").expect("column")];

    // Act
    let visible = store.visible_cells(&columns, 8).expect("visible");

    // Assert - b deleted, c newer than the ceiling, g not covered
    let values: Vec<&[u8]> = visible.iter().map(|c| c.value.as_ref()).collect();
    assert_eq!(values, vec![&b"a5"[..], &b"a3"[..]]);
    assert!(visible.iter().all(|c| c.kind == CellKind::Put));
}

#[test]
fn test_visible_cells_empty_store() {
    let store = RowVersionStore::new("r");
    let columns = vec![CoveredColumn::exact("f", "q").expect("column")];

    let visible = store.visible_cells(&columns, u64::MAX).expect("visible");

    assert!(visible.is_empty());
}
