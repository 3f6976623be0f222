//! Tests for `scanner` module

use super::*;
use crate::cell::Cell;

fn sample_store() -> RowVersionStore {
    let mut store = RowVersionStore::new("r");
    for cell in [
        Cell::put("r", "a", "x", 1, "a-x"),
        Cell::put("r", "f", "q", 5, "f-q-5"),
        Cell::put("r", "f", "q", 3, "f-q-3"),
        Cell::put("r", "f", "r", 4, "f-r-4"),
        Cell::put("r", "g", "q", 2, "g-q"),
    ] {
        store.add(cell).expect("add");
    }
    store
}

fn value(cell: Option<Cell>) -> Option<String> {
    cell.map(|c| String::from_utf8_lossy(&c.value).into_owned())
}

#[test]
fn test_empty_scanner() {
    let mut scanner = EmptyScanner;

    assert!(!scanner.seek(&Cell::first_on_row("r")).expect("seek"));
    assert!(scanner.peek().expect("peek").is_none());
    assert!(scanner.next().expect("next").is_none());
}

#[test]
fn test_next_without_seek_starts_at_beginning() {
    let store = sample_store();
    let mut scanner = store.scanner(AcceptAll);

    assert_eq!(value(scanner.next().expect("next")).as_deref(), Some("a-x"));
}

#[test]
fn test_seek_positions_at_first_cell_of_family() {
    let store = sample_store();
    let mut scanner = store.scanner(AcceptAll);

    let found = scanner
        .seek(&Cell::first_on_row_family("r", "f"))
        .expect("seek");

    assert!(found);
    assert_eq!(value(scanner.next().expect("next")).as_deref(), Some("f-q-5"));
}

#[test]
fn test_seek_past_end_returns_false() {
    let store = sample_store();
    let mut scanner = store.scanner(AcceptAll);

    assert!(!scanner
        .seek(&Cell::first_on_row_family("r", "z"))
        .expect("seek"));
    assert!(scanner.next().expect("next").is_none());
}

#[test]
fn test_peek_does_not_advance() {
    let store = sample_store();
    let mut scanner = store.scanner(FamilyOnly::new("g"));
    scanner.seek(&Cell::first_on_row("r")).expect("seek");

    let peeked = scanner.peek().expect("peek").cloned();
    let next = scanner.next().expect("next");

    assert_eq!(peeked, next);
    assert!(scanner.next().expect("next").is_none());
}

#[test]
fn test_filter_restricts_family_and_ceiling() {
    let store = sample_store();
    let mut scanner = store.scanner(MaxTimestamp::new(4).and(FamilyOnly::new("f")));

    assert!(scanner
        .seek(&Cell::first_on_row_family("r", "f"))
        .expect("seek"));
    let mut values = Vec::new();
    while let Some(v) = value(scanner.next().expect("next")) {
        values.push(v);
    }

    assert_eq!(values, vec!["f-q-3", "f-r-4"]);
}

#[test]
fn test_forward_reseek_skips_ahead() {
    let store = sample_store();
    let mut scanner = store.scanner(AcceptAll);
    scanner.seek(&Cell::first_on_row("r")).expect("seek");

    assert!(scanner
        .seek(&Cell::first_on_row_family("r", "g"))
        .expect("reseek"));

    assert_eq!(value(scanner.next().expect("next")).as_deref(), Some("g-q"));
}

#[test]
fn test_backward_seek_restarts() {
    let store = sample_store();
    let mut scanner = store.scanner(AcceptAll);
    scanner
        .seek(&Cell::first_on_row_family("r", "g"))
        .expect("seek");

    assert!(scanner.seek(&Cell::first_on_row("r")).expect("seek back"));

    assert_eq!(value(scanner.next().expect("next")).as_deref(), Some("a-x"));
}

#[test]
fn test_seek_to_current_cell_is_noop() {
    let store = sample_store();
    let mut scanner = store.scanner(AcceptAll);
    scanner
        .seek(&Cell::first_on_row_family("r", "f"))
        .expect("seek");
    let current = scanner.peek().expect("peek").cloned().expect("cell");

    assert!(scanner.seek(&current).expect("seek"));

    assert_eq!(scanner.next().expect("next"), Some(current));
}

#[test]
fn test_covered_columns_scanner_without_visible_data_is_empty() {
    let store = sample_store();
    let columns = vec![crate::column::CoveredColumn::all_qualifiers("missing").expect("column")];

    let mut scanner = covered_columns_scanner(&store, &columns, u64::MAX).expect("scanner");

    assert!(scanner.next().expect("next").is_none());
}
