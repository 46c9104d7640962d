//! Integration tests for spec-level invariants and round-trip properties.
//! Scenario-level behavior (S1-S7) is covered in `sheet.rs`'s unit tests;
//! this file focuses on properties that span many operations.

use proptest::prelude::*;
use tabulon_engine::value::{CellValue, ErrorKind};
use tabulon_engine::{Position, Sheet};

fn pos(label: &str) -> Position {
    Position::parse(label).unwrap()
}

#[test]
fn invariant_referenced_cells_are_materialized_with_this_cell_as_dependent() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=Z9").unwrap();
    // Z9 did not exist before; it must now exist as an Empty placeholder
    // so invariant 1 holds (every referenced position has a cell).
    let handle = sheet.get_cell(pos("Z9")).unwrap().unwrap();
    assert_eq!(handle.get_value(), CellValue::Empty);
}

#[test]
fn invariant_get_referenced_cells_matches_formula_references() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("C1"), "=A1+B1*2").unwrap();
    let handle = sheet.get_cell(pos("C1")).unwrap().unwrap();
    let mut refs = handle.get_referenced_cells();
    refs.sort();
    assert_eq!(refs, vec![pos("A1"), pos("B1")]);
}

#[test]
fn clear_then_set_empty_matches_clear_alone() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "hello").unwrap();
    sheet.clear_cell(pos("A1")).unwrap();
    let after_clear = sheet.printable_size();

    let mut sheet2 = Sheet::new();
    sheet2.set_cell(pos("A1"), "hello").unwrap();
    sheet2.clear_cell(pos("A1")).unwrap();
    sheet2.set_cell(pos("A1"), "").unwrap();
    assert_eq!(sheet2.printable_size(), after_clear);
}

#[test]
fn failed_edit_leaves_prior_value_observable() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "=B1").unwrap();
    let err = sheet.set_cell(pos("B1"), "=A1").unwrap_err();
    assert_eq!(
        err,
        tabulon_engine::SheetError::CircularDependency
    );
    // B1 is still whatever it was before (an Empty placeholder).
    let handle = sheet.get_cell(pos("B1")).unwrap().unwrap();
    assert_eq!(handle.get_value(), CellValue::Empty);
}

#[test]
fn text_cell_with_partial_numeric_parse_is_a_value_error() {
    let mut sheet = Sheet::new();
    sheet.set_cell(pos("A1"), "1.2.3").unwrap();
    sheet.set_cell(pos("A2"), "=A1").unwrap();
    let handle = sheet.get_cell(pos("A2")).unwrap().unwrap();
    assert_eq!(handle.get_value(), CellValue::Error(ErrorKind::Value));
}

proptest! {
    #[test]
    fn position_round_trips_through_label_for_any_valid_coordinate(
        row in 0usize..16384,
        col in 0usize..16384,
    ) {
        let p = Position::new(row, col);
        prop_assert!(p.is_valid());
        let label = p.format();
        prop_assert_eq!(Position::parse(&label).unwrap(), p);
    }

    #[test]
    fn set_cell_is_idempotent_for_arbitrary_numeric_text(n in -1000i64..1000) {
        let mut sheet = Sheet::new();
        let text = n.to_string();
        sheet.set_cell(pos("A1"), &text).unwrap();
        let first = sheet.get_cell(pos("A1")).unwrap().unwrap().get_value();
        sheet.set_cell(pos("A1"), &text).unwrap();
        let second = sheet.get_cell(pos("A1")).unwrap().unwrap().get_value();
        prop_assert_eq!(first, second);
        prop_assert_eq!(sheet.printable_size(), (1, 1));
    }
}
