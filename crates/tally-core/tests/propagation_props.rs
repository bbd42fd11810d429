//! Property tests: after any sequence of edits every formula cell holds
//! exactly what a fresh evaluation would give, and dependents mirror the
//! formula text.

use proptest::prelude::*;
use tally_core::{CellRef, Sheet, TallyError};
use tally_engine::engine::{evaluate, parse_formula};

const SIZE: usize = 4;

fn cell_id() -> impl Strategy<Value = String> {
    (0..SIZE, 0..SIZE).prop_map(|(col, row)| CellRef::new(col, row).to_string())
}

fn range() -> impl Strategy<Value = String> {
    ((0..SIZE, 0..SIZE), (0..SIZE, 0..SIZE)).prop_map(|((c1, r1), (c2, r2))| {
        let start = CellRef::new(c1.min(c2), r1.min(r2));
        let end = CellRef::new(c1.max(c2), r1.max(r2));
        format!("{start}:{end}")
    })
}

fn term() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i64..100).prop_map(|v| v.to_string()),
        cell_id(),
        cell_id(),
        range(),
    ]
}

fn input() -> impl Strategy<Value = String> {
    prop_oneof![
        (-50i64..50).prop_map(|v| v.to_string()),
        prop::collection::vec((any::<bool>(), term()), 1..4).prop_map(|terms| {
            let mut formula = String::from("=");
            for (i, (negative, term)) in terms.iter().enumerate() {
                if *negative {
                    formula.push('-');
                } else if i > 0 {
                    formula.push('+');
                }
                formula.push_str(term);
            }
            formula
        }),
    ]
}

fn all_cells() -> Vec<CellRef> {
    (0..SIZE)
        .flat_map(|row| (0..SIZE).map(move |col| CellRef::new(col, row)))
        .collect()
}

type Snapshot = Vec<(i64, Option<String>, Vec<CellRef>)>;

fn snapshot(sheet: &Sheet) -> Snapshot {
    all_cells()
        .iter()
        .map(|cell| {
            let id = cell.to_string();
            (
                sheet.get_cell_value(&id).unwrap(),
                sheet.get_cell_formula(&id).unwrap().map(str::to_string),
                sheet.dependents_of(&id).unwrap(),
            )
        })
        .collect()
}

fn assert_consistent(sheet: &Sheet) {
    for cell in all_cells() {
        let id = cell.to_string();
        if let Some(text) = sheet.get_cell_formula(&id).unwrap() {
            let terms = parse_formula(text).unwrap();
            let fresh = evaluate(&terms, |c| sheet.get_cell_value(&c.to_string()).unwrap());
            assert_eq!(sheet.get_cell_value(&id).unwrap(), fresh, "{id} = {text} is stale");
        }

        // X is a dependent of `cell` iff X's formula references `cell`.
        let mut expected: Vec<CellRef> = all_cells()
            .into_iter()
            .filter(|other| {
                sheet
                    .get_cell_formula(&other.to_string())
                    .unwrap()
                    .map(|text| parse_formula(text).unwrap())
                    .is_some_and(|terms| terms.iter().any(|t| t.cell_ref() == Some(cell)))
            })
            .collect();
        expected.sort();
        assert_eq!(sheet.dependents_of(&id).unwrap(), expected, "dependents of {id}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]
    #[test]
    fn stored_values_match_fresh_evaluation(
        edits in prop::collection::vec((cell_id(), input()), 1..40),
    ) {
        let mut sheet = Sheet::new(SIZE, SIZE);
        for (id, raw) in &edits {
            let before = snapshot(&sheet);
            match sheet.set_cell_value(id, raw) {
                Ok(()) => {}
                Err(TallyError::CycleDetected { .. }) => {
                    prop_assert_eq!(&snapshot(&sheet), &before, "rejected {} = {} changed the sheet", id, raw);
                }
                Err(err) => prop_assert!(false, "unexpected error for {} = {}: {}", id, raw, err),
            }
            assert_consistent(&sheet);
        }
    }
}
