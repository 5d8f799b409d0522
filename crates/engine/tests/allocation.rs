use engine::{AllocationSchema, EngineError, Field, RemoveOutcome, RowStore, Validation};

const TOLERANCE: f64 = 1e-9;

fn store_with(rows: &[(&str, f64, [i64; 3])]) -> RowStore {
    let mut store = RowStore::new(AllocationSchema::accounts());
    for (index, (label, amount, splits)) in rows.iter().enumerate() {
        if index > 0 {
            store.add_row();
        }
        store
            .update_field(index, Field::Label((*label).to_string()))
            .unwrap();
        store.update_field(index, Field::Amount(*amount)).unwrap();
        for (category, percent) in splits.iter().enumerate() {
            store
                .update_field(
                    index,
                    Field::Split {
                        category,
                        percent: *percent,
                    },
                )
                .unwrap();
        }
    }
    store
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn single_default_split_row() {
    let store = store_with(&[("A", 100.0, [34, 33, 33])]);
    let summary = store.calculate().unwrap();

    assert_close(summary.grand_total, 100.0);
    assert_close(summary.total("Stocks").unwrap().total, 34.0);
    assert_close(summary.total("Bonds").unwrap().total, 33.0);
    assert_close(summary.total("Cash").unwrap().total, 33.0);
    assert_eq!(
        summary.total_lines(),
        [
            "Total Amount: $100.00",
            "Total Stocks: $34.00 (34.0%)",
            "Total Bonds: $33.00 (33.0%)",
            "Total Cash: $33.00 (33.0%)",
        ]
    );
}

#[test]
fn two_rows_mixed_splits() {
    let store = store_with(&[("A", 100.0, [50, 25, 25]), ("B", 200.0, [0, 0, 100])]);
    let summary = store.calculate().unwrap();

    assert_close(summary.grand_total, 300.0);
    assert_close(summary.total("Stocks").unwrap().total, 50.0);
    assert_close(summary.total("Bonds").unwrap().total, 25.0);
    assert_close(summary.total("Cash").unwrap().total, 225.0);
    assert_eq!(
        summary.total_lines()[1..],
        [
            "Total Stocks: $50.00 (16.7%)",
            "Total Bonds: $25.00 (8.3%)",
            "Total Cash: $225.00 (75.0%)",
        ]
    );
}

#[test]
fn splits_not_summing_to_100_block_calculation() {
    let store = store_with(&[("A", 100.0, [50, 25, 25]), ("B", 10.0, [30, 30, 30])]);

    match store.validate() {
        Validation::Invalid { index, sum, .. } => {
            assert_eq!(index, 1);
            assert_eq!(sum, 90);
        }
        Validation::Valid => panic!("a 90% row must fail validation"),
    }
    assert_eq!(
        store.calculate(),
        Err(EngineError::InvalidSplits { row: 1, sum: 90 })
    );
}

#[test]
fn zero_amounts_report_zero_shares() {
    let store = store_with(&[("A", 0.0, [34, 33, 33])]);
    let summary = store.calculate().unwrap();

    assert_eq!(summary.grand_total, 0.0);
    for total in &summary.totals {
        assert_eq!(total.share, 0.0);
        assert!(!total.share.is_nan());
    }
}

#[test]
fn calculate_is_idempotent() {
    let store = store_with(&[
        ("A", 100.1, [33, 33, 34]),
        ("B", 0.3, [10, 20, 70]),
        ("C", 12345.67, [1, 98, 1]),
    ]);
    let first = store.calculate().unwrap();
    let second = store.calculate().unwrap();
    assert_eq!(first, second);
    for (a, b) in first.totals.iter().zip(&second.totals) {
        assert_eq!(a.total.to_bits(), b.total.to_bits());
        assert_eq!(a.share.to_bits(), b.share.to_bits());
    }
}

#[test]
fn category_totals_conserve_the_grand_total() {
    let store = store_with(&[
        ("A", 0.1, [33, 33, 34]),
        ("B", 999.99, [1, 2, 97]),
        ("C", 1.0 / 3.0, [50, 0, 50]),
        ("D", 42.0, [0, 100, 0]),
    ]);
    let summary = store.calculate().unwrap();
    let sum_of_totals: f64 = summary.totals.iter().map(|t| t.total).sum();
    let sum_of_amounts: f64 = store.entries().iter().map(|e| e.amount()).sum();
    assert_close(sum_of_totals, sum_of_amounts);
}

#[test]
fn split_edits_are_clamped() {
    let mut store = RowStore::default();
    for percent in [-1_000, -1, 0, 55, 100, 101, i64::MAX] {
        store
            .update_field(0, Field::Split { category: 1, percent })
            .unwrap();
        let stored = store.entries()[0].split(1).unwrap();
        assert!(stored <= 100, "{percent} stored as {stored}");
    }
}

#[test]
fn removing_the_only_row_is_a_no_op() {
    let mut store = store_with(&[("Solo", 10.0, [100, 0, 0])]);
    let before = store.entries().to_vec();

    assert_eq!(store.remove_row(0).unwrap(), RemoveOutcome::KeptLastRow);
    assert_eq!(store.entries(), before.as_slice());
}

#[test]
fn calculate_preserves_row_and_category_order() {
    let store = store_with(&[
        ("Z", 1.0, [100, 0, 0]),
        ("A", 2.0, [0, 100, 0]),
        ("M", 3.0, [0, 0, 100]),
    ]);
    let summary = store.calculate().unwrap();

    let labels: Vec<&str> = summary.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Z", "A", "M"]);
    let names: Vec<&str> = summary.totals.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Stocks", "Bonds", "Cash"]);
}

#[test]
fn custom_schema_drives_the_whole_flow() {
    let schema = AllocationSchema::builder()
        .entry_label("Fund")
        .category("Equities", None)
        .category("Cash", None)
        .highlight("Cash")
        .default_splits(vec![60, 40])
        .build()
        .unwrap();
    let mut store = RowStore::new(schema);
    store.update_field(0, Field::Amount(50.0)).unwrap();

    let summary = store.calculate().unwrap();
    assert_close(summary.total("Equities").unwrap().total, 30.0);
    assert_close(summary.total("Cash").unwrap().total, 20.0);

    let slices = summary.pie_slices(store.schema());
    assert_eq!(slices[0].name, "Cash");
    assert_eq!(summary.table(store.schema()).header[0], "Fund");
}
