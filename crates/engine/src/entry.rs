//! The module contains the `Entry` type representing one row of the form: a
//! named account (or fund) with a dollar amount split across categories.
use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    money::{self, MAX_PERCENT},
};

/// Stable identifier of an [`Entry`].
///
/// Assigned once when the row is created and never reused, so a row keeps its
/// identity when rows before it are deleted and its position shifts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One editable row.
///
/// `splits` holds one percentage per schema category, in category order.
/// Each value is always within `[0, 100]`; their sum is only checked when a
/// calculation is requested.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "EntryRecord")]
pub struct Entry {
    pub id: EntryId,
    pub label: String,
    amount: f64,
    splits: Vec<u8>,
}

/// Unchecked serialized form; converted through the same clamping as edits.
#[derive(Deserialize)]
struct EntryRecord {
    id: EntryId,
    label: String,
    amount: f64,
    splits: Vec<i64>,
}

impl From<EntryRecord> for Entry {
    fn from(record: EntryRecord) -> Self {
        Self {
            id: record.id,
            label: record.label,
            amount: money::sanitize_amount(record.amount),
            splits: record
                .splits
                .iter()
                .map(|v| money::clamp_percent(*v))
                .collect(),
        }
    }
}

impl Entry {
    /// New row with an empty label, a zero amount and the given splits.
    pub fn new(default_splits: &[u8]) -> Self {
        Self {
            id: EntryId::new(),
            label: String::new(),
            amount: 0.0,
            splits: default_splits
                .iter()
                .map(|v| (*v).min(MAX_PERCENT))
                .collect(),
        }
    }

    /// Builds a fully populated row. Values go through the same clamping as
    /// [`Entry::apply`].
    pub fn with_values(label: impl Into<String>, amount: f64, splits: &[i64]) -> Self {
        Self {
            id: EntryId::new(),
            label: label.into(),
            amount: money::sanitize_amount(amount),
            splits: splits.iter().map(|v| money::clamp_percent(*v)).collect(),
        }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn splits(&self) -> &[u8] {
        &self.splits
    }

    pub fn split(&self, category: usize) -> Option<u8> {
        self.splits.get(category).copied()
    }

    /// Sum of all split percentages.
    pub fn split_sum(&self) -> u32 {
        self.splits.iter().map(|v| u32::from(*v)).sum()
    }

    /// `true` when the splits total exactly 100%.
    pub fn is_balanced(&self) -> bool {
        self.split_sum() == u32::from(MAX_PERCENT)
    }

    /// Applies a single field edit, clamping values into their domain.
    pub fn apply(&mut self, field: Field) -> ResultEngine<()> {
        match field {
            Field::Label(label) => self.label = label,
            Field::Amount(amount) => self.amount = money::sanitize_amount(amount),
            Field::Split { category, percent } => {
                let slot = self
                    .splits
                    .get_mut(category)
                    .ok_or(EngineError::CategoryNotFound(category))?;
                *slot = money::clamp_percent(percent);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let splits: Vec<String> = self.splits.iter().map(|v| v.to_string()).collect();
        write!(
            f,
            "{} {} [{}]",
            self.label,
            money::format_currency(self.amount),
            splits.join("/")
        )
    }
}

/// A single field edit on a row.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Label(String),
    /// Negative, NaN or infinite amounts become `0.0`.
    Amount(f64),
    /// `percent` is clamped to `[0, 100]`.
    Split { category: usize, percent: i64 },
}

impl Field {
    /// Amount edit from user text; malformed input becomes `0.0`.
    pub fn amount_from_input(input: &str) -> Self {
        Self::Amount(money::coerce_amount(input))
    }

    /// Split edit from user text; malformed input becomes `0`.
    pub fn split_from_input(category: usize, input: &str) -> Self {
        Self::Split {
            category,
            percent: i64::from(money::coerce_percent(input)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialized_entries_are_clamped() {
        let entry: Entry = serde_json::from_str(
            r#"{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","label":"IRA","amount":-5.0,"splits":[250,-3,40]}"#,
        )
        .unwrap();
        assert_eq!(entry.label, "IRA");
        assert_eq!(entry.amount(), 0.0);
        assert_eq!(entry.splits(), [100, 0, 40]);
    }

    #[test]
    fn new_entry_uses_defaults() {
        let entry = Entry::new(&[34, 33, 33]);
        assert!(entry.label.is_empty());
        assert_eq!(entry.amount(), 0.0);
        assert_eq!(entry.splits(), [34, 33, 33]);
        assert!(entry.is_balanced());
    }

    #[test]
    fn ids_are_unique() {
        let a = Entry::new(&[100]);
        let b = Entry::new(&[100]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn apply_clamps_splits_and_amounts() {
        let mut entry = Entry::new(&[34, 33, 33]);

        entry.apply(Field::Split { category: 0, percent: 250 }).unwrap();
        assert_eq!(entry.split(0), Some(100));
        entry.apply(Field::Split { category: 1, percent: -4 }).unwrap();
        assert_eq!(entry.split(1), Some(0));

        entry.apply(Field::Amount(-10.0)).unwrap();
        assert_eq!(entry.amount(), 0.0);
        entry.apply(Field::Amount(f64::NAN)).unwrap();
        assert_eq!(entry.amount(), 0.0);
        entry.apply(Field::Amount(42.5)).unwrap();
        assert_eq!(entry.amount(), 42.5);
    }

    #[test]
    fn apply_rejects_unknown_category() {
        let mut entry = Entry::new(&[50, 50]);
        assert_eq!(
            entry.apply(Field::Split { category: 2, percent: 10 }),
            Err(EngineError::CategoryNotFound(2))
        );
        assert_eq!(entry.splits(), [50, 50]);
    }

    #[test]
    fn input_fields_coerce_malformed_text() {
        assert_eq!(Field::amount_from_input("12,000.10"), Field::Amount(12000.1));
        assert_eq!(Field::amount_from_input("twelve"), Field::Amount(0.0));
        assert_eq!(
            Field::split_from_input(1, "abc"),
            Field::Split { category: 1, percent: 0 }
        );
        assert_eq!(
            Field::split_from_input(1, "140"),
            Field::Split { category: 1, percent: 100 }
        );
    }

    #[test]
    fn unbalanced_entry_is_detected() {
        let entry = Entry::with_values("A", 10.0, &[30, 30, 30]);
        assert_eq!(entry.split_sum(), 90);
        assert!(!entry.is_balanced());
    }

    #[test]
    fn display_shows_amount_and_splits() {
        let entry = Entry::with_values("IRA", 1500.0, &[50, 25, 25]);
        assert_eq!(entry.to_string(), "IRA $1,500.00 [50/25/25]");
    }
}
