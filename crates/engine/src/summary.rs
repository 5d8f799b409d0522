//! Totals calculation and the views derived from it.
//!
//! [`calculate`] is a pure function: it never validates and never touches the
//! store. Totals are summed in row order so repeated calls on the same input
//! produce bit-identical results.
use serde::Serialize;

use crate::{
    AllocationSchema,
    entry::{Entry, EntryId},
    money,
    schema::Rgb,
};

/// Per-row breakdown of an amount across the categories.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RowBreakdown {
    pub id: EntryId,
    pub label: String,
    pub amount: f64,
    pub splits: Vec<u8>,
    /// Dollars per category: `amount * split / 100`.
    pub amounts: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub color: Rgb,
    pub total: f64,
    /// Fraction of the grand total in `[0, 1]`; `0.0` when the grand total is
    /// zero.
    pub share: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub rows: Vec<RowBreakdown>,
    /// One total per category, in category order.
    pub totals: Vec<CategoryTotal>,
    pub grand_total: f64,
}

/// One pie slice, ready for the chart renderer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub amount: f64,
    pub color: Rgb,
}

/// Row-level table with pre-formatted cells.
///
/// Columns: label, amount, each split percentage, each split's dollars.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Computes per-row, per-category and grand totals.
///
/// The caller is responsible for validating the entries first.
pub fn calculate(schema: &AllocationSchema, entries: &[Entry]) -> Summary {
    let categories = schema.categories();

    let rows: Vec<RowBreakdown> = entries
        .iter()
        .map(|entry| RowBreakdown {
            id: entry.id,
            label: entry.label.clone(),
            amount: entry.amount(),
            splits: (0..categories.len())
                .map(|i| entry.split(i).unwrap_or(0))
                .collect(),
            amounts: (0..categories.len())
                .map(|i| {
                    let percent = entry.split(i).unwrap_or(0);
                    entry.amount() * f64::from(percent) / 100.0
                })
                .collect(),
        })
        .collect();

    let grand_total: f64 = rows.iter().map(|row| row.amount).sum();

    let totals = categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let total: f64 = rows.iter().map(|row| row.amounts[i]).sum();
            CategoryTotal {
                name: category.name.clone(),
                color: category.color,
                total,
                share: share_of(total, grand_total),
            }
        })
        .collect();

    tracing::debug!(rows = rows.len(), grand_total, "summary calculated");

    Summary {
        rows,
        totals,
        grand_total,
    }
}

fn share_of(total: f64, grand_total: f64) -> f64 {
    if grand_total > 0.0 {
        total / grand_total
    } else {
        0.0
    }
}

impl Summary {
    /// Builds the read-only summary table.
    pub fn table(&self, schema: &AllocationSchema) -> SummaryTable {
        let mut header = vec![schema.entry_label().to_string(), "Amount".to_string()];
        header.extend(schema.category_names().map(|name| format!("{name} %")));
        header.extend(schema.category_names().map(|name| format!("{name} $")));

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.label.clone(), money::format_currency(row.amount)];
                cells.extend(row.splits.iter().map(|percent| format!("{percent}%")));
                cells.extend(row.amounts.iter().map(|amount| money::format_currency(*amount)));
                cells
            })
            .collect();

        SummaryTable { header, rows }
    }

    /// `Total Amount: $300.00` followed by one line per category, e.g.
    /// `Total Stocks: $50.00 (16.7%)`.
    pub fn total_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.totals.len() + 1);
        lines.push(format!(
            "Total Amount: {}",
            money::format_currency(self.grand_total)
        ));
        lines.extend(self.totals.iter().map(|total| {
            format!(
                "Total {}: {} ({})",
                total.name,
                money::format_currency(total.total),
                money::format_share(total.share)
            )
        }));
        lines
    }

    /// Pie chart input: the highlighted category first, the rest in category
    /// order.
    pub fn pie_slices(&self, schema: &AllocationSchema) -> Vec<PieSlice> {
        schema
            .chart_order()
            .into_iter()
            .filter_map(|i| self.totals.get(i))
            .map(|total| PieSlice {
                name: total.name.clone(),
                amount: total.total,
                color: total.color,
            })
            .collect()
    }

    pub fn total(&self, name: &str) -> Option<&CategoryTotal> {
        self.totals.iter().find(|total| total.name == name)
    }
}
