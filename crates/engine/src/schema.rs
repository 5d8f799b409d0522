//! The module contains the allocation schema: the ordered set of categories a
//! row is split across, plus the labels and defaults the form uses.
//!
//! Two presets exist, [`AllocationSchema::accounts`] (Stocks/Bonds/Cash) and
//! [`AllocationSchema::funds`] (Equities/Fixed Income/Cash). Custom schemas are
//! built with [`AllocationSchema::builder`].
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, money::MAX_PERCENT};

/// A 24-bit RGB color, written as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Deterministic color for a category without an explicit one.
    ///
    /// The name is hashed with FNV-1a so the same name always picks the same
    /// palette slot, across runs and platforms.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        let mut hash: u32 = 0x811c_9dc5;
        for byte in name.bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(0x0100_0193);
        }
        FALLBACK_PALETTE[hash as usize % FALLBACK_PALETTE.len()]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = EngineError;

    /// Parses `#RRGGBB` (the `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidSchema(format!("invalid color: {s}"));
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

pub const MUSTARD: Rgb = Rgb::new(0xC9, 0x92, 0x13);
pub const TEAL: Rgb = Rgb::new(0x33, 0x61, 0x72);
pub const GREEN: Rgb = Rgb::new(0x44, 0x59, 0x37);

const FALLBACK_PALETTE: [Rgb; 8] = [
    Rgb::new(0x4E, 0x79, 0xA7),
    Rgb::new(0xF2, 0x8E, 0x2B),
    Rgb::new(0xE1, 0x57, 0x59),
    Rgb::new(0x76, 0xB7, 0xB2),
    Rgb::new(0x59, 0xA1, 0x4F),
    Rgb::new(0xED, 0xC9, 0x48),
    Rgb::new(0xB0, 0x7A, 0xA1),
    Rgb::new(0x9C, 0x75, 0x5F),
];

/// One allocation bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub color: Rgb,
}

/// The configuration shared by every row of the form.
///
/// Invariants (checked by [`SchemaBuilder::build`]):
/// - at least one category, names unique and non-blank
/// - `default_splits` has one value per category and sums to 100
/// - `highlighted`, when set, is a valid category index
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AllocationSchema {
    entry_label: String,
    categories: Vec<Category>,
    highlighted: Option<usize>,
    default_splits: Vec<u8>,
}

impl AllocationSchema {
    /// Return a builder for `AllocationSchema`.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Accounts split across Stocks, Bonds and Cash.
    #[must_use]
    pub fn accounts() -> Self {
        Self::preset(
            "Account",
            &[("Stocks", TEAL), ("Bonds", GREEN), ("Cash", MUSTARD)],
        )
    }

    /// Funds split across Equities, Fixed Income and Cash.
    #[must_use]
    pub fn funds() -> Self {
        Self::preset(
            "Fund",
            &[("Equities", TEAL), ("Fixed Income", GREEN), ("Cash", MUSTARD)],
        )
    }

    /// Looks a preset up by name (`accounts` or `funds`).
    pub fn from_preset(name: &str) -> ResultEngine<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "accounts" | "account" => Ok(Self::accounts()),
            "funds" | "fund" => Ok(Self::funds()),
            other => Err(EngineError::InvalidSchema(format!(
                "unknown preset: {other}"
            ))),
        }
    }

    fn preset(entry_label: &str, categories: &[(&str, Rgb)]) -> Self {
        let categories: Vec<Category> = categories
            .iter()
            .map(|(name, color)| Category {
                name: (*name).to_string(),
                color: *color,
            })
            .collect();
        let highlighted = categories.iter().position(|c| c.name == "Cash");
        let default_splits = even_splits(categories.len());
        Self {
            entry_label: entry_label.to_string(),
            categories,
            highlighted,
            default_splits,
        }
    }

    pub fn entry_label(&self) -> &str {
        &self.entry_label
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// The category drawn first in the pie chart, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn default_splits(&self) -> &[u8] {
        &self.default_splits
    }

    /// Category indices in chart order: the highlighted category first, the
    /// others in display order.
    pub fn chart_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = Vec::with_capacity(self.categories.len());
        order.extend(self.highlighted);
        order.extend((0..self.categories.len()).filter(|i| Some(*i) != self.highlighted));
        order
    }
}

impl Default for AllocationSchema {
    fn default() -> Self {
        Self::accounts()
    }
}

/// Spreads 100 over `count` categories, giving the remainder to the leading
/// ones (3 → `[34, 33, 33]`).
#[must_use]
pub fn even_splits(count: usize) -> Vec<u8> {
    if count == 0 {
        return Vec::new();
    }
    let total = usize::from(MAX_PERCENT);
    let base = total / count;
    let remainder = total % count;
    (0..count)
        .map(|i| (base + usize::from(i < remainder)) as u8)
        .collect()
}

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    entry_label: Option<String>,
    categories: Vec<(String, Option<Rgb>)>,
    highlight: Option<String>,
    default_splits: Option<Vec<u8>>,
}

impl SchemaBuilder {
    /// Column title for the free-text field (defaults to `Account`).
    pub fn entry_label(mut self, label: impl Into<String>) -> SchemaBuilder {
        self.entry_label = Some(label.into());
        self
    }

    /// Append a category; without a color one is derived from the name.
    pub fn category(mut self, name: impl Into<String>, color: Option<Rgb>) -> SchemaBuilder {
        self.categories.push((name.into(), color));
        self
    }

    /// Category drawn first in the chart.
    pub fn highlight(mut self, name: impl Into<String>) -> SchemaBuilder {
        self.highlight = Some(name.into());
        self
    }

    pub fn default_splits(mut self, splits: Vec<u8>) -> SchemaBuilder {
        self.default_splits = Some(splits);
        self
    }

    /// Construct `AllocationSchema`
    pub fn build(self) -> ResultEngine<AllocationSchema> {
        if self.categories.is_empty() {
            return Err(EngineError::InvalidSchema(
                "at least one category is required".to_string(),
            ));
        }

        let mut categories: Vec<Category> = Vec::with_capacity(self.categories.len());
        for (name, color) in self.categories {
            let name = normalize_required_name(&name, "category")?;
            if categories.iter().any(|c| c.name == name) {
                return Err(EngineError::InvalidSchema(format!(
                    "duplicate category: {name}"
                )));
            }
            let color = color.unwrap_or_else(|| Rgb::for_name(&name));
            categories.push(Category { name, color });
        }

        let highlighted = match self.highlight {
            Some(name) => {
                let name = name.trim();
                Some(
                    categories
                        .iter()
                        .position(|c| c.name == name)
                        .ok_or_else(|| {
                            EngineError::InvalidSchema(format!(
                                "highlighted category not found: {name}"
                            ))
                        })?,
                )
            }
            None => None,
        };

        let default_splits = match self.default_splits {
            Some(splits) => {
                if splits.len() != categories.len() {
                    return Err(EngineError::InvalidSchema(format!(
                        "expected {} default splits, got {}",
                        categories.len(),
                        splits.len()
                    )));
                }
                let sum: u32 = splits.iter().map(|v| u32::from(*v)).sum();
                if sum != u32::from(MAX_PERCENT) {
                    return Err(EngineError::InvalidSchema(format!(
                        "default splits must sum to 100, got {sum}"
                    )));
                }
                splits
            }
            None => even_splits(categories.len()),
        };

        let entry_label = match self.entry_label {
            Some(label) => normalize_required_name(&label, "entry label")?,
            None => "Account".to_string(),
        };

        Ok(AllocationSchema {
            entry_label,
            categories,
            highlighted,
            default_splits,
        })
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidSchema(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}
