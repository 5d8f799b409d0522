//! Parsing and formatting of dollar amounts and split percentages.
//!
//! Amounts are plain `f64` dollars. Every value that reaches an [`Entry`] is
//! finite and non-negative; user text goes through [`coerce_amount`] /
//! [`coerce_percent`] at the input boundary so malformed input never crashes
//! the session.
//!
//! # Examples
//!
//! ```rust
//! use engine::money;
//!
//! assert_eq!(money::parse_amount("$1,234.50").unwrap(), 1234.5);
//! assert!(money::parse_amount("abc").is_err());
//! assert_eq!(money::coerce_amount("abc"), 0.0);
//! assert_eq!(money::format_currency(1234.5), "$1,234.50");
//! ```
//!
//! [`Entry`]: crate::Entry

use crate::{EngineError, ResultEngine};

/// Highest percentage a single split may hold.
pub const MAX_PERCENT: u8 = 100;

/// Parses a dollar amount typed by the user.
///
/// Accepts surrounding whitespace, an optional leading `+`/`-`, an optional
/// `$`, `,` as thousands separator and `.` as decimal separator.
///
/// Validation rules:
/// - at least one digit
/// - at most one `.`
/// - `,` only between groups of three digits in the whole part (`1,234`)
/// - rejects exponents, `inf`, `NaN` and any other character
pub fn parse_amount(s: &str) -> ResultEngine<f64> {
    let invalid = || EngineError::InvalidAmount(format!("\"{}\" is not a number", s.trim()));

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount("empty amount".to_string()));
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };
    let rest = rest.trim_start().strip_prefix('$').unwrap_or(rest).trim();
    if !thousands_well_placed(rest) {
        return Err(invalid());
    }
    let digits: String = rest.chars().filter(|c| *c != ',').collect();

    if !digits.chars().any(|c| c.is_ascii_digit())
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        || digits.matches('.').count() > 1
    {
        return Err(invalid());
    }

    let value: f64 = digits.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(EngineError::InvalidAmount("amount too large".to_string()));
    }

    Ok(if negative { -value } else { value })
}

/// Parses an amount, falling back to `0.0` for malformed input and clamping
/// negatives to `0.0`.
#[must_use]
pub fn coerce_amount(s: &str) -> f64 {
    parse_amount(s).map(sanitize_amount).unwrap_or(0.0)
}

/// Forces an amount into the valid domain: finite and `>= 0.0`.
#[must_use]
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parses an integer percentage (optional trailing `%`) and clamps it to
/// `[0, 100]`.
pub fn parse_percent(s: &str) -> ResultEngine<u8> {
    let trimmed = s.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    if number.is_empty() {
        return Err(EngineError::InvalidPercent("empty percentage".to_string()));
    }
    let value: i64 = number
        .parse()
        .map_err(|_| EngineError::InvalidPercent(format!("\"{number}\" is not an integer")))?;
    Ok(clamp_percent(value))
}

/// Like [`parse_percent`], but malformed input becomes `0`.
#[must_use]
pub fn coerce_percent(s: &str) -> u8 {
    parse_percent(s).unwrap_or(0)
}

/// Clamps any integer into the `[0, 100]` percentage range.
#[must_use]
pub fn clamp_percent(value: i64) -> u8 {
    // The clamp guarantees the cast is lossless.
    value.clamp(0, i64::from(MAX_PERCENT)) as u8
}

/// Formats dollars with two decimals and thousands separators (`$1,234.56`).
#[must_use]
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats an amount for an editable field (`1234.50`, no symbol).
#[must_use]
pub fn format_plain(value: f64) -> String {
    format!("{value:.2}")
}

/// Formats a share (fraction of the grand total) as a percentage with one
/// decimal (`0.1667` → `16.7%`).
#[must_use]
pub fn format_share(share: f64) -> String {
    let percent = if share.is_finite() { share * 100.0 } else { 0.0 };
    format!("{percent:.1}%")
}

/// `true` when every `,` separates the whole part into groups of three.
fn thousands_well_placed(number: &str) -> bool {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if fraction.contains(',') {
        return false;
    }
    if !whole.contains(',') {
        return true;
    }
    let mut groups = whole.split(',');
    let leading_ok = groups.next().is_some_and(|g| (1..=3).contains(&g.len()));
    leading_ok && groups.all(|g| g.len() == 3)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
