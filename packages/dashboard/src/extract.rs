//! Label-pattern field extraction.
//!
//! Each extractor runs one compiled pattern against the full report text
//! and coerces the first capture group. A miss, or a capture that does not
//! parse, yields the kind's default (`0` or `""`). Nothing here returns an
//! error: a report that lacks a label still produces a fully-shaped record.

use std::borrow::Cow;
use std::sync::LazyLock;

use project_dashboard_models::{FieldKind, FieldValue};
use regex::{Regex, RegexBuilder};

/// A single Unicode decimal digit (general category `Nd`).
static DECIMAL_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Nd}$").expect("valid regex"));

/// Compiles `pattern` with the flags `kind` is matched under.
///
/// All kinds are case-insensitive. Number and percentage patterns also let
/// `.` match newlines, since PDF text extraction often splits a label from
/// its value.
///
/// # Errors
///
/// Returns [`regex::Error`] if the pattern does not compile.
pub fn compile_pattern(kind: FieldKind, pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(kind != FieldKind::Text)
        .build()
}

/// Extracts a currency amount: commas stripped, rounded to an integer.
#[must_use]
pub fn extract_number(text: &str, re: &Regex) -> i64 {
    capture(text, re)
        .and_then(|raw| ascii_digits(&raw.replace(',', "")).parse::<f64>().ok())
        .map_or(0, round_to_int)
}

/// Extracts a percentage scaled by 100, so `31.00` becomes `3100`.
#[must_use]
pub fn extract_percentage(text: &str, re: &Regex) -> i64 {
    capture(text, re)
        .and_then(|raw| ascii_digits(raw).parse::<f64>().ok())
        .map_or(0, |value| round_to_int(value * 100.0))
}

/// Extracts free text with surrounding whitespace trimmed.
#[must_use]
pub fn extract_text(text: &str, re: &Regex) -> String {
    capture(text, re).map_or_else(String::new, |raw| raw.trim().to_string())
}

/// Dispatches to the extractor for `kind`.
#[must_use]
pub fn extract(kind: FieldKind, text: &str, re: &Regex) -> FieldValue {
    match kind {
        FieldKind::Number => FieldValue::Integer(extract_number(text, re)),
        FieldKind::Percentage => FieldValue::Integer(extract_percentage(text, re)),
        FieldKind::Text => FieldValue::Text(extract_text(text, re)),
    }
}

fn capture<'t>(text: &'t str, re: &Regex) -> Option<&'t str> {
    re.captures(text)?.get(1).map(|m| m.as_str())
}

/// Rewrites every Unicode decimal digit in `raw` as its ASCII equivalent.
///
/// `\d` matches any `Nd` character, but `f64` parsing only accepts ASCII,
/// so `١٢٣` has to become `123` before it is parsed.
fn ascii_digits(raw: &str) -> Cow<'_, str> {
    if raw.is_ascii() {
        return Cow::Borrowed(raw);
    }

    raw.chars()
        .map(|c| {
            decimal_value(c)
                .and_then(|d| char::from_digit(d, 10))
                .unwrap_or(c)
        })
        .collect()
}

/// The numeric value of a decimal digit in any script.
fn decimal_value(c: char) -> Option<u32> {
    if c.is_ascii() {
        return c.to_digit(10);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    // Nd digits are encoded in contiguous runs of ten, starting at zero.
    let mut zero = u32::from(c);
    while let Some(prev) = zero.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        zero -= 1;
    }

    Some((u32::from(c) - zero) % 10)
}

fn is_decimal_digit(c: char) -> bool {
    DECIMAL_DIGIT_RE.is_match(c.encode_utf8(&mut [0; 4]))
}

/// Rounds half to even. Anything that cannot be a non-negative `i64`
/// (NaN, infinities, negatives, overflow) becomes 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn round_to_int(value: f64) -> i64 {
    let rounded = value.round_ties_even();
    if !rounded.is_finite() || rounded < 0.0 || rounded >= i64::MAX as f64 {
        return 0;
    }
    rounded as i64
}
