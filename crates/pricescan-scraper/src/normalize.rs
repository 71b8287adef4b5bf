//! Conversion of locale-formatted marketplace text into canonical numbers.
//!
//! Listings mix `,` and `.` as decimal or thousands separators depending on
//! the storefront locale, prefix prices with assorted currency markers, and
//! abbreviate sold counts (`"1.2k"`, `"3 mil"`). Every function here is pure
//! and total: unparseable input yields `None` or `0`, never an error.

use std::sync::LazyLock;

use regex::Regex;

static QUANTITY_K_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<num>\d)\s*k\b").expect("valid regex"));

static CURRENCY_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(US\$|R\$|S/|[$€£¥])").expect("valid regex"));

static CURRENCY_OR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(US\$|R\$|S/|[$€£¥]|[A-Z]{1,4})").expect("valid regex"));

static NUMERIC_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d.,]*").expect("valid regex"));

static RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.]+)\s*/\s*5(?:\.0)?\s*\((\d+)\)").expect("valid regex"));

static YEARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:años|anos|years?|yrs?)").expect("valid regex"));

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*%").expect("valid regex"));

/// A `min`–`max` price span with the currency marker found alongside it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: Option<String>,
}

/// Parses a price, resolving the decimal separator from the string itself.
///
/// Separator rules:
/// - both `.` and `,` present: whichever occurs **last** is the decimal
///   separator; the other is a thousands separator.
/// - only one kind present: it is decimal when followed by exactly one or
///   two digits, otherwise it groups thousands.
///
/// Ranges (`"US $7.99 - 15.99"`) are split on a dash between digits and the
/// lowest parseable candidate wins. That lowest-price policy is a business
/// rule carried over for compatibility with existing datasets; it is not a
/// statement about which end of the range is more accurate.
///
/// Re-parsing a result's `to_string()` gives the same value only while the
/// result has at most two decimals: `1234.567` prints with a lone `.`
/// followed by three digits, which reads as a thousands separator.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(parts) = split_range(text) {
        let lowest = parts
            .iter()
            .filter_map(|part| normalize_amount(part))
            .min_by(f64::total_cmp);
        return lowest.or_else(|| parts.first().and_then(|part| normalize_amount(part)));
    }

    normalize_amount(text)
}

/// Parses an abbreviated count such as `"1.2k"`, `"3 mil"` or `"1,000+ sold"`.
///
/// A `k` directly after a number and the word `mil` both scale by 1000; when
/// both appear the multiplier is still applied once. Unparseable text is 0.
#[must_use]
pub fn parse_quantity(text: &str) -> u64 {
    let mut normalized = text.trim().to_lowercase().replace('+', "");
    if normalized.is_empty() {
        return 0;
    }

    let mut multiplier = 1.0_f64;
    if QUANTITY_K_SUFFIX.is_match(&normalized) {
        multiplier = 1000.0;
        normalized = QUANTITY_K_SUFFIX
            .replace_all(&normalized, "$num")
            .into_owned();
    }
    if normalized.contains("mil") {
        multiplier = multiplier.max(1000.0);
        normalized = normalized.replace("mil", "");
    }

    let value = parse_price(&normalized).unwrap_or(0.0) * multiplier;
    f64_to_count(value)
}

/// Parses a price span like `"US$3.60 - 5.60 / Piece"` into `(min, max, currency)`.
///
/// The currency is the first symbol or short uppercase code; the first two
/// numeric fragments are normalized independently. A single value yields
/// `min == max`.
#[must_use]
pub fn parse_price_range(text: &str) -> PriceRange {
    let currency = CURRENCY_OR_CODE
        .find(text)
        .map(|m| m.as_str().to_string());
    let stripped = CURRENCY_OR_CODE.replace_all(text, " ");

    let values: Vec<f64> = NUMERIC_FRAGMENT
        .find_iter(&stripped)
        .take(2)
        .filter_map(|m| normalize_amount(m.as_str()))
        .collect();

    match values.as_slice() {
        [] => PriceRange {
            min: None,
            max: None,
            currency,
        },
        [only] => PriceRange {
            min: Some(*only),
            max: Some(*only),
            currency,
        },
        [a, b, ..] => PriceRange {
            min: Some(a.min(*b)),
            max: Some(a.max(*b)),
            currency,
        },
    }
}

/// Returns the first currency symbol (`US$`, `R$`, `S/`, `$`, `€`, `£`, `¥`).
#[must_use]
pub fn detect_currency(text: &str) -> Option<String> {
    CURRENCY_SYMBOL
        .find(text)
        .map(|m| m.as_str().to_string())
}

/// Parses a supplier rating like `"4.8/5.0 (120)"` into `(score, review_count)`.
#[must_use]
pub fn parse_rating(text: &str) -> Option<(f64, u32)> {
    let caps = RATING.captures(text)?;
    let score = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let count = caps.get(2)?.as_str().parse::<u32>().ok()?;
    Some((score, count))
}

/// Parses a years-in-business badge like `"4 yrs"` or `"4 años"`.
#[must_use]
pub fn parse_years(text: &str) -> Option<u32> {
    YEARS.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Parses the first integer percentage, e.g. a repeat-buyer rate of `"31%"`.
#[must_use]
pub fn parse_percent(text: &str) -> Option<u32> {
    PERCENT.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Parses a minimum-order badge like `"Min. order: 2 pieces"`.
///
/// Returns the quantity (through [`parse_quantity`]) and the trimmed badge text.
#[must_use]
pub fn parse_moq(text: &str) -> (Option<u64>, Option<String>) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return (None, None);
    }
    let quantity = NUMERIC_FRAGMENT
        .find(trimmed)
        .map(|m| parse_quantity(m.as_str()));
    (quantity, Some(trimmed.to_string()))
}

/// Parses a unit count where both `,` and `.` only ever group thousands,
/// as on Made-in-China listings: `"1,200 Pieces (MOQ)"` is 1200.
#[must_use]
pub fn parse_unit_count(text: &str) -> u64 {
    NUMERIC_FRAGMENT
        .find(text)
        .map(|m| m.as_str().chars().filter(char::is_ascii_digit).collect::<String>())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

/// Joins a price rendered as separate integer and decimal spans.
///
/// Non-digit characters in either part (currency, the `.` glyph) are dropped.
/// Returns `None` when neither part carries digits.
#[must_use]
pub fn join_split_price(integer: Option<&str>, decimal: Option<&str>) -> Option<String> {
    let digits = |s: Option<&str>| -> String {
        s.unwrap_or_default()
            .chars()
            .filter(char::is_ascii_digit)
            .collect()
    };
    let int_digits = digits(integer);
    let dec_digits = digits(decimal);

    match (int_digits.is_empty(), dec_digits.is_empty()) {
        (true, true) => None,
        (false, false) => Some(format!("{int_digits}.{dec_digits}")),
        (false, true) => Some(int_digits),
        (true, false) => Some(format!("0.{dec_digits}")),
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Splits `text` on dashes that sit between digits (whitespace allowed on
/// either side). Returns `None` when no such dash exists.
fn split_range(text: &str) -> Option<Vec<&str>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut cuts: Vec<(usize, usize)> = Vec::new();

    for (pos, &(byte_idx, ch)) in chars.iter().enumerate() {
        if !matches!(ch, '-' | '–' | '—') {
            continue;
        }
        let before = chars[..pos]
            .iter()
            .rev()
            .find(|(_, c)| !c.is_whitespace())
            .is_some_and(|(_, c)| c.is_ascii_digit());
        let after = chars[pos + 1..]
            .iter()
            .find(|(_, c)| !c.is_whitespace())
            .is_some_and(|(_, c)| c.is_ascii_digit());
        if before && after {
            cuts.push((byte_idx, byte_idx + ch.len_utf8()));
        }
    }

    if cuts.is_empty() {
        return None;
    }

    let mut parts = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for (cut_start, cut_end) in cuts {
        parts.push(&text[start..cut_start]);
        start = cut_end;
    }
    parts.push(&text[start..]);

    Some(
        parts
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect(),
    )
}

/// Normalizes one amount (no range handling).
fn normalize_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let has_dot = cleaned.contains('.');
    let has_comma = cleaned.contains(',');

    let decimal_sep = if has_dot && has_comma {
        let last_dot = cleaned.rfind('.');
        let last_comma = cleaned.rfind(',');
        Some(if last_comma > last_dot { ',' } else { '.' })
    } else if has_dot || has_comma {
        let sep = if has_dot { '.' } else { ',' };
        let tail_len = cleaned.rsplit(sep).next().map_or(0, str::len);
        matches!(tail_len, 1 | 2).then_some(sep)
    } else {
        None
    };

    let number = match decimal_sep {
        Some(sep) => {
            let (int_part, dec_part) = cleaned.rsplit_once(sep)?;
            let int_digits = only_digits(int_part);
            let dec_digits = only_digits(dec_part);
            if int_digits.is_empty() && dec_digits.is_empty() {
                return None;
            }
            format!(
                "{}.{}",
                if int_digits.is_empty() { "0" } else { &int_digits },
                if dec_digits.is_empty() { "0" } else { &dec_digits }
            )
        }
        None => {
            let digits = only_digits(&cleaned);
            if digits.is_empty() {
                return None;
            }
            digits
        }
    };

    number.parse::<f64>().ok()
}

fn only_digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Rounds half-to-even and clamps into `u64`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn f64_to_count(value: f64) -> u64 {
    let rounded = value.round_ties_even();
    if !rounded.is_finite() || rounded <= 0.0 {
        0
    } else if rounded >= u64::MAX as f64 {
        u64::MAX
    } else {
        rounded as u64
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
