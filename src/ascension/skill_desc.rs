//! Placeholder extraction from free-text skill descriptions.
//!
//! Innate skill descriptions reference their numbers through `{N}` tokens
//! that index into the skill's `param` list, e.g. `莫宁的共鸣效率提升{4}`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of characters after the matched phrase that are searched for a placeholder.
pub const PLACEHOLDER_WINDOW: usize = 20;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(\d+)\}").expect("placeholder pattern is a valid regex")
});

static DECIMAL_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d$").expect("digit pattern is a valid regex"));

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// Numeric value of a Unicode decimal digit (`4`, `４`, `٤`).
///
/// Decimal digits are encoded in contiguous runs of ten starting at zero, so
/// the value is the offset from the start of the run modulo ten.
fn decimal_digit_value(c: char) -> Option<u32> {
    if let Some(value) = c.to_digit(10) {
        return Some(value);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let code = u32::from(c);
    let mut start = code;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((code - start) % 10)
}

/// Placeholder digits as an index. Values past `usize` saturate so the
/// caller sees an out-of-range param rather than a wrapped one.
fn placeholder_index(digits: &str) -> usize {
    digits
        .chars()
        .filter_map(decimal_digit_value)
        .fold(0usize, |acc, digit| {
            acc.saturating_mul(10).saturating_add(digit as usize)
        })
}

/// Index of the `{N}` placeholder that follows `search_pattern` in `description`.
///
/// Returns 0 when the pattern is absent or no placeholder appears within
/// [PLACEHOLDER_WINDOW] characters after it; callers treat 0 as "first param".
pub fn extract_param_index(description: &str, search_pattern: &str) -> usize {
    let Some(start) = description.find(search_pattern) else {
        return 0;
    };
    let rest = &description[start + search_pattern.len()..];
    let end = rest
        .char_indices()
        .nth(PLACEHOLDER_WINDOW)
        .map_or(rest.len(), |(offset, _)| offset);

    PLACEHOLDER
        .captures(&rest[..end])
        .and_then(|caps| caps.get(1))
        .map_or(0, |index| placeholder_index(index.as_str()))
}
