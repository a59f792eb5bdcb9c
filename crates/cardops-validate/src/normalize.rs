//! Atomic field transforms and checks.
//!
//! Transforms return the rewritten value; checks return `bool`. Every
//! transform is idempotent.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// `DD/MM/YYYY` with day 01-31 and month 01-12. No calendar check.
static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|[12][0-9]|3[01])/(0[1-9]|1[0-2])/\d{4}$").expect("Invalid date regex")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid e-mail regex")
});

pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn alphanumeric_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Collapse whitespace, lowercase, then capitalize each word.
///
/// With `strip_diacritics`, accents are removed first (`"Gestão"` → `"Gestao"`).
/// The result is NFC so case mapping never leaves a bare combining mark
/// (`"İsa"` lowercases to `i` + U+0307).
pub fn title_case(value: &str, strip_diacritics: bool) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let word = if strip_diacritics {
                remove_diacritics(word)
            } else {
                word.to_string()
            };
            capitalize(&word.to_lowercase())
        })
        .collect::<Vec<_>>()
        .join(" ")
        .nfc()
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn remove_diacritics(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Two-pass modulo-11 CPF check. Sequences of one repeated digit are
/// rejected even though their check digits add up.
pub fn is_valid_cpf(value: &str) -> bool {
    let Some(digits) = value
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
    else {
        return false;
    };
    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }
    cpf_check_digit(&digits[..9]) == digits[9] && cpf_check_digit(&digits[..10]) == digits[10]
}

fn cpf_check_digit(digits: &[u32]) -> u32 {
    let weight_start = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .zip((2..=weight_start).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();
    let remainder = (sum * 10) % 11;
    if remainder == 10 { 0 } else { remainder }
}

/// Letters (ASCII or Latin-1/Latin Extended-A), apostrophes and whitespace.
pub fn is_name_shape(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| {
            c.is_ascii_alphabetic()
                || ('\u{00C0}'..='\u{017F}').contains(&c)
                || c == '\''
                || c.is_whitespace()
        })
}

/// At least two words: an interior whitespace after trimming.
pub fn is_full_name(value: &str) -> bool {
    value.trim().contains(char::is_whitespace)
}

pub fn is_date_shape(value: &str) -> bool {
    DATE_REGEX.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Parse a money amount and render it with two decimals and `.`.
///
/// Currency symbols and spaces are ignored. When both `.` and `,` appear,
/// the last one is the decimal separator and the other groups thousands; a
/// separator that repeats is a thousands separator. Any minus sign, zero or
/// an amount that rounds to zero cents, or an unparseable amount yields
/// `None`.
pub fn parse_positive_decimal(value: &str) -> Option<String> {
    if value.contains('-') {
        return None;
    }
    let kept: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if !kept.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let normalized = match (kept.rfind('.'), kept.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (integer, fraction) = kept.split_at(dot.max(comma));
            format!("{}.{}", strip_separators(integer), strip_separators(fraction))
        }
        (Some(_), None) => single_separator(&kept, '.'),
        (None, Some(_)) => single_separator(&kept, ','),
        (None, None) => kept,
    };
    let amount: f64 = normalized.parse().ok()?;
    let cents = (amount * 100.0).round();
    if !cents.is_finite() || cents <= 0.0 {
        return None;
    }
    Some(format!("{:.2}", cents / 100.0))
}

fn strip_separators(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn single_separator(value: &str, separator: char) -> String {
    if value.matches(separator).count() > 1 {
        value.replace(separator, "")
    } else {
        value.replace(separator, ".")
    }
}

/// Case-insensitive lookup returning the set's own spelling.
pub fn match_one_of<'a>(value: &str, allowed: &'a [String]) -> Option<&'a str> {
    let needle = value.trim().to_lowercase();
    allowed
        .iter()
        .find(|candidate| candidate.to_lowercase() == needle)
        .map(String::as_str)
}
