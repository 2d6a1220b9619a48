//! Input predicates shared by the services and the front end.
//!
//! All functions are pure and total: they never fail, they only answer.

use crate::types::Email;

/// Number of digits in a CNPJ.
pub const TAX_ID_DIGITS: usize = 14;

/// Number of digits in a CEP.
pub const POSTAL_CODE_DIGITS: usize = 8;

/// Whether `s` has the shape `local@domain.tld`.
#[must_use]
pub fn is_valid_email(s: &str) -> bool {
    Email::parse(s).is_ok()
}

/// Whether every field is non-empty once trimmed.
#[must_use]
pub fn required_fields_filled(fields: &[&str]) -> bool {
    fields.iter().all(|f| !f.trim().is_empty())
}

/// Keeps only the ASCII digits of `s`.
#[must_use]
pub fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Whether `s` holds exactly 14 digits once separators are stripped.
///
/// No checksum validation is performed.
#[must_use]
pub fn is_valid_tax_id(s: &str) -> bool {
    digits(s).len() == TAX_ID_DIGITS
}

/// Formats a (possibly partial) CNPJ as `XX.XXX.XXX/XXXX-XX`.
///
/// Non-digits are dropped and input beyond 14 digits is truncated. A
/// separator is only emitted once a digit follows it, so the mask is stable
/// while the value is still being typed:
///
/// ```
/// use cafe_spot_core::validation::mask_tax_id;
///
/// assert_eq!(mask_tax_id("12"), "12");
/// assert_eq!(mask_tax_id("123"), "12.3");
/// assert_eq!(mask_tax_id("12345678000190"), "12.345.678/0001-90");
/// ```
#[must_use]
pub fn mask_tax_id(s: &str) -> String {
    let mut masked = String::with_capacity(18);
    for (i, d) in digits(s).chars().take(TAX_ID_DIGITS).enumerate() {
        match i {
            2 | 5 => masked.push('.'),
            8 => masked.push('/'),
            12 => masked.push('-'),
            _ => {}
        }
        masked.push(d);
    }
    masked
}

/// Digits of a CEP, or `None` unless exactly 8 remain.
#[must_use]
pub fn postal_code_digits(s: &str) -> Option<String> {
    let d = digits(s);
    (d.len() == POSTAL_CODE_DIGITS).then_some(d)
}
