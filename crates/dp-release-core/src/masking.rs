//! Structured Identifier Masking
//!
//! Irreversible partial redaction of identifier-like cells. Every format keeps
//! a short fixed-length suffix (and, for phones, prefix) and replaces the rest
//! with a constant marker, so the masked length does not reveal the original
//! length.
//!
//! | Format      | Applies when            | Output                                  |
//! |-------------|-------------------------|-----------------------------------------|
//! | National ID | at least 4 characters   | `************` + last 4                 |
//! | Phone       | at least 10 characters  | first 2 + `******` + last 2             |
//! | Email       | contains `@`            | `*********` + last 4 of local + `@` + domain |
//!
//! Cells that do not qualify, including nulls, pass through unchanged.

use crate::table::{Column, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker preceding the kept suffix of a national ID
pub const NATIONAL_ID_MARKER: &str = "************";

/// Marker between the kept ends of a phone number
pub const PHONE_MARKER: &str = "******";

/// Marker preceding the kept tail of an email local part
pub const EMAIL_MARKER: &str = "*********";

/// Minimum length for a national ID to be masked
pub const NATIONAL_ID_MIN_LEN: usize = 4;

/// Minimum length for a phone number to be masked
pub const PHONE_MIN_LEN: usize = 10;

/// Identifier formats the masker understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaskFormat {
    NationalId,
    Phone,
    Email,
}

impl fmt::Display for MaskFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskFormat::NationalId => write!(f, "national-id"),
            MaskFormat::Phone => write!(f, "phone"),
            MaskFormat::Email => write!(f, "email"),
        }
    }
}

/// Format-aware masker for identifier columns
pub struct StructuredMasker;

impl StructuredMasker {
    /// Mask a single string in the given format.
    ///
    /// Returns `None` when the input does not qualify for masking.
    pub fn mask_str(raw: &str, format: MaskFormat) -> Option<String> {
        match format {
            MaskFormat::NationalId => mask_national_id(raw),
            MaskFormat::Phone => mask_phone(raw),
            MaskFormat::Email => mask_email(raw),
        }
    }

    /// Mask a single cell. Numbers are masked through their textual form.
    pub fn mask_value(value: &Value, format: MaskFormat) -> Value {
        let raw = match value {
            Value::Null => return Value::Null,
            Value::Text(s) => s.clone(),
            Value::Number(_) => value.to_string(),
        };

        match Self::mask_str(&raw, format) {
            Some(masked) => Value::Text(masked),
            None => value.clone(),
        }
    }

    /// Mask every cell of a column, producing a new column
    pub fn mask_column(column: &Column, format: MaskFormat) -> Column {
        let values = column
            .values()
            .iter()
            .map(|v| Self::mask_value(v, format))
            .collect();
        column.with_values(values)
    }
}

fn mask_national_id(raw: &str) -> Option<String> {
    if raw.chars().count() < NATIONAL_ID_MIN_LEN {
        return None;
    }
    Some(format!("{}{}", NATIONAL_ID_MARKER, last_chars(raw, 4)))
}

fn mask_phone(raw: &str) -> Option<String> {
    if raw.chars().count() < PHONE_MIN_LEN {
        return None;
    }
    Some(format!(
        "{}{}{}",
        first_chars(raw, 2),
        PHONE_MARKER,
        last_chars(raw, 2)
    ))
}

// Local part ends at the first '@', domain starts after the last one.
fn mask_email(raw: &str) -> Option<String> {
    let first_at = raw.find('@')?;
    let last_at = raw.rfind('@')?;
    let local = &raw[..first_at];
    let domain = &raw[last_at + 1..];

    Some(format!("{}{}@{}", EMAIL_MARKER, last_chars(local, 4), domain))
}

/// Up to the last `n` characters of `s`
fn last_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    if count <= n {
        return s;
    }
    match s.char_indices().nth(count - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// Up to the first `n` characters of `s`
fn first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
