//! Human-facing identifiers: phone numbers, national IDs and login handles.
//!
//! Phone numbers and national IDs (NIK) double as login identifiers, so both are
//! normalised before they reach either store. Two spellings of the same number
//! must never produce two accounts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum number of digits in a normalised phone number.
pub const PHONE_MIN_DIGITS: usize = 10;

/// Maximum number of digits in a normalised phone number.
pub const PHONE_MAX_DIGITS: usize = 15;

/// Exact number of digits in a national ID (NIK).
pub const NATIONAL_ID_DIGITS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("nomor HP tidak valid")]
    InvalidPhone,
    #[error("NIK harus terdiri dari 16 digit angka")]
    InvalidNationalId,
}

/// Normalised mobile phone number, always starting with `08`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a phone number, accepting `08…`, `628…` and `+628…` spellings
    /// with spaces or dashes between digit groups.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let compact: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();
        let digits = compact.strip_prefix('+').unwrap_or(&compact);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(IdentifierError::InvalidPhone);
        }
        let local = match digits.strip_prefix("62") {
            Some(rest) => format!("0{rest}"),
            None => digits.to_owned(),
        };
        if !local.starts_with("08")
            || local.len() < PHONE_MIN_DIGITS
            || local.len() > PHONE_MAX_DIGITS
        {
            return Err(IdentifierError::InvalidPhone);
        }
        Ok(Self(local))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Indonesian national ID number (NIK): 16 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let trimmed = raw.trim();
        if trimmed.len() != NATIONAL_ID_DIGITS || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(IdentifierError::InvalidNationalId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which identifier the login handle is synthesised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginSource {
    #[default]
    Phone,
    NationalId,
}

/// Login handle registered with the identity store: `"<identifier>@<domain>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoginHandle(String);

impl LoginHandle {
    pub fn new(identifier: &str, domain: &str) -> Self {
        Self(format!("{identifier}@{domain}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier part, without the domain.
    pub fn identifier(&self) -> &str {
        self.0.split_once('@').map_or(&self.0, |(local, _)| local)
    }
}

impl fmt::Display for LoginHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
