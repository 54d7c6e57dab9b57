//! Phone Number Value Object
//!
//! Validated phone number, formatting characters stripped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phone number value object.
///
/// Parsing strips spaces, dashes, dots, and parentheses, keeping digits and an
/// optional single leading `+`. The remaining digit run must be 7 to 15 digits
/// and must not start with zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber {
    digits: String,
    international: bool,
}

impl PhoneNumber {
    /// Parse a phone number from raw user input.
    pub fn parse(raw: &str) -> Result<Self, PhoneError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PhoneError::Empty);
        }

        let kept: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();

        let (international, digits) = match kept.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, kept.as_str()),
        };

        // A plus anywhere but the front is not a dialable number.
        if digits.contains('+') {
            return Err(PhoneError::MisplacedPlus);
        }

        if digits.len() < 7 || digits.len() > 15 {
            return Err(PhoneError::BadLength(digits.len()));
        }

        if digits.starts_with('0') {
            return Err(PhoneError::LeadingZero);
        }

        Ok(Self {
            digits: digits.to_string(),
            international,
        })
    }

    /// The digit run without any prefix.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Whether the number was entered with a leading `+`.
    pub fn is_international(&self) -> bool {
        self.international
    }

    /// Canonical dialable form: `+` prefix preserved when present.
    pub fn canonical(&self) -> String {
        if self.international {
            format!("+{}", self.digits)
        } else {
            self.digits.clone()
        }
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    Empty,
    BadLength(usize),
    LeadingZero,
    MisplacedPlus,
}

impl std::error::Error for PhoneError {}

impl fmt::Display for PhoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Phone number cannot be empty"),
            Self::BadLength(n) => write!(f, "Phone number has {} digits, expected 7 to 15", n),
            Self::LeadingZero => write!(f, "Phone number cannot start with zero"),
            Self::MisplacedPlus => write!(f, "Plus sign is only valid at the start"),
        }
    }
}
