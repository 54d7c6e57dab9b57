//! Email Address Value Object
//!
//! Validated email address in `local@domain.tld` shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Email address value object with validation.
///
/// Accepts the shape the site's forms accept: a nonempty local part, a single
/// `@`, and a dotted domain, with no whitespace anywhere. Case is preserved.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and validate an email address. Surrounding whitespace is trimmed.
    pub fn parse(value: impl Into<String>) -> Result<Self, EmailError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(EmailError::Empty);
        }

        if !Self::well_formed(&value) {
            return Err(EmailError::Malformed);
        }

        Ok(Self(value))
    }

    /// Wrap a string without validation (for records already persisted).
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Domain part (after `@`).
    pub fn domain(&self) -> Option<&str> {
        self.0.split('@').nth(1)
    }

    /// Local part (before `@`).
    pub fn local_part(&self) -> Option<&str> {
        self.0.split('@').next()
    }

    fn well_formed(value: &str) -> bool {
        if value.chars().any(char::is_whitespace) {
            return false;
        }

        // Exactly one separator with content on both sides.
        let parts: Vec<&str> = value.split('@').collect();
        if parts.len() != 2 {
            return false;
        }
        let (local, domain) = (parts[0], parts[1]);
        if local.is_empty() || domain.is_empty() {
            return false;
        }

        // The domain must carry a dot with content on both sides of it.
        match domain.rfind('.') {
            Some(dot) => dot > 0 && dot + 1 < domain.len(),
            None => false,
        }
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    Empty,
    Malformed,
}

impl std::error::Error for EmailError {}

impl fmt::Display for EmailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Email address cannot be empty"),
            Self::Malformed => write!(f, "Invalid email address format"),
        }
    }
}
