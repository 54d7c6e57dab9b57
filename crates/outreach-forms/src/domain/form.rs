//! Form definitions and the built-in catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::fields::{FieldKind, FieldSpec};

/// The three forms the site serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Contact,
    Donation,
    Volunteer,
}

impl FormKind {
    /// Logical table the form's submissions land in.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Contact => "contact_form",
            Self::Donation => "donations",
            Self::Volunteer => "volunteers",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Donation => "donation",
            Self::Volunteer => "volunteer",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered, immutable set of field specs for one form.
///
/// Built once when the page is rendered and stable for the page's lifetime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormDefinition {
    kind: FormKind,
    fields: Vec<FieldSpec>,
}

impl FormDefinition {
    /// Build a definition from ordered specs. Field names must be unique.
    pub fn new(kind: FormKind, fields: Vec<FieldSpec>) -> Self {
        debug_assert!(
            {
                let mut names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                names.sort_unstable();
                names.windows(2).all(|w| w[0] != w[1])
            },
            "duplicate field name in form definition"
        );
        Self { kind, fields }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The contact form: name, phone, email, message.
    pub fn contact() -> Self {
        Self::new(
            FormKind::Contact,
            vec![
                FieldSpec::new("name", FieldKind::Text).required().min_length(2),
                FieldSpec::new("phone", FieldKind::Tel).required(),
                FieldSpec::new("email", FieldKind::Email).required(),
                FieldSpec::new("message", FieldKind::Textarea).required().min_length(10),
            ],
        )
    }

    /// The donation form: name, phone, email, amount, currency.
    pub fn donation() -> Self {
        Self::new(
            FormKind::Donation,
            vec![
                FieldSpec::new("name", FieldKind::Text).required().min_length(2),
                FieldSpec::new("phone", FieldKind::Tel).required(),
                FieldSpec::new("email", FieldKind::Email).required(),
                FieldSpec::new("amount", FieldKind::Number).required().positive_only(),
                FieldSpec::new("currency", FieldKind::Select)
                    .required()
                    .options(["USD", "EUR", "GBP"]),
            ],
        )
    }

    /// The volunteer signup form: name, phone, email, location, motivation.
    pub fn volunteer() -> Self {
        Self::new(
            FormKind::Volunteer,
            vec![
                FieldSpec::new("name", FieldKind::Text).required().min_length(2),
                FieldSpec::new("phone", FieldKind::Tel).required(),
                FieldSpec::new("email", FieldKind::Email).required(),
                FieldSpec::new("location", FieldKind::Text).required().min_length(3),
                FieldSpec::new("motivation", FieldKind::Textarea).required().min_length(10),
            ],
        )
    }
}
