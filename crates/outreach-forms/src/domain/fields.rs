//! Field model: kinds, specs, and raw values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw field values as entered by the user, keyed by field name.
pub type FieldValues = BTreeMap<String, String>;

/// The input kinds the site's forms use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Number,
    Select,
    Textarea,
}

/// Specification of one form field.
///
/// Names are unique within a form. The spec is immutable once the owning
/// `FormDefinition` is built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Minimum trimmed length, applied to text and textarea fields.
    pub min_length: Option<usize>,
    /// Number fields must parse to a value strictly greater than zero.
    pub positive_only: bool,
    /// Declared choices for select fields.
    pub options: Option<Vec<String>>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            min_length: None,
            positive_only: false,
            options: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn positive_only(mut self) -> Self {
        self.positive_only = true;
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }
}
