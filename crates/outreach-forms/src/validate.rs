//! Validation rules
//!
//! Pure, deterministic rule evaluation for single fields and whole forms.
//! Every field is always evaluated so the UI can show all errors at once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::fields::{FieldKind, FieldSpec, FieldValues};
use crate::domain::form::FormDefinition;
use crate::domain::value_objects::{EmailAddress, PhoneNumber};

/// Why a field failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    Required,
    InvalidFormat,
    TooShort,
    NotPositive,
    NotSelected,
}

/// Verdict for one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReport {
    pub field: String,
    pub valid: bool,
    pub reason: Option<RejectReason>,
}

impl FieldReport {
    fn ok(field: &str) -> Self {
        Self {
            field: field.to_string(),
            valid: true,
            reason: None,
        }
    }

    fn fail(field: &str, reason: RejectReason) -> Self {
        Self {
            field: field.to_string(),
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Aggregate verdict for a whole form.
///
/// `all_valid` is derived from the per-field reports at construction, so the
/// two can never disagree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    all_valid: bool,
    per_field: BTreeMap<String, FieldReport>,
}

impl ValidationReport {
    pub fn from_reports(reports: impl IntoIterator<Item = FieldReport>) -> Self {
        let per_field: BTreeMap<String, FieldReport> = reports
            .into_iter()
            .map(|r| (r.field.clone(), r))
            .collect();
        let all_valid = per_field.values().all(|r| r.valid);
        Self {
            all_valid,
            per_field,
        }
    }

    pub fn all_valid(&self) -> bool {
        self.all_valid
    }

    pub fn field(&self, name: &str) -> Option<&FieldReport> {
        self.per_field.get(name)
    }

    pub fn reports(&self) -> impl Iterator<Item = &FieldReport> {
        self.per_field.values()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FieldReport> {
        self.per_field.values().filter(|r| !r.valid)
    }
}

/// Rule evaluator for a single field.
pub struct FieldValidator;

impl FieldValidator {
    /// Evaluate one field against its spec. Pure, no side effects.
    pub fn validate(spec: &FieldSpec, raw: &str) -> FieldReport {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            if spec.required {
                let reason = match spec.kind {
                    FieldKind::Select => RejectReason::NotSelected,
                    _ => RejectReason::Required,
                };
                return FieldReport::fail(&spec.name, reason);
            }
            // Optional and empty: vacuously valid.
            return FieldReport::ok(&spec.name);
        }

        match spec.kind {
            FieldKind::Email => match EmailAddress::parse(trimmed) {
                Ok(_) => FieldReport::ok(&spec.name),
                Err(_) => FieldReport::fail(&spec.name, RejectReason::InvalidFormat),
            },
            FieldKind::Tel => match PhoneNumber::parse(trimmed) {
                Ok(_) => FieldReport::ok(&spec.name),
                Err(_) => FieldReport::fail(&spec.name, RejectReason::InvalidFormat),
            },
            FieldKind::Number => match trimmed.parse::<f64>() {
                Ok(value) if !value.is_finite() => {
                    FieldReport::fail(&spec.name, RejectReason::InvalidFormat)
                }
                Ok(value) if spec.positive_only && value <= 0.0 => {
                    FieldReport::fail(&spec.name, RejectReason::NotPositive)
                }
                Ok(_) => FieldReport::ok(&spec.name),
                Err(_) => FieldReport::fail(&spec.name, RejectReason::InvalidFormat),
            },
            FieldKind::Text | FieldKind::Textarea => match spec.min_length {
                Some(min) if trimmed.chars().count() < min => {
                    FieldReport::fail(&spec.name, RejectReason::TooShort)
                }
                _ => FieldReport::ok(&spec.name),
            },
            FieldKind::Select => match &spec.options {
                // A value an HTML select cannot produce; API callers can.
                Some(options) if !options.iter().any(|o| o == trimmed) => {
                    FieldReport::fail(&spec.name, RejectReason::InvalidFormat)
                }
                _ => FieldReport::ok(&spec.name),
            },
        }
    }
}

/// Aggregates field verdicts for a whole form.
pub struct FormValidator;

impl FormValidator {
    /// Evaluate every field of the form. Missing values are treated as empty.
    ///
    /// Never short-circuits: the UI shows all simultaneous errors, not just
    /// the first.
    pub fn validate(form: &FormDefinition, values: &FieldValues) -> ValidationReport {
        ValidationReport::from_reports(form.fields().iter().map(|spec| {
            let raw = values.get(&spec.name).map(String::as_str).unwrap_or("");
            FieldValidator::validate(spec, raw)
        }))
    }

    /// Evaluate a single named field, for incremental (on-blur) checks.
    ///
    /// Returns `None` when the form has no field with that name.
    pub fn validate_one(form: &FormDefinition, name: &str, raw: &str) -> Option<FieldReport> {
        form.field(name).map(|spec| FieldValidator::validate(spec, raw))
    }
}
