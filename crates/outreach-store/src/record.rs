//! Typed persisted records.
//!
//! Each accepted submission becomes one row in its form's table. Rows are
//! built by binding named values into typed structs; there is no command
//! text for user input to leak into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use outreach_forms::{FieldValues, FormKind};

/// Row in `contact_form`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactRow {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
}

/// Row in `donations`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DonationRow {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub amount: f64,
    pub currency: String,
}

/// Row in `volunteers`.
///
/// The table keeps the signup's motivation text in its `message` column;
/// the location answer participates in validation only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolunteerRow {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
}

/// A typed row for one of the three tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum RecordRow {
    Contact(ContactRow),
    Donation(DonationRow),
    Volunteer(VolunteerRow),
}

impl RecordRow {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Contact(_) => FormKind::Contact.table(),
            Self::Donation(_) => FormKind::Donation.table(),
            Self::Volunteer(_) => FormKind::Volunteer.table(),
        }
    }

    /// Bind named field values into the typed row for `kind`.
    ///
    /// Fails when a required column is missing or blank, or a value does not
    /// fit the column type. Callers surface these as opaque server faults.
    pub fn bind(kind: FormKind, values: &FieldValues) -> Result<Self, BindError> {
        match kind {
            FormKind::Contact => Ok(Self::Contact(ContactRow {
                name: column(values, "name")?,
                phone: column(values, "phone")?,
                email: column(values, "email")?,
                message: column(values, "message")?,
            })),
            FormKind::Donation => {
                let amount = column(values, "amount")?
                    .parse::<f64>()
                    .map_err(|_| BindError::MalformedValue("amount"))?;
                Ok(Self::Donation(DonationRow {
                    name: column(values, "name")?,
                    phone: column(values, "phone")?,
                    email: column(values, "email")?,
                    amount,
                    currency: column(values, "currency")?,
                }))
            }
            FormKind::Volunteer => Ok(Self::Volunteer(VolunteerRow {
                name: column(values, "name")?,
                phone: column(values, "phone")?,
                email: column(values, "email")?,
                message: column(values, "motivation")?,
            })),
        }
    }
}

fn column(values: &FieldValues, name: &'static str) -> Result<String, BindError> {
    values
        .get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(BindError::MissingColumn(name))
}

/// One persisted row plus its creation metadata. Never updated or deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub row: RecordRow,
}

impl StoredRecord {
    pub fn new(row: RecordRow) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            row,
        }
    }
}

/// Structural binding failure. The code is what callers may surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("malformed value for column: {0}")]
    MalformedValue(&'static str),
}

impl BindError {
    /// Opaque, stable code safe to show outside the storage boundary.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingColumn(_) => "ERR_SCHEMA",
            Self::MalformedValue(_) => "ERR_BIND",
        }
    }
}
