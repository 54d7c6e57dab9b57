//! Outreach Form Domain
//!
//! Field specifications, validated value objects, and the validation rules
//! shared by every form on the marketing site (contact, donation, volunteer).
//!
//! ## Architecture
//!
//! - **Value Objects**: Immutable, validated primitives (EmailAddress, PhoneNumber)
//! - **Field model**: `FieldSpec` / `FormDefinition`, typed at the boundary
//! - **Validation**: pure rule evaluation producing per-field reports
//!
//! This crate knows nothing about submission, persistence, or the network.

pub mod domain;
pub mod validate;

pub use domain::fields::{FieldKind, FieldSpec, FieldValues};
pub use domain::form::{FormDefinition, FormKind};
pub use domain::value_objects::{EmailAddress, EmailError, PhoneError, PhoneNumber};
pub use validate::{FieldReport, FieldValidator, FormValidator, RejectReason, ValidationReport};
