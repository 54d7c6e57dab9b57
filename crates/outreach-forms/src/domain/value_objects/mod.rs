//! Value Objects module
//!
//! Immutable, validated domain primitives.

pub mod email;
pub mod phone;

pub use email::{EmailAddress, EmailError};
pub use phone::{PhoneError, PhoneNumber};
