//! Outreach Persistence Boundary
//!
//! The insert-only storage side of the form pipeline:
//!
//! - **Wire types**: `SubmissionRequest` / `InsertReceipt`
//! - **Port**: the `SubmissionGateway` trait the pipeline submits through
//! - **Records**: typed rows bound from named field values, never built from
//!   interpolated command text
//! - **Store**: `MemoryStore`, a dashmap-backed append-only implementation
//!
//! There is no update, delete, or query surface: accepted submissions are
//! rows that only ever get created.

pub mod gateway;
pub mod memory;
pub mod record;

pub use gateway::{GatewayError, InsertReceipt, SubmissionGateway, SubmissionRequest};
pub use memory::MemoryStore;
pub use record::{BindError, ContactRow, DonationRow, RecordRow, StoredRecord, VolunteerRow};
