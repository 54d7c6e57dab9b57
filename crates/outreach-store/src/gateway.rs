//! Submission gateway port.
//!
//! The outbound boundary the pipeline submits through. Implementations are
//! insert-only and must never surface raw backend diagnostics.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use outreach_forms::{FieldValues, FormKind};

/// One submission attempt, as handed to the gateway.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub form: FormKind,
    pub values: FieldValues,
    /// Attempt number within the submitting form instance.
    pub attempt: u64,
    /// Stable across retries of the same entered values; lets the backend
    /// drop duplicates when a timed-out insert actually committed.
    pub idempotency_key: Uuid,
}

/// Acknowledgement of an accepted insert.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsertReceipt {
    pub record_id: Uuid,
    /// Human-readable confirmation text for the submitter.
    pub confirmation: String,
    /// True when the idempotency key matched an earlier insert and no new
    /// row was created.
    pub deduplicated: bool,
}

/// Gateway-side failure.
///
/// `Rejected` carries an opaque code only; low-level diagnostic text stays
/// inside the storage boundary.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("backend unreachable")]
    Unreachable,

    #[error("insert rejected: {code}")]
    Rejected { code: String },
}

/// Abstract boundary to the backend insert endpoint.
///
/// Contract: insert-only. There is no update, delete, or read-back surface
/// in this pipeline.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    /// Persist one submission, returning a receipt with confirmation text.
    async fn insert(&self, request: SubmissionRequest) -> Result<InsertReceipt, GatewayError>;
}
