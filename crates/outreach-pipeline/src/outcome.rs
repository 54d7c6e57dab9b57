//! Submission outcomes.

use serde::{Deserialize, Serialize};

use outreach_forms::ValidationReport;

/// How a failed attempt failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Rejected,
    Network,
    Timeout,
    Server,
}

/// Terminal result of one submission attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SubmissionOutcome {
    /// The insert was accepted; carries the server's confirmation text.
    Success { confirmation: String },
    /// Validation stopped the attempt before it reached the gateway.
    Rejected(ValidationReport),
    /// Transport could not reach the backend.
    NetworkError,
    /// The deadline elapsed before any response arrived. The backend may
    /// still have committed the row.
    TimedOut,
    /// The backend refused the insert; `code` is opaque.
    ServerError { code: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Rejected(_) => Some(FailureKind::Rejected),
            Self::NetworkError => Some(FailureKind::Network),
            Self::TimedOut => Some(FailureKind::Timeout),
            Self::ServerError { .. } => Some(FailureKind::Server),
        }
    }
}
