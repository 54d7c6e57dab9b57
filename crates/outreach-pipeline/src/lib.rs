//! Outreach Submission Pipeline
//!
//! The lifecycle between "user pressed submit" and "user saw the result":
//!
//! - **SubmissionController**: per-form state machine with single-flight
//!   admission control, a submit deadline, and stale-response discard
//! - **NotificationPresenter**: maps outcomes to the banner and the inline
//!   per-field messages
//! - **PipelineConfig**: the few knobs that exist (submit timeout, success
//!   hold, banner auto-dismiss)
//!
//! One controller instance exists per rendered form and lives for the page's
//! duration. Nothing in this pipeline is fatal; every failure returns the
//! controller to `Idle` so the user can edit and resubmit.

pub mod config;
pub mod controller;
pub mod notify;
pub mod outcome;

pub use config::PipelineConfig;
pub use controller::{FormPhase, SubmissionController, SubmitError};
pub use notify::{Banner, BannerCategory, NotificationPresenter};
pub use outcome::{FailureKind, SubmissionOutcome};
