//! Submission controller.
//!
//! One controller per rendered form. It owns the form's entered values, the
//! attempt counter, and the lifecycle: validate synchronously, hand valid
//! submissions to the gateway, race the response against the deadline, and
//! drive the presenter with whatever comes back.
//!
//! Admission is single-flight: while an attempt is in flight, further
//! submits are rejected outright. Outcomes are applied only while the
//! controller is still waiting on that exact attempt; anything else is
//! discarded, so a late response from a timed-out attempt can never
//! override newer state.

use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::time::Instant;
use uuid::Uuid;

use outreach_forms::{FieldReport, FieldValues, FormDefinition, FormValidator};
use outreach_store::{GatewayError, SubmissionGateway, SubmissionRequest};

use crate::config::PipelineConfig;
use crate::notify::NotificationPresenter;
use crate::outcome::{FailureKind, SubmissionOutcome};

/// Externally observable controller phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed(FailureKind),
}

/// Admission rejection. Not an outcome: nothing is presented and no state
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    InFlight,
}

enum Phase {
    Idle,
    Validating,
    Submitting { attempt: u64 },
    Succeeded { since: Instant },
    Failed(FailureKind),
}

struct ControllerState {
    phase: Phase,
    /// Last allocated attempt number; 0 means no attempt yet.
    attempt: u64,
    values: FieldValues,
    idempotency_key: Uuid,
}

/// Orchestrates the submission lifecycle for one form instance.
pub struct SubmissionController {
    form: Arc<FormDefinition>,
    gateway: Arc<dyn SubmissionGateway>,
    presenter: Arc<NotificationPresenter>,
    config: PipelineConfig,
    state: Arc<Mutex<ControllerState>>,
}

impl SubmissionController {
    pub fn new(
        form: FormDefinition,
        gateway: Arc<dyn SubmissionGateway>,
        config: PipelineConfig,
    ) -> Self {
        let form = Arc::new(form);
        let presenter = Arc::new(NotificationPresenter::new(
            form.clone(),
            config.banner_auto_dismiss,
        ));
        Self {
            form,
            gateway,
            presenter,
            config,
            state: Arc::new(Mutex::new(ControllerState {
                phase: Phase::Idle,
                attempt: 0,
                values: FieldValues::new(),
                idempotency_key: Uuid::new_v4(),
            })),
        }
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn presenter(&self) -> &NotificationPresenter {
        &self.presenter
    }

    /// Current phase. A finished success hold reads as `Idle`.
    pub fn phase(&self) -> FormPhase {
        let state = self.state.lock();
        match &state.phase {
            Phase::Idle => FormPhase::Idle,
            Phase::Validating => FormPhase::Validating,
            Phase::Submitting { .. } => FormPhase::Submitting,
            Phase::Succeeded { since } => {
                if since.elapsed() >= self.config.success_hold {
                    FormPhase::Idle
                } else {
                    FormPhase::Succeeded
                }
            }
            Phase::Failed(kind) => FormPhase::Failed(*kind),
        }
    }

    /// Last allocated attempt number.
    pub fn attempt(&self) -> u64 {
        self.state.lock().attempt
    }

    /// Key that will accompany the next submission of the current values.
    pub fn idempotency_key(&self) -> Uuid {
        self.state.lock().idempotency_key
    }

    /// Record a field edit. Changing any value starts a new logical
    /// submission, so the idempotency key rotates.
    pub fn set_field(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let mut state = self.state.lock();
        if state.values.get(&name).map(String::as_str) == Some(value.as_str()) {
            return;
        }
        state.values.insert(name, value);
        state.idempotency_key = Uuid::new_v4();
    }

    /// Snapshot of the entered values.
    pub fn values(&self) -> FieldValues {
        self.state.lock().values.clone()
    }

    pub fn field(&self, name: &str) -> Option<String> {
        self.state.lock().values.get(name).cloned()
    }

    /// Validate a single field against its current value and refresh its
    /// inline message, the way the site checks fields on blur.
    pub fn validate_field(&self, name: &str) -> Option<FieldReport> {
        let raw = self
            .state
            .lock()
            .values
            .get(name)
            .cloned()
            .unwrap_or_default();
        let report = FormValidator::validate_one(&self.form, name, &raw)?;
        self.presenter.update_field(&report);
        Some(report)
    }

    /// Run one submission attempt to completion.
    ///
    /// Returns `Err(SubmitError::InFlight)` without consuming an attempt
    /// number when another submission is still in flight.
    pub async fn submit(&self) -> Result<SubmissionOutcome, SubmitError> {
        let (attempt, request) = {
            let mut state = self.state.lock();
            if matches!(state.phase, Phase::Submitting { .. }) {
                tracing::debug!(form = %self.form.kind(), "submit ignored, attempt in flight");
                return Err(SubmitError::InFlight);
            }

            state.attempt += 1;
            let attempt = state.attempt;
            state.phase = Phase::Validating;

            let report = FormValidator::validate(&self.form, &state.values);
            if !report.all_valid() {
                tracing::info!(
                    form = %self.form.kind(),
                    attempt,
                    failures = report.failures().count(),
                    "submission rejected by validation"
                );
                state.phase = Phase::Failed(FailureKind::Rejected);
                let outcome = SubmissionOutcome::Rejected(report);
                self.presenter.present(&outcome);
                state.phase = Phase::Idle;
                return Ok(outcome);
            }

            state.phase = Phase::Submitting { attempt };
            let request = SubmissionRequest {
                form: self.form.kind(),
                values: state.values.clone(),
                attempt,
                idempotency_key: state.idempotency_key,
            };
            (attempt, request)
        };

        tracing::info!(form = %self.form.kind(), attempt, "submitting");

        // The insert runs in its own task and applies its outcome itself:
        // a deadline here must not cancel the wire call, and the late
        // result still has to hit the stale check.
        let (done_tx, mut done_rx) = oneshot::channel();
        {
            let gateway = self.gateway.clone();
            let state = self.state.clone();
            let presenter = self.presenter.clone();
            tokio::spawn(async move {
                let outcome = match gateway.insert(request).await {
                    Ok(receipt) => SubmissionOutcome::Success {
                        confirmation: receipt.confirmation,
                    },
                    Err(GatewayError::Unreachable) => SubmissionOutcome::NetworkError,
                    Err(GatewayError::Rejected { code }) => SubmissionOutcome::ServerError { code },
                };
                apply_outcome(&state, &presenter, attempt, &outcome);
                let _ = done_tx.send(outcome);
            });
        }

        tokio::select! {
            response = &mut done_rx => match response {
                Ok(outcome) => Ok(outcome),
                Err(_) => {
                    // The insert task died before resolving; the wire call
                    // is as good as lost.
                    tracing::warn!(form = %self.form.kind(), attempt, "submission task dropped");
                    let outcome = SubmissionOutcome::NetworkError;
                    apply_outcome(&self.state, &self.presenter, attempt, &outcome);
                    Ok(outcome)
                }
            },
            _ = tokio::time::sleep(self.config.submit_timeout) => {
                let outcome = SubmissionOutcome::TimedOut;
                if apply_outcome(&self.state, &self.presenter, attempt, &outcome) {
                    tracing::warn!(form = %self.form.kind(), attempt, "submission deadline elapsed");
                    Ok(outcome)
                } else {
                    // The response beat the deadline to the state lock;
                    // report what actually happened.
                    match done_rx.await {
                        Ok(outcome) => Ok(outcome),
                        Err(_) => Ok(SubmissionOutcome::TimedOut),
                    }
                }
            }
        }
    }
}

/// Apply an attempt's outcome, unless the controller has moved on.
///
/// Returns false when the outcome was discarded. The attempt guard is the
/// only synchronization between the deadline and the response: whichever
/// gets here first while the controller still waits on `attempt` wins, and
/// everything after that is stale.
fn apply_outcome(
    state: &Mutex<ControllerState>,
    presenter: &NotificationPresenter,
    attempt: u64,
    outcome: &SubmissionOutcome,
) -> bool {
    let mut state = state.lock();
    match state.phase {
        Phase::Submitting { attempt: current } if current == attempt => {}
        _ => {
            tracing::debug!(attempt, "discarding stale submission outcome");
            return false;
        }
    }

    match outcome {
        SubmissionOutcome::Success { .. } => {
            state.phase = Phase::Succeeded {
                since: Instant::now(),
            };
            state.values.clear();
            // The accepted values are spent; the next submission is a new
            // logical one.
            state.idempotency_key = Uuid::new_v4();
            presenter.present(outcome);
        }
        other => {
            if let Some(kind) = other.failure_kind() {
                state.phase = Phase::Failed(kind);
                presenter.present(other);
                state.phase = Phase::Idle;
            }
        }
    }
    true
}
