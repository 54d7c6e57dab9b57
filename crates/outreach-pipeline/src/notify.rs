//! Notification presentation.
//!
//! Maps submission outcomes to what the user actually sees: one global
//! banner at most, plus inline per-field messages for validation failures.
//! Transient banners expire `banner_auto_dismiss` after being shown;
//! validation messages persist until the field validates clean.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use outreach_forms::{FieldKind, FieldReport, FieldSpec, FormDefinition, RejectReason};

use crate::outcome::SubmissionOutcome;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BannerCategory {
    Success,
    Error,
}

/// The single global message slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub category: BannerCategory,
    pub text: String,
}

struct ActiveBanner {
    banner: Banner,
    shown_at: Instant,
}

/// Deterministic outcome-to-message mapping for one form.
pub struct NotificationPresenter {
    form: Arc<FormDefinition>,
    auto_dismiss: Duration,
    banner: Mutex<Option<ActiveBanner>>,
    field_messages: Mutex<BTreeMap<String, String>>,
}

impl NotificationPresenter {
    pub fn new(form: Arc<FormDefinition>, auto_dismiss: Duration) -> Self {
        Self {
            form,
            auto_dismiss,
            banner: Mutex::new(None),
            field_messages: Mutex::new(BTreeMap::new()),
        }
    }

    /// Present an outcome. A new global message replaces the prior one.
    pub fn present(&self, outcome: &SubmissionOutcome) {
        match outcome {
            SubmissionOutcome::Success { confirmation } => {
                self.field_messages.lock().clear();
                self.show(BannerCategory::Success, confirmation.clone());
            }
            SubmissionOutcome::Rejected(report) => {
                // Inline messages only; a stale banner from a prior attempt
                // would just compete with them.
                *self.banner.lock() = None;
                let mut messages = self.field_messages.lock();
                for field_report in report.reports() {
                    self.apply_report(&mut messages, field_report);
                }
            }
            SubmissionOutcome::NetworkError => {
                self.show(
                    BannerCategory::Error,
                    "Something went wrong while sending your submission. Please try again."
                        .to_string(),
                );
            }
            SubmissionOutcome::TimedOut => {
                self.show(
                    BannerCategory::Error,
                    "The request timed out. Please check your connection and try again."
                        .to_string(),
                );
            }
            SubmissionOutcome::ServerError { code } => {
                self.show(
                    BannerCategory::Error,
                    format!(
                        "We could not process your submission right now. Please try again later. (ref: {})",
                        code
                    ),
                );
            }
        }
    }

    /// Apply a single-field verdict, for incremental (on-blur) validation.
    pub fn update_field(&self, report: &FieldReport) {
        let mut messages = self.field_messages.lock();
        self.apply_report(&mut messages, report);
    }

    /// The currently visible banner, if any. Transient banners disappear
    /// once their auto-dismiss window has elapsed.
    pub fn banner(&self) -> Option<Banner> {
        let slot = self.banner.lock();
        match slot.as_ref() {
            Some(active) if active.shown_at.elapsed() < self.auto_dismiss => {
                Some(active.banner.clone())
            }
            _ => None,
        }
    }

    /// Dismiss the current banner immediately.
    pub fn dismiss(&self) {
        *self.banner.lock() = None;
    }

    /// Inline message for one field, if it currently fails validation.
    pub fn field_message(&self, name: &str) -> Option<String> {
        self.field_messages.lock().get(name).cloned()
    }

    /// All inline messages currently shown.
    pub fn field_messages(&self) -> BTreeMap<String, String> {
        self.field_messages.lock().clone()
    }

    fn show(&self, category: BannerCategory, text: String) {
        *self.banner.lock() = Some(ActiveBanner {
            banner: Banner { category, text },
            shown_at: Instant::now(),
        });
    }

    fn apply_report(&self, messages: &mut BTreeMap<String, String>, report: &FieldReport) {
        if report.valid {
            messages.remove(&report.field);
        } else if let Some(reason) = report.reason {
            let spec = self.form.field(&report.field);
            messages.insert(report.field.clone(), message_for(spec, &report.field, reason));
        }
    }
}

fn message_for(spec: Option<&FieldSpec>, field: &str, reason: RejectReason) -> String {
    match reason {
        RejectReason::Required => "This field is required.".to_string(),
        RejectReason::NotSelected => "Please select an option.".to_string(),
        RejectReason::NotPositive => "Amount must be greater than zero.".to_string(),
        RejectReason::InvalidFormat => match spec.map(|s| s.kind) {
            Some(FieldKind::Email) => "Please enter a valid email address.".to_string(),
            Some(FieldKind::Tel) => "Please enter a valid phone number.".to_string(),
            Some(FieldKind::Number) => "Please enter a valid amount.".to_string(),
            Some(FieldKind::Select) => "Please choose one of the listed options.".to_string(),
            _ => format!("Please enter a valid {}.", field),
        },
        RejectReason::TooShort => {
            let min = spec.and_then(|s| s.min_length).unwrap_or(0);
            format!("{} must be at least {} characters.", capitalize(field), min)
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
