//! Pipeline configuration.
//!
//! Configuration is deliberately small: per-form submit timeout plus the two
//! presentation durations. Everything else is fixed behavior.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use outreach_forms::FormKind;

/// Tunables for one form's pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// How long a submission may stay in flight before the client gives up.
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout: Duration,

    /// How long the success state is held before returning to idle.
    #[serde(default = "default_success_hold")]
    pub success_hold: Duration,

    /// How long transient banners stay up unless dismissed sooner.
    #[serde(default = "default_banner_auto_dismiss")]
    pub banner_auto_dismiss: Duration,
}

impl PipelineConfig {
    /// Per-form defaults: volunteer signups tolerate a slower backend.
    pub fn for_form(kind: FormKind) -> Self {
        let submit_timeout = match kind {
            FormKind::Contact | FormKind::Donation => Duration::from_secs(10),
            FormKind::Volunteer => Duration::from_secs(15),
        };
        Self {
            submit_timeout,
            ..Self::default()
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            submit_timeout: default_submit_timeout(),
            success_hold: default_success_hold(),
            banner_auto_dismiss: default_banner_auto_dismiss(),
        }
    }
}

fn default_submit_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_success_hold() -> Duration {
    Duration::from_secs(2)
}

fn default_banner_auto_dismiss() -> Duration {
    Duration::from_secs(5)
}
