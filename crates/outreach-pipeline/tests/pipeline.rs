//! End-to-end pipeline tests: controller + presenter against scripted and
//! real in-memory gateways, on a paused clock.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_ok;
use uuid::Uuid;

use outreach_forms::{FormDefinition, FormKind, RejectReason};
use outreach_pipeline::{
    BannerCategory, FormPhase, PipelineConfig, SubmissionController, SubmissionOutcome,
    SubmitError,
};
use outreach_store::{
    GatewayError, InsertReceipt, MemoryStore, SubmissionGateway, SubmissionRequest,
};

/// One scripted response per expected gateway call.
enum Script {
    After(Duration, Result<InsertReceipt, GatewayError>),
    Hang,
}

struct ScriptedGateway {
    script: Mutex<VecDeque<Script>>,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    fn new(script: impl IntoIterator<Item = Script>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionGateway for ScriptedGateway {
    async fn insert(&self, _request: SubmissionRequest) -> Result<InsertReceipt, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().pop_front().expect("unscripted gateway call");
        match step {
            Script::After(delay, result) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            Script::Hang => std::future::pending().await,
        }
    }
}

/// Delays each call, then delegates to a real store. Lets a timed-out
/// insert land server-side anyway.
struct DelayedGateway {
    inner: Arc<MemoryStore>,
    delays: Mutex<VecDeque<Duration>>,
}

impl DelayedGateway {
    fn new(inner: Arc<MemoryStore>, delays: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            inner,
            delays: Mutex::new(delays.into_iter().collect()),
        }
    }
}

#[async_trait]
impl SubmissionGateway for DelayedGateway {
    async fn insert(&self, request: SubmissionRequest) -> Result<InsertReceipt, GatewayError> {
        let delay = self.delays.lock().pop_front().unwrap_or(Duration::ZERO);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.inner.insert(request).await
    }
}

fn receipt() -> InsertReceipt {
    InsertReceipt {
        record_id: Uuid::new_v4(),
        confirmation: "Thanks!".to_string(),
        deduplicated: false,
    }
}

fn contact_controller(gateway: Arc<dyn SubmissionGateway>) -> SubmissionController {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    SubmissionController::new(
        FormDefinition::contact(),
        gateway,
        PipelineConfig::for_form(FormKind::Contact),
    )
}

fn fill_contact(ctl: &SubmissionController) {
    ctl.set_field("name", "Jane Doe");
    ctl.set_field("phone", "+14155552671");
    ctl.set_field("email", "jane@example.com");
    ctl.set_field("message", "Hello there, loved your work");
}

/// Let spawned tasks catch up without moving the clock.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[tokio::test(start_paused = true)]
async fn contact_happy_path() {
    let store = Arc::new(MemoryStore::new());
    let ctl = contact_controller(store.clone());
    fill_contact(&ctl);

    let outcome = assert_ok!(ctl.submit().await);
    match &outcome {
        SubmissionOutcome::Success { confirmation } => {
            assert!(confirmation.contains("Thank you for contacting us"));
        }
        other => panic!("expected success, got {:?}", other),
    }

    assert_eq!(store.len(FormKind::Contact), 1);
    assert_eq!(ctl.phase(), FormPhase::Succeeded);
    assert!(ctl.values().is_empty(), "success clears entered values");

    let banner = ctl.presenter().banner().unwrap();
    assert_eq!(banner.category, BannerCategory::Success);
    assert!(banner.text.contains("Thank you for contacting us"));

    // Succeeded is held briefly, then the machine is idle and reusable.
    tokio::time::advance(secs(3)).await;
    assert_eq!(ctl.phase(), FormPhase::Idle);

    // The success banner expires on its own.
    tokio::time::advance(secs(3)).await;
    assert!(ctl.presenter().banner().is_none());
}

#[tokio::test(start_paused = true)]
async fn donation_negative_amount_never_reaches_gateway() {
    let store = Arc::new(MemoryStore::new());
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let ctl = SubmissionController::new(
        FormDefinition::donation(),
        store.clone(),
        PipelineConfig::for_form(FormKind::Donation),
    );
    ctl.set_field("name", "Jane Doe");
    ctl.set_field("phone", "+14155552671");
    ctl.set_field("email", "jane@example.com");
    ctl.set_field("amount", "-10");
    ctl.set_field("currency", "USD");

    let outcome = ctl.submit().await.unwrap();
    match &outcome {
        SubmissionOutcome::Rejected(report) => {
            assert!(!report.all_valid());
            assert_eq!(
                report.field("amount").unwrap().reason,
                Some(RejectReason::NotPositive)
            );
        }
        other => panic!("expected rejection, got {:?}", other),
    }

    assert!(store.is_empty(FormKind::Donation));
    assert_eq!(ctl.phase(), FormPhase::Idle);
    assert_eq!(ctl.field("amount").as_deref(), Some("-10"));
    assert!(ctl.presenter().field_message("amount").is_some());
    assert!(ctl.presenter().banner().is_none());
}

#[tokio::test(start_paused = true)]
async fn invalid_form_makes_no_gateway_calls() {
    let gateway = Arc::new(ScriptedGateway::new([]));
    let ctl = contact_controller(gateway.clone());

    let outcome = ctl.submit().await.unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Rejected(_)));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn single_flight_admits_one_submission() {
    let gateway = Arc::new(ScriptedGateway::new([Script::After(secs(1), Ok(receipt()))]));
    let ctl = Arc::new(contact_controller(gateway.clone()));
    fill_contact(&ctl);

    let first = {
        let ctl = ctl.clone();
        tokio::spawn(async move { ctl.submit().await })
    };
    settle().await;
    assert_eq!(ctl.phase(), FormPhase::Submitting);

    // Rapid double-activation: rejected outright, no attempt consumed.
    assert_eq!(ctl.submit().await, Err(SubmitError::InFlight));
    assert_eq!(ctl.attempt(), 1);

    let outcome = first.await.unwrap().unwrap();
    assert!(outcome.is_success());
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn deadline_elapses_into_timeout() {
    let gateway = Arc::new(ScriptedGateway::new([Script::Hang]));
    let ctl = contact_controller(gateway.clone());
    fill_contact(&ctl);

    let outcome = ctl.submit().await.unwrap();
    assert_eq!(outcome, SubmissionOutcome::TimedOut);
    assert_eq!(ctl.phase(), FormPhase::Idle);
    assert_eq!(ctl.field("name").as_deref(), Some("Jane Doe"));

    let banner = ctl.presenter().banner().unwrap();
    assert_eq!(banner.category, BannerCategory::Error);
    assert!(banner.text.contains("timed out"));
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn network_error_then_retry_succeeds() {
    let gateway = Arc::new(ScriptedGateway::new([
        Script::After(Duration::ZERO, Err(GatewayError::Unreachable)),
        Script::After(Duration::ZERO, Ok(receipt())),
    ]));
    let ctl = contact_controller(gateway.clone());
    fill_contact(&ctl);

    let outcome = ctl.submit().await.unwrap();
    assert_eq!(outcome, SubmissionOutcome::NetworkError);
    assert_eq!(ctl.phase(), FormPhase::Idle);
    assert_eq!(ctl.field("email").as_deref(), Some("jane@example.com"));

    let outcome = ctl.submit().await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(ctl.attempt(), 2);
    assert_eq!(gateway.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn server_error_shows_opaque_reference() {
    let gateway = Arc::new(ScriptedGateway::new([Script::After(
        Duration::ZERO,
        Err(GatewayError::Rejected {
            code: "ERR_SCHEMA".to_string(),
        }),
    )]));
    let ctl = contact_controller(gateway);
    fill_contact(&ctl);

    let outcome = ctl.submit().await.unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::ServerError {
            code: "ERR_SCHEMA".to_string()
        }
    );

    let banner = ctl.presenter().banner().unwrap();
    assert_eq!(banner.category, BannerCategory::Error);
    assert!(banner.text.contains("ERR_SCHEMA"));
}

#[tokio::test(start_paused = true)]
async fn stale_outcome_is_discarded() {
    // First insert answers at t=15, after its own attempt timed out at t=10
    // and a second attempt has taken over.
    let gateway = Arc::new(ScriptedGateway::new([
        Script::After(secs(15), Ok(receipt())),
        Script::Hang,
    ]));
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let ctl = Arc::new(SubmissionController::new(
        FormDefinition::contact(),
        gateway.clone(),
        PipelineConfig {
            submit_timeout: secs(10),
            banner_auto_dismiss: secs(60),
            ..PipelineConfig::default()
        },
    ));
    fill_contact(&ctl);

    let outcome = ctl.submit().await.unwrap();
    assert_eq!(outcome, SubmissionOutcome::TimedOut);

    let second = {
        let ctl = ctl.clone();
        tokio::spawn(async move { ctl.submit().await })
    };
    settle().await;
    assert_eq!(ctl.phase(), FormPhase::Submitting);
    assert_eq!(ctl.attempt(), 2);

    // t=16: the first attempt's late success arrives and must change nothing.
    tokio::time::advance(secs(6)).await;
    settle().await;

    assert_eq!(ctl.phase(), FormPhase::Submitting, "late outcome must not apply");
    assert_eq!(
        ctl.field("name").as_deref(),
        Some("Jane Doe"),
        "late success must not clear values"
    );
    let banner = ctl.presenter().banner().unwrap();
    assert_eq!(banner.category, BannerCategory::Error, "banner still the timeout's");

    let outcome = second.await.unwrap().unwrap();
    assert_eq!(outcome, SubmissionOutcome::TimedOut);
    assert_eq!(gateway.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn timeout_replay_creates_one_row() {
    // The first insert outlives the deadline but still commits server-side;
    // the user's retry of the same values must not create a second row.
    let store = Arc::new(MemoryStore::new());
    let gateway = Arc::new(DelayedGateway::new(
        store.clone(),
        [secs(15), Duration::ZERO],
    ));
    let ctl = contact_controller(gateway);
    fill_contact(&ctl);

    let outcome = ctl.submit().await.unwrap();
    assert_eq!(outcome, SubmissionOutcome::TimedOut);

    // The slow insert lands anyway.
    tokio::time::advance(secs(6)).await;
    settle().await;
    assert_eq!(store.len(FormKind::Contact), 1);

    // Same values, same idempotency key: the store answers with the
    // original receipt instead of a second row.
    let outcome = ctl.submit().await.unwrap();
    match &outcome {
        SubmissionOutcome::Success { confirmation } => {
            assert!(confirmation.contains("Thank you for contacting us"));
        }
        other => panic!("expected success, got {:?}", other),
    }
    assert_eq!(store.len(FormKind::Contact), 1);
}

#[tokio::test(start_paused = true)]
async fn edited_values_submit_as_new_record() {
    let store = Arc::new(MemoryStore::new());
    let gateway = Arc::new(DelayedGateway::new(
        store.clone(),
        [secs(15), Duration::ZERO],
    ));
    let ctl = contact_controller(gateway);
    fill_contact(&ctl);

    let outcome = ctl.submit().await.unwrap();
    assert_eq!(outcome, SubmissionOutcome::TimedOut);
    tokio::time::advance(secs(6)).await;
    settle().await;
    assert_eq!(store.len(FormKind::Contact), 1);

    // Editing a field starts a new logical submission.
    ctl.set_field("message", "Hello again, different question this time");
    let outcome = ctl.submit().await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(store.len(FormKind::Contact), 2);
}
