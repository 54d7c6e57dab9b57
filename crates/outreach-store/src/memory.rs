//! In-memory store.
//!
//! Append-only tables backed by dashmap, with an idempotency index so a
//! replayed submission returns its original receipt instead of a second row.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use outreach_forms::FormKind;

use crate::gateway::{GatewayError, InsertReceipt, SubmissionGateway, SubmissionRequest};
use crate::record::{RecordRow, StoredRecord};

/// In-memory insert-only store for the three form tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: DashMap<&'static str, Vec<StoredRecord>>,
    /// idempotency key -> record id of the row it created
    dedupe: DashMap<Uuid, Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in a form's table.
    pub fn len(&self, kind: FormKind) -> usize {
        self.tables.get(kind.table()).map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, kind: FormKind) -> bool {
        self.len(kind) == 0
    }

    fn confirmation(kind: FormKind) -> &'static str {
        match kind {
            FormKind::Contact => {
                "We will reach out to you via email. Thank you for contacting us!"
            }
            FormKind::Donation => {
                "Thank you for initiating the donation process! We will contact you shortly to complete the transaction."
            }
            FormKind::Volunteer => {
                "Thank you for registering as a volunteer. We will contact you soon."
            }
        }
    }
}

#[async_trait]
impl SubmissionGateway for MemoryStore {
    async fn insert(&self, request: SubmissionRequest) -> Result<InsertReceipt, GatewayError> {
        if let Some(existing) = self.dedupe.get(&request.idempotency_key) {
            let record_id = *existing;
            tracing::info!(
                form = %request.form,
                %record_id,
                "duplicate idempotency key, returning original receipt"
            );
            return Ok(InsertReceipt {
                record_id,
                confirmation: Self::confirmation(request.form).to_string(),
                deduplicated: true,
            });
        }

        let row = RecordRow::bind(request.form, &request.values).map_err(|err| {
            tracing::warn!(form = %request.form, %err, "submission failed to bind");
            GatewayError::Rejected {
                code: err.code().to_string(),
            }
        })?;

        let record = StoredRecord::new(row);
        let record_id = record.id;
        self.tables.entry(request.form.table()).or_default().push(record);
        self.dedupe.insert(request.idempotency_key, record_id);

        tracing::info!(
            form = %request.form,
            attempt = request.attempt,
            %record_id,
            "submission persisted"
        );

        Ok(InsertReceipt {
            record_id,
            confirmation: Self::confirmation(request.form).to_string(),
            deduplicated: false,
        })
    }
}
