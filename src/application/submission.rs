use crate::domain::payment::{IdempotentRecord, PaymentPayload, PaymentSubmission};
use crate::domain::ports::{InsertOutcome, PaymentStoreBox};
use crate::error::{GatewayError, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

/// Stores at most one payment per consent and replays it to retrying clients.
///
/// The store's atomic insert is the only concurrency control: the first
/// insert for a consent wins, later submissions are reconciled against the
/// stored record.
pub struct IdempotentPaymentSubmitter<T: IdempotentRecord> {
    payment_store: PaymentStoreBox<T>,
}

impl<T: IdempotentRecord> IdempotentPaymentSubmitter<T> {
    pub fn new(payment_store: PaymentStoreBox<T>) -> Self {
        Self { payment_store }
    }

    /// Persists `record`, or returns the record already stored for its
    /// consent when the idempotency data matches.
    pub async fn save(&self, mut record: T) -> Result<T> {
        // The storage key is the consent id regardless of what the caller set.
        let consent_id = record.consent_id().to_string();
        record.set_id(consent_id.clone());

        match self.payment_store.insert_if_absent(record.clone()).await? {
            InsertOutcome::Inserted => {
                info!(consent_id = %consent_id, "payment stored");
                Ok(record)
            }
            InsertOutcome::AlreadyExists => {
                let existing = self.payment_store.get(&consent_id).await?.ok_or_else(|| {
                    error!(consent_id = %consent_id, "insert reported a duplicate but no payment was found");
                    GatewayError::InternalStateViolation(format!(
                        "Failed to insert payment - expected to find a payment for id: {}",
                        consent_id
                    ))
                })?;
                validate_idempotency_data(
                    &consent_id,
                    record.payload(),
                    record.idempotency_key(),
                    &existing,
                )?;
                info!(consent_id = %consent_id, "idempotent replay of stored payment");
                Ok(existing)
            }
        }
    }

    /// Looks up the payment already stored for `consent_id`, failing if its
    /// idempotency data differs from the incoming request.
    pub async fn find_existing(
        &self,
        consent_id: &str,
        payload: &T::Payload,
        idempotency_key: &str,
    ) -> Result<Option<T>> {
        match self.payment_store.get(consent_id).await? {
            Some(existing) => {
                validate_idempotency_data(consent_id, payload, idempotency_key, &existing)?;
                Ok(Some(existing))
            }
            None => Ok(None),
        }
    }
}

impl<P: PaymentPayload> IdempotentPaymentSubmitter<PaymentSubmission<P>> {
    pub async fn submit(
        &self,
        payment: P,
        consent_id: &str,
        idempotency_key: &str,
    ) -> Result<PaymentSubmission<P>> {
        self.save(PaymentSubmission::new(consent_id, idempotency_key, payment))
            .await
    }
}

fn validate_idempotency_data<T: IdempotentRecord>(
    consent_id: &str,
    payload: &T::Payload,
    idempotency_key: &str,
    existing: &T,
) -> Result<()> {
    let mut fields = Vec::new();
    if existing.idempotency_key() != idempotency_key {
        fields.push("IdempotencyKey".to_string());
    }
    if existing.payload() != payload {
        fields.extend(payload_differences(existing.payload(), payload));
    }
    if fields.is_empty() {
        return Ok(());
    }
    warn!(consent_id, ?fields, "idempotency data does not match stored payment");
    Err(GatewayError::IdempotencyConflict {
        consent_id: consent_id.to_string(),
        fields,
    })
}

/// Names the top-level payload fields that differ, as `Payment.<Field>`.
fn payload_differences<P: Serialize>(existing: &P, incoming: &P) -> Vec<String> {
    let (Ok(Value::Object(existing)), Ok(Value::Object(incoming))) =
        (serde_json::to_value(existing), serde_json::to_value(incoming))
    else {
        return vec!["Payment".to_string()];
    };

    let mut keys: Vec<&String> = existing.keys().chain(incoming.keys()).collect();
    keys.sort();
    keys.dedup();

    let differing: Vec<String> = keys
        .into_iter()
        .filter(|key| existing.get(*key) != incoming.get(*key))
        .map(|key| format!("Payment.{key}"))
        .collect();

    if differing.is_empty() {
        vec!["Payment".to_string()]
    } else {
        differing
    }
}
