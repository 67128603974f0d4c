use crate::domain::payment::PaymentSubmission;
use crate::error::{GatewayError, Result};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Accepted,
    Rejected,
}

/// One line of the submission report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeRow {
    pub consent_id: String,
    pub idempotency_key: String,
    pub outcome: Outcome,
    pub payment_id: String,
    pub detail: String,
}

impl OutcomeRow {
    pub fn accepted<P>(submission: &PaymentSubmission<P>) -> Self {
        Self {
            consent_id: submission.consent_id.clone(),
            idempotency_key: submission.idempotency_key.clone(),
            outcome: Outcome::Accepted,
            payment_id: submission.id.clone(),
            detail: format!("{:?}", submission.status),
        }
    }

    /// Records a failed submission with its Open Banking error code.
    pub fn rejected(consent_id: &str, idempotency_key: &str, error: &GatewayError) -> Self {
        Self {
            consent_id: consent_id.to_string(),
            idempotency_key: idempotency_key.to_string(),
            outcome: Outcome::Rejected,
            payment_id: String::new(),
            detail: format!("{}: {}", error.ob_error_code(), error),
        }
    }
}

/// Writes submission outcomes as CSV.
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_outcome(&mut self, row: &OutcomeRow) -> Result<()> {
        self.writer.serialize(row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
