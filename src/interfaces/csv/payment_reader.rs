use crate::domain::account::{CashAccount, CurrencyAmount};
use crate::domain::payment::DomesticPayment;
use crate::error::{GatewayError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

/// One line of a payment submission batch, as written in the file.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRow {
    pub consent_id: String,
    pub api_client_id: String,
    pub idempotency_key: String,
    pub amount: String,
    pub currency: String,
    pub creditor_name: String,
    pub creditor_account: String,
}

/// A validated domestic payment ready to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub consent_id: String,
    pub api_client_id: String,
    pub idempotency_key: String,
    pub payment: DomesticPayment,
}

impl TryFrom<PaymentRow> for PaymentRequest {
    type Error = GatewayError;

    fn try_from(row: PaymentRow) -> Result<Self> {
        let amount = Decimal::from_str(&row.amount).map_err(|e| {
            GatewayError::ValidationError(format!("invalid amount '{}': {}", row.amount, e))
        })?;
        if row.creditor_account.is_empty() {
            return Err(GatewayError::ValidationError(
                "creditor_account must not be empty".to_string(),
            ));
        }

        // One payment per consent, so the consent id doubles as the instruction id.
        let payment = DomesticPayment {
            instruction_identification: row.consent_id.clone(),
            end_to_end_identification: row.consent_id.clone(),
            instructed_amount: CurrencyAmount::new(amount, row.currency)?,
            debtor_account: None,
            creditor_account: CashAccount::sort_code_account_number(row.creditor_account)
                .named(row.creditor_name),
            remittance_information: None,
        };

        Ok(Self {
            consent_id: row.consent_id,
            api_client_id: row.api_client_id,
            idempotency_key: row.idempotency_key,
            payment,
        })
    }
}

/// Reads payment submissions from a CSV source.
///
/// Wraps `csv::Reader`, trimming whitespace and allowing ragged rows so a bad
/// line surfaces as an error item instead of aborting the batch.
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads, deserializes and validates each row.
    pub fn requests(self) -> impl Iterator<Item = Result<PaymentRequest>> {
        self.reader.into_deserialize::<PaymentRow>().map(|result| {
            let row = result?;
            PaymentRequest::try_from(row)
        })
    }
}
