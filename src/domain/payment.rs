use super::account::{CashAccount, CurrencyAmount};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum PaymentStatus {
    Pending,
    Rejected,
    AcceptedSettlementInProcess,
    AcceptedSettlementCompleted,
    InitiationPending,
    InitiationFailed,
    InitiationCompleted,
}

/// The capability the idempotent submitter needs from a stored payment.
///
/// Records of every payment family whose storage key is the consent id
/// implement this, so the submitter never has to know the concrete type.
pub trait IdempotentRecord: Clone + Send + Sync + 'static {
    type Payload: PartialEq + Serialize + Send + Sync;

    /// Names the payment family. Ids are only unique within a family.
    const FAMILY: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn consent_id(&self) -> &str;
    fn idempotency_key(&self) -> &str;
    fn payload(&self) -> &Self::Payload;
}

/// A payment request body that can be stored as a single payment per consent.
pub trait PaymentPayload:
    Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Status a freshly created submission starts in.
    const INITIAL_STATUS: PaymentStatus;
    const FAMILY: &'static str;
}

/// A payment stored against the consent that authorised it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentSubmission<P> {
    /// Always equal to `consent_id` once stored.
    pub id: String,
    pub consent_id: String,
    pub idempotency_key: String,
    pub payment: P,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl<P: PaymentPayload> PaymentSubmission<P> {
    pub fn new(consent_id: impl Into<String>, idempotency_key: impl Into<String>, payment: P) -> Self {
        let consent_id = consent_id.into();
        Self {
            id: consent_id.clone(),
            consent_id,
            idempotency_key: idempotency_key.into(),
            payment,
            status: P::INITIAL_STATUS,
            created_at: Utc::now(),
        }
    }
}

impl<P: PaymentPayload> IdempotentRecord for PaymentSubmission<P> {
    type Payload = P;

    const FAMILY: &'static str = P::FAMILY;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn consent_id(&self) -> &str {
        &self.consent_id
    }

    fn idempotency_key(&self) -> &str {
        &self.idempotency_key
    }

    fn payload(&self) -> &P {
        &self.payment
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemittanceInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unstructured: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Initiation of an immediate domestic payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomesticPayment {
    pub instruction_identification: String,
    pub end_to_end_identification: String,
    pub instructed_amount: CurrencyAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debtor_account: Option<CashAccount>,
    pub creditor_account: CashAccount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remittance_information: Option<RemittanceInformation>,
}

impl PaymentPayload for DomesticPayment {
    const INITIAL_STATUS: PaymentStatus = PaymentStatus::Pending;
    const FAMILY: &'static str = "domestic-payment";
}

/// Initiation of a domestic payment executed on a future date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomesticScheduledPayment {
    pub instruction_identification: String,
    pub requested_execution_date_time: DateTime<Utc>,
    pub instructed_amount: CurrencyAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debtor_account: Option<CashAccount>,
    pub creditor_account: CashAccount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remittance_information: Option<RemittanceInformation>,
}

impl PaymentPayload for DomesticScheduledPayment {
    const INITIAL_STATUS: PaymentStatus = PaymentStatus::InitiationPending;
    const FAMILY: &'static str = "domestic-scheduled-payment";
}

/// Initiation of a recurring domestic standing order.
///
/// `frequency` holds the encoded descriptor exactly as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomesticStandingOrder {
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_payments: Option<u32>,
    pub first_payment_date_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_payment_date_time: Option<DateTime<Utc>>,
    pub first_payment_amount: CurrencyAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_payment_amount: Option<CurrencyAmount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debtor_account: Option<CashAccount>,
    pub creditor_account: CashAccount,
    /// Derived from `frequency` and `first_payment_date_time` on submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_payment_date: Option<NaiveDate>,
}

impl PaymentPayload for DomesticStandingOrder {
    const INITIAL_STATUS: PaymentStatus = PaymentStatus::InitiationPending;
    const FAMILY: &'static str = "domestic-standing-order";
}

pub type DomesticPaymentSubmission = PaymentSubmission<DomesticPayment>;
pub type DomesticScheduledPaymentSubmission = PaymentSubmission<DomesticScheduledPayment>;
pub type DomesticStandingOrderSubmission = PaymentSubmission<DomesticStandingOrder>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payment() -> DomesticPayment {
        DomesticPayment {
            instruction_identification: "ACME412".to_string(),
            end_to_end_identification: "FRESCO.21302.GFX.20".to_string(),
            instructed_amount: CurrencyAmount::new(dec!(165.88), "GBP").unwrap(),
            debtor_account: None,
            creditor_account: CashAccount::sort_code_account_number("08080021325698"),
            remittance_information: None,
        }
    }

    #[test]
    fn test_new_submission_is_keyed_by_consent() {
        let submission = PaymentSubmission::new("PDC_1", "idem-1", payment());
        assert_eq!(submission.id(), "PDC_1");
        assert_eq!(submission.consent_id(), "PDC_1");
        assert_eq!(submission.idempotency_key(), "idem-1");
        assert_eq!(submission.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_submission_serializes_with_pascal_case() {
        let submission = PaymentSubmission::new("PDC_1", "idem-1", payment());
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["Id"], "PDC_1");
        assert_eq!(json["Payment"]["InstructedAmount"]["Amount"], "165.88");
        assert!(json["Payment"].get("DebtorAccount").is_none());

        let back: DomesticPaymentSubmission = serde_json::from_value(json).unwrap();
        assert_eq!(back, submission);
    }
}
