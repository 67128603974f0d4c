use crate::application::access::ConsentAccessValidator;
use crate::application::submission::IdempotentPaymentSubmitter;
use crate::domain::frequency::Frequency;
use crate::domain::payment::{
    DomesticPayment, DomesticPaymentSubmission, DomesticScheduledPayment,
    DomesticScheduledPaymentSubmission, DomesticStandingOrder, DomesticStandingOrderSubmission,
};
use crate::domain::ports::PaymentStoreBox;
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Write path for domestic payment initiation.
///
/// Each payment family has its own submitter; all of them authorize the
/// payment consent first.
pub struct PaymentService {
    validator: Arc<ConsentAccessValidator>,
    domestic: IdempotentPaymentSubmitter<DomesticPaymentSubmission>,
    scheduled: IdempotentPaymentSubmitter<DomesticScheduledPaymentSubmission>,
    standing_orders: IdempotentPaymentSubmitter<DomesticStandingOrderSubmission>,
}

impl PaymentService {
    pub fn new(
        validator: Arc<ConsentAccessValidator>,
        domestic_store: PaymentStoreBox<DomesticPaymentSubmission>,
        scheduled_store: PaymentStoreBox<DomesticScheduledPaymentSubmission>,
        standing_order_store: PaymentStoreBox<DomesticStandingOrderSubmission>,
    ) -> Self {
        Self {
            validator,
            domestic: IdempotentPaymentSubmitter::new(domestic_store),
            scheduled: IdempotentPaymentSubmitter::new(scheduled_store),
            standing_orders: IdempotentPaymentSubmitter::new(standing_order_store),
        }
    }

    pub async fn submit_domestic_payment(
        &self,
        consent_id: &str,
        api_client_id: &str,
        idempotency_key: &str,
        payment: DomesticPayment,
    ) -> Result<DomesticPaymentSubmission> {
        self.validator
            .authorize(consent_id, api_client_id, None)
            .await?;
        let stored = self
            .domestic
            .submit(payment, consent_id, idempotency_key)
            .await?;
        info!(consent_id, payment_id = %stored.id, "domestic payment accepted");
        Ok(stored)
    }

    pub async fn submit_scheduled_payment(
        &self,
        consent_id: &str,
        api_client_id: &str,
        idempotency_key: &str,
        payment: DomesticScheduledPayment,
    ) -> Result<DomesticScheduledPaymentSubmission> {
        self.validator
            .authorize(consent_id, api_client_id, None)
            .await?;
        let stored = self
            .scheduled
            .submit(payment, consent_id, idempotency_key)
            .await?;
        info!(consent_id, payment_id = %stored.id, "scheduled payment accepted");
        Ok(stored)
    }

    /// Validates the order's frequency and stores it with its next payment
    /// date filled in.
    pub async fn submit_standing_order(
        &self,
        consent_id: &str,
        api_client_id: &str,
        idempotency_key: &str,
        order: DomesticStandingOrder,
    ) -> Result<DomesticStandingOrderSubmission> {
        self.validator
            .authorize(consent_id, api_client_id, None)
            .await?;
        let order = with_next_payment_date(order)?;
        let stored = self
            .standing_orders
            .submit(order, consent_id, idempotency_key)
            .await?;
        info!(consent_id, payment_id = %stored.id, "standing order accepted");
        Ok(stored)
    }
}

/// Derives the date of the payment following the first one.
///
/// Orders limited to a single payment, or whose next date would fall after
/// the final payment date, have no next payment.
pub fn with_next_payment_date(mut order: DomesticStandingOrder) -> Result<DomesticStandingOrder> {
    let frequency: Frequency = order.frequency.parse()?;
    let first = order.first_payment_date_time.date_naive();
    let next = frequency.next_after(first)?;

    let exhausted = order.number_of_payments == Some(1)
        || order
            .final_payment_date_time
            .is_some_and(|last| next > last.date_naive());

    order.next_payment_date = if exhausted { None } else { Some(next) };
    debug!(frequency = %frequency, %first, next = ?order.next_payment_date, "next payment date derived");
    Ok(order)
}
