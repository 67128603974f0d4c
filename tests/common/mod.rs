#![allow(dead_code)]

use ob_gateway_core::domain::account::{CashAccount, CurrencyAmount};
use ob_gateway_core::domain::consent::{Consent, ConsentStatus};
use ob_gateway_core::domain::payment::DomesticPayment;
use ob_gateway_core::domain::permission::{PermissionCode, PermissionSet};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn domestic_payment(amount: Decimal) -> DomesticPayment {
    DomesticPayment {
        instruction_identification: "ACME412".to_string(),
        end_to_end_identification: "FRESCO.21302.GFX.20".to_string(),
        instructed_amount: CurrencyAmount::new(amount, "GBP").unwrap(),
        debtor_account: None,
        creditor_account: CashAccount::sort_code_account_number("08080021325698")
            .named("ACME Inc"),
        remittance_information: None,
    }
}

pub fn account_consent(consent_id: &str, api_client_id: &str, permissions: &[PermissionCode]) -> Consent {
    Consent::new(consent_id, api_client_id, ConsentStatus::Authorised)
        .with_permissions(permissions.iter().cloned().collect::<PermissionSet>())
        .with_accounts(["22289", "31820"])
}

pub fn payment_consent(consent_id: &str, api_client_id: &str, status: ConsentStatus) -> Consent {
    Consent::new(consent_id, api_client_id, status)
}

pub fn write_consents(path: &Path, consents: &[Consent]) -> Result<(), Error> {
    let file = File::create(path)?;
    serde_json::to_writer(file, consents)?;
    Ok(())
}

/// Writes `rows` payments, one per consent `PDC_1..=PDC_rows`.
pub fn generate_payments_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record([
        "consent_id",
        "api_client_id",
        "idempotency_key",
        "amount",
        "currency",
        "creditor_name",
        "creditor_account",
    ])?;

    for i in 1..=rows {
        wtr.write_record([
            format!("PDC_{i}").as_str(),
            "tpp-1",
            format!("idem-{i}").as_str(),
            "10.50",
            "GBP",
            "ACME Inc",
            "08080021325698",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
