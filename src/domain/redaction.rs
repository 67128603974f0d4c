//! Permission-gated field redaction.
//!
//! A consent granted only the "basic" variant of a permission must not see
//! the counterparty details its "detail" counterpart would reveal. The rules
//! live in a static table; each rule only ever nulls fields, so applying any
//! subset of them in any order yields the same record.

use super::permission::{PermissionCode, PermissionSet};
use super::resources::{CreditDebitIndicator, Redactable, ResourceKind, SensitiveField};
use serde_json::Value;
use std::collections::BTreeSet;

struct RedactionRule {
    resource: ResourceKind,
    permission: PermissionCode,
    /// Granting this code lifts the rule.
    unless: PermissionCode,
    fields: &'static [SensitiveField],
}

const COUNTERPARTY: &[SensitiveField] = &[SensitiveField::CreditorAccount, SensitiveField::CreditorAgent];

static RULES: [RedactionRule; 6] = [
    RedactionRule {
        resource: ResourceKind::Account,
        permission: PermissionCode::ReadAccountsBasic,
        unless: PermissionCode::ReadAccountsDetail,
        fields: &[SensitiveField::Account, SensitiveField::Servicer],
    },
    RedactionRule {
        resource: ResourceKind::Beneficiary,
        permission: PermissionCode::ReadBeneficiariesBasic,
        unless: PermissionCode::ReadBeneficiariesDetail,
        fields: COUNTERPARTY,
    },
    RedactionRule {
        resource: ResourceKind::ScheduledPayment,
        permission: PermissionCode::ReadScheduledPaymentsBasic,
        unless: PermissionCode::ReadScheduledPaymentsDetail,
        fields: COUNTERPARTY,
    },
    RedactionRule {
        resource: ResourceKind::StandingOrder,
        permission: PermissionCode::ReadStandingOrdersBasic,
        unless: PermissionCode::ReadStandingOrdersDetail,
        fields: COUNTERPARTY,
    },
    RedactionRule {
        resource: ResourceKind::Statement,
        permission: PermissionCode::ReadStatementsBasic,
        unless: PermissionCode::ReadStatementsDetail,
        fields: &[
            SensitiveField::StatementAmount,
            SensitiveField::StatementBenefit,
            SensitiveField::StatementFee,
            SensitiveField::StatementInterest,
            SensitiveField::StatementRate,
            SensitiveField::StatementValue,
        ],
    },
    RedactionRule {
        resource: ResourceKind::Transaction,
        permission: PermissionCode::ReadTransactionsBasic,
        unless: PermissionCode::ReadTransactionsDetail,
        fields: &[
            SensitiveField::Balance,
            SensitiveField::MerchantDetails,
            SensitiveField::CreditorAccount,
            SensitiveField::CreditorAgent,
            SensitiveField::DebtorAccount,
            SensitiveField::DebtorAgent,
        ],
    },
];

/// Collects the fields of `kind` that `granted` requires to be withheld.
pub fn fields_to_redact(kind: ResourceKind, granted: &PermissionSet) -> BTreeSet<SensitiveField> {
    granted
        .iter()
        .flat_map(|code| {
            RULES.iter().filter(move |rule| {
                rule.resource == kind && rule.permission == *code && !granted.contains(&rule.unless)
            })
        })
        .flat_map(|rule| rule.fields.iter().copied())
        .collect()
}

/// Returns a copy of `resource` with every field `granted` does not unlock nulled.
pub fn redact<R: Redactable>(resource: &R, granted: &PermissionSet) -> R {
    let mut redacted = resource.clone();
    for field in fields_to_redact(R::KIND, granted) {
        redacted.clear(field);
    }
    redacted
}

pub fn redact_all<R: Redactable>(resources: &[R], granted: &PermissionSet) -> Vec<R> {
    let fields = fields_to_redact(R::KIND, granted);
    resources
        .iter()
        .map(|resource| {
            let mut redacted = resource.clone();
            for field in &fields {
                redacted.clear(*field);
            }
            redacted
        })
        .collect()
}

/// Applies the same table to an already serialised record.
///
/// Only keys already present are nulled; nothing is added or removed.
/// Non-object values are returned unchanged.
pub fn redact_json(kind: ResourceKind, record: &Value, granted: &PermissionSet) -> Value {
    let mut redacted = record.clone();
    if let Value::Object(map) = &mut redacted {
        for field in fields_to_redact(kind, granted) {
            if let Some(value) = map.get_mut(field.json_name()) {
                *value = Value::Null;
            }
        }
    }
    redacted
}

/// Whether `record` may be served at all under `granted`.
///
/// A consent granted transaction credits but not debits only reaches credit
/// movements, and the other way round. Records without a direction are
/// always in scope.
pub fn in_scope<R: Redactable>(record: &R, granted: &PermissionSet) -> bool {
    let credits = granted.contains(&PermissionCode::ReadTransactionsCredits);
    let debits = granted.contains(&PermissionCode::ReadTransactionsDebits);
    match record.credit_debit_indicator() {
        Some(CreditDebitIndicator::Credit) => credits || !debits,
        Some(CreditDebitIndicator::Debit) => debits || !credits,
        None => true,
    }
}
