//! Account information records returned by the record stores.
//!
//! Every field that a "basic" permission may hide is an `Option`, so
//! redaction can null it without changing the shape of the response.

use super::account::{CashAccount, FinancialInstitution};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kinds of record the redaction table knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Account,
    Balance,
    Beneficiary,
    Product,
    ScheduledPayment,
    StandingOrder,
    Statement,
    Transaction,
}

/// A sub-field of a record that can be withheld from a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SensitiveField {
    Account,
    Servicer,
    CreditorAccount,
    CreditorAgent,
    DebtorAccount,
    DebtorAgent,
    Balance,
    MerchantDetails,
    StatementAmount,
    StatementBenefit,
    StatementFee,
    StatementInterest,
    StatementRate,
    StatementValue,
}

impl SensitiveField {
    /// Field name as it appears in the Open Banking JSON payload.
    pub fn json_name(&self) -> &'static str {
        match self {
            SensitiveField::Account => "Account",
            SensitiveField::Servicer => "Servicer",
            SensitiveField::CreditorAccount => "CreditorAccount",
            SensitiveField::CreditorAgent => "CreditorAgent",
            SensitiveField::DebtorAccount => "DebtorAccount",
            SensitiveField::DebtorAgent => "DebtorAgent",
            SensitiveField::Balance => "Balance",
            SensitiveField::MerchantDetails => "MerchantDetails",
            SensitiveField::StatementAmount => "StatementAmount",
            SensitiveField::StatementBenefit => "StatementBenefit",
            SensitiveField::StatementFee => "StatementFee",
            SensitiveField::StatementInterest => "StatementInterest",
            SensitiveField::StatementRate => "StatementRate",
            SensitiveField::StatementValue => "StatementValue",
        }
    }
}

/// A record that the permission filter can redact.
pub trait Redactable: Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn account_id(&self) -> &str;

    /// Nulls `field`. Fields the record does not carry are ignored.
    fn clear(&mut self, field: SensitiveField);

    /// Direction of the money movement, for records that describe one.
    fn credit_debit_indicator(&self) -> Option<CreditDebitIndicator> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditDebitIndicator {
    Credit,
    Debit,
}

/// An amount that may legitimately be zero or negative, such as a balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountRecord {
    pub account_id: String,
    pub currency: String,
    pub account_type: String,
    pub account_sub_type: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub account: Option<Vec<CashAccount>>,
    #[serde(default)]
    pub servicer: Option<FinancialInstitution>,
}

impl Redactable for AccountRecord {
    const KIND: ResourceKind = ResourceKind::Account;

    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn clear(&mut self, field: SensitiveField) {
        match field {
            SensitiveField::Account => self.account = None,
            SensitiveField::Servicer => self.servicer = None,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BalanceRecord {
    pub account_id: String,
    pub credit_debit_indicator: CreditDebitIndicator,
    #[serde(rename = "Type")]
    pub balance_type: String,
    pub date_time: DateTime<Utc>,
    pub amount: Money,
}

impl Redactable for BalanceRecord {
    const KIND: ResourceKind = ResourceKind::Balance;

    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn clear(&mut self, _field: SensitiveField) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BeneficiaryRecord {
    pub account_id: String,
    pub beneficiary_id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub creditor_agent: Option<FinancialInstitution>,
    #[serde(default)]
    pub creditor_account: Option<CashAccount>,
}

impl Redactable for BeneficiaryRecord {
    const KIND: ResourceKind = ResourceKind::Beneficiary;

    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn clear(&mut self, field: SensitiveField) {
        match field {
            SensitiveField::CreditorAgent => self.creditor_agent = None,
            SensitiveField::CreditorAccount => self.creditor_account = None,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductRecord {
    pub account_id: String,
    pub product_id: String,
    pub product_type: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub secondary_product_id: Option<String>,
}

impl Redactable for ProductRecord {
    const KIND: ResourceKind = ResourceKind::Product;

    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn clear(&mut self, _field: SensitiveField) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduledPaymentRecord {
    pub account_id: String,
    pub scheduled_payment_id: String,
    pub scheduled_payment_date_time: DateTime<Utc>,
    pub scheduled_type: String,
    pub instructed_amount: Money,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub creditor_agent: Option<FinancialInstitution>,
    #[serde(default)]
    pub creditor_account: Option<CashAccount>,
}

impl Redactable for ScheduledPaymentRecord {
    const KIND: ResourceKind = ResourceKind::ScheduledPayment;

    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn clear(&mut self, field: SensitiveField) {
        match field {
            SensitiveField::CreditorAgent => self.creditor_agent = None,
            SensitiveField::CreditorAccount => self.creditor_account = None,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StandingOrderRecord {
    pub account_id: String,
    pub standing_order_id: String,
    pub frequency: String,
    #[serde(default)]
    pub reference: Option<String>,
    pub first_payment_date_time: DateTime<Utc>,
    #[serde(default)]
    pub next_payment_date_time: Option<DateTime<Utc>>,
    pub standing_order_status_code: String,
    #[serde(default)]
    pub next_payment_amount: Option<Money>,
    #[serde(default)]
    pub creditor_agent: Option<FinancialInstitution>,
    #[serde(default)]
    pub creditor_account: Option<CashAccount>,
}

impl Redactable for StandingOrderRecord {
    const KIND: ResourceKind = ResourceKind::StandingOrder;

    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn clear(&mut self, field: SensitiveField) {
        match field {
            SensitiveField::CreditorAgent => self.creditor_agent = None,
            SensitiveField::CreditorAccount => self.creditor_account = None,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatementLine {
    pub amount: Money,
    pub credit_debit_indicator: CreditDebitIndicator,
    #[serde(rename = "Type")]
    pub line_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatementMeasure {
    pub value: String,
    #[serde(rename = "Type")]
    pub measure_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatementRecord {
    pub account_id: String,
    pub statement_id: String,
    #[serde(rename = "Type")]
    pub statement_type: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    #[serde(default)]
    pub statement_description: Vec<String>,
    #[serde(default)]
    pub statement_amount: Option<Vec<StatementLine>>,
    #[serde(default)]
    pub statement_benefit: Option<Vec<StatementLine>>,
    #[serde(default)]
    pub statement_fee: Option<Vec<StatementLine>>,
    #[serde(default)]
    pub statement_interest: Option<Vec<StatementLine>>,
    #[serde(default)]
    pub statement_rate: Option<Vec<StatementMeasure>>,
    #[serde(default)]
    pub statement_value: Option<Vec<StatementMeasure>>,
}

impl Redactable for StatementRecord {
    const KIND: ResourceKind = ResourceKind::Statement;

    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn clear(&mut self, field: SensitiveField) {
        match field {
            SensitiveField::StatementAmount => self.statement_amount = None,
            SensitiveField::StatementBenefit => self.statement_benefit = None,
            SensitiveField::StatementFee => self.statement_fee = None,
            SensitiveField::StatementInterest => self.statement_interest = None,
            SensitiveField::StatementRate => self.statement_rate = None,
            SensitiveField::StatementValue => self.statement_value = None,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionBalance {
    pub amount: Money,
    pub credit_debit_indicator: CreditDebitIndicator,
    #[serde(rename = "Type")]
    pub balance_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MerchantDetails {
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub merchant_category_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionRecord {
    pub account_id: String,
    pub transaction_id: String,
    #[serde(default)]
    pub transaction_reference: Option<String>,
    pub credit_debit_indicator: CreditDebitIndicator,
    pub status: String,
    pub booking_date_time: DateTime<Utc>,
    #[serde(default)]
    pub transaction_information: Option<String>,
    pub amount: Money,
    #[serde(default)]
    pub balance: Option<TransactionBalance>,
    #[serde(default)]
    pub merchant_details: Option<MerchantDetails>,
    #[serde(default)]
    pub creditor_agent: Option<FinancialInstitution>,
    #[serde(default)]
    pub creditor_account: Option<CashAccount>,
    #[serde(default)]
    pub debtor_agent: Option<FinancialInstitution>,
    #[serde(default)]
    pub debtor_account: Option<CashAccount>,
}

impl Redactable for TransactionRecord {
    const KIND: ResourceKind = ResourceKind::Transaction;

    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn clear(&mut self, field: SensitiveField) {
        match field {
            SensitiveField::Balance => self.balance = None,
            SensitiveField::MerchantDetails => self.merchant_details = None,
            SensitiveField::CreditorAgent => self.creditor_agent = None,
            SensitiveField::CreditorAccount => self.creditor_account = None,
            SensitiveField::DebtorAgent => self.debtor_agent = None,
            SensitiveField::DebtorAccount => self.debtor_account = None,
            _ => {}
        }
    }

    fn credit_debit_indicator(&self) -> Option<CreditDebitIndicator> {
        Some(self.credit_debit_indicator)
    }
}
