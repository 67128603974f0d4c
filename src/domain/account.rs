use crate::error::GatewayError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A strictly positive monetary amount.
///
/// Wraps `rust_decimal::Decimal` so instructed amounts can never be zero or
/// negative once they reach a payment payload.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, GatewayError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(GatewayError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = GatewayError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// An amount paired with its ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrencyAmount {
    pub amount: Amount,
    pub currency: String,
}

impl CurrencyAmount {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Result<Self, GatewayError> {
        let currency = currency.into();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(GatewayError::ValidationError(format!(
                "Currency must be a 3 letter ISO 4217 code, got '{}'",
                currency
            )));
        }
        Ok(Self {
            amount: Amount::new(amount)?,
            currency,
        })
    }
}

/// Identification of a cash account (`OBCashAccount`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CashAccount {
    pub scheme_name: String,
    pub identification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_identification: Option<String>,
}

impl CashAccount {
    pub fn sort_code_account_number(identification: impl Into<String>) -> Self {
        Self {
            scheme_name: "UK.OBIE.SortCodeAccountNumber".to_string(),
            identification: identification.into(),
            name: None,
            secondary_identification: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Identification of the servicing institution of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FinancialInstitution {
    pub scheme_name: String,
    pub identification: String,
}

impl FinancialInstitution {
    pub fn bicfi(bic: impl Into<String>) -> Self {
        Self {
            scheme_name: "UK.OBIE.BICFI".to_string(),
            identification: bic.into(),
        }
    }
}
