use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Open Banking account-access permission codes.
///
/// Codes the gateway does not know are kept verbatim in [`PermissionCode::Other`]
/// so a consent carrying them still loads; they never unlock or redact anything.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PermissionCode {
    ReadAccountsBasic,
    ReadAccountsDetail,
    ReadBalances,
    ReadBeneficiariesBasic,
    ReadBeneficiariesDetail,
    ReadDirectDebits,
    ReadOffers,
    ReadPAN,
    ReadParty,
    ReadPartyPSU,
    ReadProducts,
    ReadScheduledPaymentsBasic,
    ReadScheduledPaymentsDetail,
    ReadStandingOrdersBasic,
    ReadStandingOrdersDetail,
    ReadStatementsBasic,
    ReadStatementsDetail,
    ReadTransactionsBasic,
    ReadTransactionsCredits,
    ReadTransactionsDebits,
    ReadTransactionsDetail,
    Other(String),
}

impl PermissionCode {
    pub fn as_str(&self) -> &str {
        match self {
            PermissionCode::ReadAccountsBasic => "ReadAccountsBasic",
            PermissionCode::ReadAccountsDetail => "ReadAccountsDetail",
            PermissionCode::ReadBalances => "ReadBalances",
            PermissionCode::ReadBeneficiariesBasic => "ReadBeneficiariesBasic",
            PermissionCode::ReadBeneficiariesDetail => "ReadBeneficiariesDetail",
            PermissionCode::ReadDirectDebits => "ReadDirectDebits",
            PermissionCode::ReadOffers => "ReadOffers",
            PermissionCode::ReadPAN => "ReadPAN",
            PermissionCode::ReadParty => "ReadParty",
            PermissionCode::ReadPartyPSU => "ReadPartyPSU",
            PermissionCode::ReadProducts => "ReadProducts",
            PermissionCode::ReadScheduledPaymentsBasic => "ReadScheduledPaymentsBasic",
            PermissionCode::ReadScheduledPaymentsDetail => "ReadScheduledPaymentsDetail",
            PermissionCode::ReadStandingOrdersBasic => "ReadStandingOrdersBasic",
            PermissionCode::ReadStandingOrdersDetail => "ReadStandingOrdersDetail",
            PermissionCode::ReadStatementsBasic => "ReadStatementsBasic",
            PermissionCode::ReadStatementsDetail => "ReadStatementsDetail",
            PermissionCode::ReadTransactionsBasic => "ReadTransactionsBasic",
            PermissionCode::ReadTransactionsCredits => "ReadTransactionsCredits",
            PermissionCode::ReadTransactionsDebits => "ReadTransactionsDebits",
            PermissionCode::ReadTransactionsDetail => "ReadTransactionsDetail",
            PermissionCode::Other(code) => code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PermissionCode::Other(_))
    }
}

impl From<String> for PermissionCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "ReadAccountsBasic" => PermissionCode::ReadAccountsBasic,
            "ReadAccountsDetail" => PermissionCode::ReadAccountsDetail,
            "ReadBalances" => PermissionCode::ReadBalances,
            "ReadBeneficiariesBasic" => PermissionCode::ReadBeneficiariesBasic,
            "ReadBeneficiariesDetail" => PermissionCode::ReadBeneficiariesDetail,
            "ReadDirectDebits" => PermissionCode::ReadDirectDebits,
            "ReadOffers" => PermissionCode::ReadOffers,
            "ReadPAN" => PermissionCode::ReadPAN,
            "ReadParty" => PermissionCode::ReadParty,
            "ReadPartyPSU" => PermissionCode::ReadPartyPSU,
            "ReadProducts" => PermissionCode::ReadProducts,
            "ReadScheduledPaymentsBasic" => PermissionCode::ReadScheduledPaymentsBasic,
            "ReadScheduledPaymentsDetail" => PermissionCode::ReadScheduledPaymentsDetail,
            "ReadStandingOrdersBasic" => PermissionCode::ReadStandingOrdersBasic,
            "ReadStandingOrdersDetail" => PermissionCode::ReadStandingOrdersDetail,
            "ReadStatementsBasic" => PermissionCode::ReadStatementsBasic,
            "ReadStatementsDetail" => PermissionCode::ReadStatementsDetail,
            "ReadTransactionsBasic" => PermissionCode::ReadTransactionsBasic,
            "ReadTransactionsCredits" => PermissionCode::ReadTransactionsCredits,
            "ReadTransactionsDebits" => PermissionCode::ReadTransactionsDebits,
            "ReadTransactionsDetail" => PermissionCode::ReadTransactionsDetail,
            _ => PermissionCode::Other(code),
        }
    }
}

impl From<PermissionCode> for String {
    fn from(code: PermissionCode) -> Self {
        match code {
            PermissionCode::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for PermissionCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PermissionCode::from(s.to_string()))
    }
}

impl fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of permissions granted by a consent.
///
/// Backed by an ordered set so iteration, equality and serialization are
/// independent of the order the codes were granted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<PermissionCode>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &PermissionCode) -> bool {
        self.0.contains(code)
    }

    pub fn contains_any(&self, codes: &[PermissionCode]) -> bool {
        codes.iter().any(|code| self.0.contains(code))
    }

    pub fn insert(&mut self, code: PermissionCode) -> bool {
        self.0.insert(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionCode> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PermissionCode> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionCode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a PermissionCode;
    type IntoIter = std::collections::btree_set::Iter<'a, PermissionCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
