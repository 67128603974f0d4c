use super::permission::PermissionSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Lifecycle status of an Open Banking consent.
///
/// Transitions are owned by the consent store; the gateway only reads them.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum ConsentStatus {
    AwaitingAuthorisation,
    Authorised,
    Consumed,
    Rejected,
    Revoked,
    Expired,
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConsentStatus::AwaitingAuthorisation => "AwaitingAuthorisation",
            ConsentStatus::Authorised => "Authorised",
            ConsentStatus::Consumed => "Consumed",
            ConsentStatus::Rejected => "Rejected",
            ConsentStatus::Revoked => "Revoked",
            ConsentStatus::Expired => "Expired",
        };
        f.write_str(s)
    }
}

/// A stored consent as returned by the consent store.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Consent {
    pub consent_id: String,
    pub api_client_id: String,
    pub status: ConsentStatus,
    #[serde(default, rename = "Permissions")]
    pub granted_permissions: PermissionSet,
    /// Empty for consents whose account scope was fixed at creation time.
    #[serde(default)]
    pub authorised_account_ids: BTreeSet<String>,
}

impl Consent {
    pub fn new(
        consent_id: impl Into<String>,
        api_client_id: impl Into<String>,
        status: ConsentStatus,
    ) -> Self {
        Self {
            consent_id: consent_id.into(),
            api_client_id: api_client_id.into(),
            status,
            granted_permissions: PermissionSet::new(),
            authorised_account_ids: BTreeSet::new(),
        }
    }

    pub fn with_permissions(mut self, permissions: PermissionSet) -> Self {
        self.granted_permissions = permissions;
        self
    }

    pub fn with_accounts<I, S>(mut self, account_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorised_account_ids = account_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_authorised(&self) -> bool {
        self.status == ConsentStatus::Authorised
    }

    pub fn covers_account(&self, account_id: &str) -> bool {
        self.authorised_account_ids.contains(account_id)
    }
}
