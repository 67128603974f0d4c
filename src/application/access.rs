use crate::domain::consent::Consent;
use crate::domain::permission::PermissionCode;
use crate::domain::ports::ConsentStoreBox;
use crate::domain::resources::ResourceKind;
use crate::error::{GatewayError, Result};
use tracing::{debug, warn};

/// Permissions that satisfy each account information operation.
///
/// A consent needs at least one code of the relevant set.
pub struct RequiredPermissions;

impl RequiredPermissions {
    pub const ACCOUNTS: &'static [PermissionCode] = &[
        PermissionCode::ReadAccountsBasic,
        PermissionCode::ReadAccountsDetail,
    ];
    pub const BALANCES: &'static [PermissionCode] = &[PermissionCode::ReadBalances];
    pub const BENEFICIARIES: &'static [PermissionCode] = &[
        PermissionCode::ReadBeneficiariesBasic,
        PermissionCode::ReadBeneficiariesDetail,
    ];
    pub const PRODUCTS: &'static [PermissionCode] = &[PermissionCode::ReadProducts];
    pub const SCHEDULED_PAYMENTS: &'static [PermissionCode] = &[
        PermissionCode::ReadScheduledPaymentsBasic,
        PermissionCode::ReadScheduledPaymentsDetail,
    ];
    pub const STANDING_ORDERS: &'static [PermissionCode] = &[
        PermissionCode::ReadStandingOrdersBasic,
        PermissionCode::ReadStandingOrdersDetail,
    ];
    pub const STATEMENTS: &'static [PermissionCode] = &[
        PermissionCode::ReadStatementsBasic,
        PermissionCode::ReadStatementsDetail,
    ];
    pub const TRANSACTIONS: &'static [PermissionCode] = &[
        PermissionCode::ReadTransactionsBasic,
        PermissionCode::ReadTransactionsDetail,
        PermissionCode::ReadTransactionsCredits,
        PermissionCode::ReadTransactionsDebits,
    ];

    pub fn for_kind(kind: ResourceKind) -> &'static [PermissionCode] {
        match kind {
            ResourceKind::Account => Self::ACCOUNTS,
            ResourceKind::Balance => Self::BALANCES,
            ResourceKind::Beneficiary => Self::BENEFICIARIES,
            ResourceKind::Product => Self::PRODUCTS,
            ResourceKind::ScheduledPayment => Self::SCHEDULED_PAYMENTS,
            ResourceKind::StandingOrder => Self::STANDING_ORDERS,
            ResourceKind::Statement => Self::STATEMENTS,
            ResourceKind::Transaction => Self::TRANSACTIONS,
        }
    }
}

/// Decides whether an API client may use a consent.
///
/// Holds no mutable state; one instance can serve any number of concurrent
/// requests.
pub struct ConsentAccessValidator {
    consent_store: ConsentStoreBox,
}

impl ConsentAccessValidator {
    pub fn new(consent_store: ConsentStoreBox) -> Self {
        Self { consent_store }
    }

    /// Loads the consent and checks it belongs to `api_client_id`, covers
    /// `account_id` when one is given, and is in the authorised state.
    pub async fn authorize(
        &self,
        consent_id: &str,
        api_client_id: &str,
        account_id: Option<&str>,
    ) -> Result<Consent> {
        let consent = self
            .consent_store
            .get(consent_id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(consent_id.to_string()))?;

        if consent.api_client_id != api_client_id {
            warn!(consent_id, api_client_id, "consent requested by a different api client");
            return Err(GatewayError::Forbidden(format!(
                "consent {} does not belong to api client {}",
                consent_id, api_client_id
            )));
        }

        if let Some(account_id) = account_id
            && !consent.covers_account(account_id)
        {
            warn!(consent_id, account_id, "account not covered by consent");
            return Err(GatewayError::Forbidden(format!(
                "consent {} does not grant access to account {}",
                consent_id, account_id
            )));
        }

        if !consent.is_authorised() {
            warn!(consent_id, status = %consent.status, "consent not authorised");
            return Err(GatewayError::Unauthorized(format!(
                "consent {} has status {}",
                consent_id, consent.status
            )));
        }

        debug!(consent_id, api_client_id, "consent authorised");
        Ok(consent)
    }

    /// Fails with `PermissionsInvalid` unless the consent grants at least one
    /// of `acceptable`.
    pub fn require_any(consent: &Consent, acceptable: &[PermissionCode]) -> Result<()> {
        if consent.granted_permissions.contains_any(acceptable) {
            return Ok(());
        }
        let names: Vec<&str> = acceptable.iter().map(PermissionCode::as_str).collect();
        let acceptable = match names.as_slice() {
            [single] => single.to_string(),
            _ => format!("at least one of: [{}]", names.join(", ")),
        };
        warn!(consent_id = %consent.consent_id, %acceptable, "consent lacks required permission");
        Err(GatewayError::PermissionsInvalid { acceptable })
    }

    /// `authorize` followed by `require_any`.
    pub async fn authorize_for(
        &self,
        consent_id: &str,
        api_client_id: &str,
        account_id: Option<&str>,
        acceptable: &[PermissionCode],
    ) -> Result<Consent> {
        let consent = self.authorize(consent_id, api_client_id, account_id).await?;
        Self::require_any(&consent, acceptable)?;
        Ok(consent)
    }
}
