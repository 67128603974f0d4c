use crate::application::access::{ConsentAccessValidator, RequiredPermissions};
use crate::config::GatewayConfig;
use crate::domain::consent::Consent;
use crate::domain::ports::{Page, PageRequest, ResourceStoreBox};
use crate::domain::redaction::redact;
use crate::domain::resources::Redactable;
use crate::error::Result;
use std::sync::Arc;
use tracing::debug;

/// Read path for one kind of account information record.
///
/// Every read authorizes the consent, checks the permissions the record kind
/// requires, fetches a page and redacts each record to the consent's scope.
pub struct AccountReadService<R: Redactable> {
    validator: Arc<ConsentAccessValidator>,
    record_store: ResourceStoreBox<R>,
    config: GatewayConfig,
}

impl<R: Redactable> AccountReadService<R> {
    pub fn new(
        validator: Arc<ConsentAccessValidator>,
        record_store: ResourceStoreBox<R>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            validator,
            record_store,
            config,
        }
    }

    /// Records of a single account the consent covers.
    pub async fn read_account(
        &self,
        consent_id: &str,
        api_client_id: &str,
        account_id: &str,
        page: usize,
    ) -> Result<Page<R>> {
        let consent = self
            .validator
            .authorize_for(
                consent_id,
                api_client_id,
                Some(account_id),
                RequiredPermissions::for_kind(R::KIND),
            )
            .await?;
        self.fetch(&consent, &[account_id.to_string()], page).await
    }

    /// Records of every account the consent covers.
    pub async fn read_all(
        &self,
        consent_id: &str,
        api_client_id: &str,
        page: usize,
    ) -> Result<Page<R>> {
        let consent = self
            .validator
            .authorize_for(
                consent_id,
                api_client_id,
                None,
                RequiredPermissions::for_kind(R::KIND),
            )
            .await?;
        let account_ids: Vec<String> = consent.authorised_account_ids.iter().cloned().collect();
        self.fetch(&consent, &account_ids, page).await
    }

    async fn fetch(&self, consent: &Consent, account_ids: &[String], page: usize) -> Result<Page<R>> {
        let request = PageRequest::new(page, self.config.page_size_for(R::KIND));
        let records = self
            .record_store
            .find_by_account_ids(account_ids, &consent.granted_permissions, request)
            .await?;
        debug!(
            consent_id = %consent.consent_id,
            kind = ?R::KIND,
            count = records.content.len(),
            "records fetched"
        );
        Ok(records.map(|record| redact(&record, &consent.granted_permissions)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{CashAccount, FinancialInstitution};
    use crate::domain::consent::ConsentStatus;
    use crate::domain::permission::{PermissionCode, PermissionSet};
    use crate::domain::resources::{
        BeneficiaryRecord, CreditDebitIndicator, Money, ProductRecord, TransactionRecord,
    };
    use crate::error::GatewayError;
    use crate::infrastructure::in_memory::{InMemoryConsentStore, InMemoryResourceStore};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn beneficiary(account_id: &str, id: &str) -> BeneficiaryRecord {
        BeneficiaryRecord {
            account_id: account_id.to_string(),
            beneficiary_id: id.to_string(),
            reference: Some("Towbar Club".to_string()),
            creditor_agent: Some(FinancialInstitution::bicfi("AAAAGB2L")),
            creditor_account: Some(CashAccount::sort_code_account_number("80200112344562")),
        }
    }

    fn transaction(id: &str, indicator: CreditDebitIndicator) -> TransactionRecord {
        TransactionRecord {
            account_id: "acc-1".to_string(),
            transaction_id: id.to_string(),
            transaction_reference: None,
            credit_debit_indicator: indicator,
            status: "Booked".to_string(),
            booking_date_time: Utc::now(),
            transaction_information: None,
            amount: Money {
                amount: dec!(10.00),
                currency: "GBP".to_string(),
            },
            balance: None,
            merchant_details: None,
            creditor_agent: None,
            creditor_account: Some(CashAccount::sort_code_account_number("80200112344562")),
            debtor_agent: None,
            debtor_account: None,
        }
    }

    async fn validator(permissions: &[PermissionCode]) -> Arc<ConsentAccessValidator> {
        let consents = InMemoryConsentStore::new();
        consents
            .insert(
                Consent::new("AAC_1", "tpp-1", ConsentStatus::Authorised)
                    .with_permissions(permissions.iter().cloned().collect::<PermissionSet>())
                    .with_accounts(["acc-1"]),
            )
            .await;
        Arc::new(ConsentAccessValidator::new(Box::new(consents)))
    }

    async fn transaction_service(
        permissions: &[PermissionCode],
    ) -> AccountReadService<TransactionRecord> {
        let records = InMemoryResourceStore::new();
        records.insert(transaction("cr", CreditDebitIndicator::Credit)).await;
        records.insert(transaction("db", CreditDebitIndicator::Debit)).await;
        AccountReadService::new(
            validator(permissions).await,
            Box::new(records),
            GatewayConfig::default(),
        )
    }

    async fn service_with(
        permissions: &[PermissionCode],
    ) -> AccountReadService<BeneficiaryRecord> {
        let consents = InMemoryConsentStore::new();
        consents
            .insert(
                Consent::new("AAC_1", "tpp-1", ConsentStatus::Authorised)
                    .with_permissions(permissions.iter().cloned().collect::<PermissionSet>())
                    .with_accounts(["acc-1", "acc-2"]),
            )
            .await;

        let records = InMemoryResourceStore::new();
        records.insert(beneficiary("acc-1", "ben-1")).await;
        records.insert(beneficiary("acc-2", "ben-2")).await;
        records.insert(beneficiary("acc-3", "ben-3")).await;

        AccountReadService::new(
            Arc::new(ConsentAccessValidator::new(Box::new(consents))),
            Box::new(records),
            GatewayConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_basic_permission_redacts_records() {
        let service = service_with(&[PermissionCode::ReadBeneficiariesBasic]).await;
        let page = service.read_account("AAC_1", "tpp-1", "acc-1", 0).await.unwrap();

        assert_eq!(page.content.len(), 1);
        let record = &page.content[0];
        assert_eq!(record.beneficiary_id, "ben-1");
        assert!(record.creditor_account.is_none());
        assert!(record.creditor_agent.is_none());
        assert_eq!(record.reference.as_deref(), Some("Towbar Club"));
    }

    #[tokio::test]
    async fn test_detail_permission_keeps_records_whole() {
        let service = service_with(&[
            PermissionCode::ReadBeneficiariesBasic,
            PermissionCode::ReadBeneficiariesDetail,
        ])
        .await;
        let page = service.read_all("AAC_1", "tpp-1", 0).await.unwrap();

        let ids: Vec<&str> = page.content.iter().map(|b| b.beneficiary_id.as_str()).collect();
        assert_eq!(ids, vec!["ben-1", "ben-2"]);
        assert!(page.content.iter().all(|b| b.creditor_account.is_some()));
    }

    #[tokio::test]
    async fn test_missing_permission_is_rejected() {
        let service = service_with(&[PermissionCode::ReadAccountsDetail]).await;
        let result = service.read_all("AAC_1", "tpp-1", 0).await;
        assert!(matches!(result, Err(GatewayError::PermissionsInvalid { .. })));
    }

    #[tokio::test]
    async fn test_uncovered_account_is_forbidden() {
        let service = service_with(&[PermissionCode::ReadBeneficiariesDetail]).await;
        let result = service.read_account("AAC_1", "tpp-1", "acc-3", 0).await;
        assert!(matches!(result, Err(GatewayError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_transactions_use_their_page_size() {
        let consents = InMemoryConsentStore::new();
        consents
            .insert(
                Consent::new("AAC_1", "tpp-1", ConsentStatus::Authorised)
                    .with_permissions([PermissionCode::ReadTransactionsCredits].into_iter().collect())
                    .with_accounts(["acc-1"]),
            )
            .await;
        let records = InMemoryResourceStore::new();
        for i in 0..130 {
            records
                .insert(TransactionRecord {
                    account_id: "acc-1".to_string(),
                    transaction_id: format!("tx-{i}"),
                    transaction_reference: None,
                    credit_debit_indicator: CreditDebitIndicator::Credit,
                    status: "Booked".to_string(),
                    booking_date_time: Utc::now(),
                    transaction_information: None,
                    amount: Money {
                        amount: dec!(10.00),
                        currency: "GBP".to_string(),
                    },
                    balance: None,
                    merchant_details: None,
                    creditor_agent: None,
                    creditor_account: None,
                    debtor_agent: None,
                    debtor_account: None,
                })
                .await;
        }
        let service = AccountReadService::new(
            Arc::new(ConsentAccessValidator::new(Box::new(consents))),
            Box::new(records),
            GatewayConfig::default(),
        );

        let first = service.read_all("AAC_1", "tpp-1", 0).await.unwrap();
        assert_eq!(first.content.len(), 120);
        assert_eq!(first.total_pages, 2);
        let second = service.read_all("AAC_1", "tpp-1", 1).await.unwrap();
        assert_eq!(second.content.len(), 10);
    }

    #[tokio::test]
    async fn test_credits_only_consent_reads_credits() {
        let service = transaction_service(&[
            PermissionCode::ReadTransactionsBasic,
            PermissionCode::ReadTransactionsCredits,
        ])
        .await;
        let page = service.read_all("AAC_1", "tpp-1", 0).await.unwrap();

        let ids: Vec<&str> = page.content.iter().map(|t| t.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["cr"]);
        assert_eq!(page.total_pages, 1);
        assert!(page.content[0].creditor_account.is_none());
    }

    #[tokio::test]
    async fn test_debits_only_consent_reads_debits() {
        let service = transaction_service(&[
            PermissionCode::ReadTransactionsDetail,
            PermissionCode::ReadTransactionsDebits,
        ])
        .await;
        let page = service.read_account("AAC_1", "tpp-1", "acc-1", 0).await.unwrap();

        let ids: Vec<&str> = page.content.iter().map(|t| t.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["db"]);
        assert!(page.content[0].creditor_account.is_some());
    }

    #[tokio::test]
    async fn test_products_need_read_products() {
        let records = InMemoryResourceStore::new();
        records
            .insert(ProductRecord {
                account_id: "acc-1".to_string(),
                product_id: "51B".to_string(),
                product_type: "PersonalCurrentAccount".to_string(),
                product_name: Some("321 Product".to_string()),
                secondary_product_id: None,
            })
            .await;

        let service = AccountReadService::new(
            validator(&[PermissionCode::ReadProducts]).await,
            Box::new(records.clone()),
            GatewayConfig::default(),
        );
        let page = service.read_all("AAC_1", "tpp-1", 0).await.unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].product_name.as_deref(), Some("321 Product"));

        let service = AccountReadService::new(
            validator(&[PermissionCode::ReadAccountsDetail]).await,
            Box::new(records),
            GatewayConfig::default(),
        );
        let result = service.read_all("AAC_1", "tpp-1", 0).await;
        assert!(matches!(
            result,
            Err(GatewayError::PermissionsInvalid { acceptable }) if acceptable.contains("ReadProducts")
        ));
    }
}
