use crate::domain::consent::Consent;
use crate::domain::payment::IdempotentRecord;
use crate::domain::permission::PermissionSet;
use crate::domain::ports::{
    ConsentStore, InsertOutcome, Page, PageRequest, PaymentStore, ResourceStore,
};
use crate::domain::redaction::in_scope;
use crate::domain::resources::Redactable;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for consents, keyed by consent id.
///
/// The gateway only reads consents; `insert` exists to seed the store.
#[derive(Default, Clone)]
pub struct InMemoryConsentStore {
    consents: Arc<RwLock<HashMap<String, Consent>>>,
}

impl InMemoryConsentStore {
    /// Creates a new, empty in-memory consent store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a consent.
    pub async fn insert(&self, consent: Consent) {
        let mut consents = self.consents.write().await;
        consents.insert(consent.consent_id.clone(), consent);
    }
}

#[async_trait]
impl ConsentStore for InMemoryConsentStore {
    async fn get(&self, consent_id: &str) -> Result<Option<Consent>> {
        let consents = self.consents.read().await;
        Ok(consents.get(consent_id).cloned())
    }
}

/// A thread-safe in-memory store for payment submissions.
///
/// The existence check and the insert run under one write guard, so
/// concurrent `insert_if_absent` calls for the same id see exactly one
/// `Inserted`.
pub struct InMemoryPaymentStore<T> {
    payments: Arc<RwLock<HashMap<String, T>>>,
}

impl<T> InMemoryPaymentStore<T> {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self {
            payments: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.payments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.payments.read().await.is_empty()
    }
}

impl<T> Default for InMemoryPaymentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for InMemoryPaymentStore<T> {
    fn clone(&self) -> Self {
        Self {
            payments: Arc::clone(&self.payments),
        }
    }
}

#[async_trait]
impl<T: IdempotentRecord> PaymentStore<T> for InMemoryPaymentStore<T> {
    async fn insert_if_absent(&self, record: T) -> Result<InsertOutcome> {
        let mut payments = self.payments.write().await;
        match payments.entry(record.id().to_string()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        let payments = self.payments.read().await;
        Ok(payments.get(id).cloned())
    }
}

/// A thread-safe in-memory store for account information records.
///
/// Records keep their insertion order, which is also the order pages are
/// served in.
pub struct InMemoryResourceStore<R> {
    records: Arc<RwLock<Vec<R>>>,
}

impl<R> InMemoryResourceStore<R> {
    /// Creates a new, empty in-memory record store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn insert(&self, record: R) {
        self.records.write().await.push(record);
    }
}

impl<R> Default for InMemoryResourceStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for InMemoryResourceStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

#[async_trait]
impl<R: Redactable> ResourceStore<R> for InMemoryResourceStore<R> {
    async fn find_by_account_ids(
        &self,
        account_ids: &[String],
        permissions: &PermissionSet,
        page: PageRequest,
    ) -> Result<Page<R>> {
        let records = self.records.read().await;
        let matching: Vec<R> = records
            .iter()
            .filter(|record| account_ids.iter().any(|id| id == record.account_id()))
            .filter(|record| in_scope(*record, permissions))
            .cloned()
            .collect();
        Ok(Page::from_items(matching, page))
    }
}
