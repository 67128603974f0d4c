use super::consent::Consent;
use super::payment::IdempotentRecord;
use super::permission::PermissionSet;
use super::resources::Redactable;
use crate::error::Result;
use async_trait::async_trait;

/// Read access to consents owned by the consent store.
#[async_trait]
pub trait ConsentStore: Send + Sync {
    async fn get(&self, consent_id: &str) -> Result<Option<Consent>>;
}

/// Result of an atomic insert keyed on the record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// Storage for payments that allow a single payment per consent.
///
/// `insert_if_absent` must be atomic with respect to the record id: of any
/// number of concurrent inserts for the same id exactly one reports
/// [`InsertOutcome::Inserted`].
#[async_trait]
pub trait PaymentStore<T: IdempotentRecord>: Send + Sync {
    async fn insert_if_absent(&self, record: T) -> Result<InsertOutcome>;
    async fn get(&self, id: &str) -> Result<Option<T>>;
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub content: Vec<R>,
    pub page: usize,
    pub total_pages: usize,
}

impl<R> Page<R> {
    /// Slices an already filtered collection into the requested page.
    pub fn from_items(items: Vec<R>, request: PageRequest) -> Self {
        let size = request.size.max(1);
        let total_pages = items.len().div_ceil(size);
        let content = items
            .into_iter()
            .skip(request.page.saturating_mul(size))
            .take(size)
            .collect();
        Self {
            content,
            page: request.page,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(R) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
        }
    }
}

/// Account information records, scoped by account id and by the consent's
/// permissions.
///
/// Adapters must leave out records the permissions do not reach, see
/// [`crate::domain::redaction::in_scope`]. Field redaction is not their
/// concern.
#[async_trait]
pub trait ResourceStore<R: Redactable>: Send + Sync {
    async fn find_by_account_ids(
        &self,
        account_ids: &[String],
        permissions: &PermissionSet,
        page: PageRequest,
    ) -> Result<Page<R>>;
}

pub type ConsentStoreBox = Box<dyn ConsentStore>;
pub type PaymentStoreBox<T> = Box<dyn PaymentStore<T>>;
pub type ResourceStoreBox<R> = Box<dyn ResourceStore<R>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_from_items() {
        let page = Page::from_items((1..=25).collect::<Vec<_>>(), PageRequest::new(1, 10));
        assert_eq!(page.content, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);

        let last = Page::from_items((1..=25).collect::<Vec<_>>(), PageRequest::new(2, 10));
        assert_eq!(last.content, vec![21, 22, 23, 24, 25]);

        let beyond = Page::from_items((1..=5).collect::<Vec<_>>(), PageRequest::new(3, 10));
        assert!(beyond.content.is_empty());
        assert_eq!(beyond.total_pages, 1);
    }
}
