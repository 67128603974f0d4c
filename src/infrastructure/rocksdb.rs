use crate::domain::consent::Consent;
use crate::domain::payment::IdempotentRecord;
use crate::domain::ports::{ConsentStore, InsertOutcome, PaymentStore};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing consents.
pub const CF_CONSENTS: &str = "consents";
/// Column Family for storing payment submissions of every family.
///
/// Keys are `<family>/<consent id>`, see [`payment_key`].
pub const CF_PAYMENTS: &str = "payments";

/// Storage key of a payment, namespaced by its family.
pub fn payment_key<T: IdempotentRecord>(id: &str) -> String {
    format!("{}/{}", T::FAMILY, id)
}

/// A persistent store implementation using RocksDB.
///
/// Consents and payments live in separate Column Families with JSON values.
/// RocksDB has no native insert-if-absent, so payment inserts are serialised
/// through `insert_lock`; the check and the put happen under the same guard.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    insert_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("consents" and "payments") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_consents = ColumnFamilyDescriptor::new(CF_CONSENTS, Options::default());
        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_consents, cf_payments])?;

        Ok(Self {
            db: Arc::new(db),
            insert_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Writes a consent, replacing any previous version.
    pub fn put_consent(&self, consent: &Consent) -> Result<()> {
        let cf = self.cf(CF_CONSENTS)?;
        let value = serde_json::to_vec(consent)?;
        self.db.put_cf(cf, consent.consent_id.as_bytes(), value)?;
        Ok(())
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            GatewayError::StorageError(Box::new(std::io::Error::other(format!(
                "{} column family not found",
                name
            ))))
        })
    }

    fn read<V: DeserializeOwned>(&self, cf_name: &str, key: &str) -> Result<Option<V>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ConsentStore for RocksDBStore {
    async fn get(&self, consent_id: &str) -> Result<Option<Consent>> {
        self.read(CF_CONSENTS, consent_id)
    }
}

#[async_trait]
impl<T> PaymentStore<T> for RocksDBStore
where
    T: IdempotentRecord + Serialize + DeserializeOwned,
{
    async fn insert_if_absent(&self, record: T) -> Result<InsertOutcome> {
        let value = serde_json::to_vec(&record)?;
        let _guard = self.insert_lock.lock().await;

        let cf = self.cf(CF_PAYMENTS)?;
        let key = payment_key::<T>(record.id());
        if self.db.get_pinned_cf(cf, key.as_bytes())?.is_some() {
            return Ok(InsertOutcome::AlreadyExists);
        }
        self.db.put_cf(cf, key.as_bytes(), value)?;
        Ok(InsertOutcome::Inserted)
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        self.read(CF_PAYMENTS, &payment_key::<T>(id))
    }
}
