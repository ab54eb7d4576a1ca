//! Store handle
//!
//! A [`Store`] owns the backend and the configuration that selects a
//! collection for each partition. It is opened explicitly and shared as
//! `Arc<Store>` by every facade; after [`Store::close`] every operation
//! through it fails with `StoreClosed`.

use crate::config::StoreConfig;
use attrstore_core::{Error, Partition, Result};
use attrstore_storage::{Backend, ShardedStore};
use parking_lot::RwLock;
use std::sync::Arc;

const TARGET: &str = "attrstore::store";

/// Open store
pub struct Store {
    config: StoreConfig,
    backend: RwLock<Option<Arc<dyn Backend>>>,
}

impl Store {
    /// Open an in-memory store with `config`
    pub fn open(config: StoreConfig) -> Result<Arc<Self>> {
        Self::with_backend(config, Arc::new(ShardedStore::new()))
    }

    /// Open over an existing backend
    pub fn with_backend(config: StoreConfig, backend: Arc<dyn Backend>) -> Result<Arc<Self>> {
        config.validate()?;
        tracing::info!(
            target: TARGET,
            database = %config.database,
            collection = %config.entities_collection,
            policy = ?config.policy,
            "store opened"
        );
        Ok(Arc::new(Self {
            config,
            backend: RwLock::new(Some(backend)),
        }))
    }

    /// In-memory store with the default configuration
    pub fn ephemeral() -> Arc<Self> {
        Arc::new(Self {
            config: StoreConfig::default(),
            backend: RwLock::new(Some(Arc::new(ShardedStore::new()))),
        })
    }

    /// Configuration this store was opened with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Release the backend; idempotent
    pub fn close(&self) {
        if self.backend.write().take().is_some() {
            tracing::info!(target: TARGET, database = %self.config.database, "store closed");
        }
    }

    /// Whether the store is still open
    pub fn is_open(&self) -> bool {
        self.backend.read().is_some()
    }

    /// The backend, or `StoreClosed`
    pub fn backend(&self) -> Result<Arc<dyn Backend>> {
        self.backend.read().clone().ok_or(Error::StoreClosed)
    }

    /// Collection holding the entities of `partition`
    pub fn collection_for(&self, partition: &Partition) -> String {
        self.config.collection_for(partition)
    }

    /// Drop the collection selected for `partition`
    pub fn drop_collection(&self, partition: &Partition) -> Result<()> {
        let collection = self.collection_for(partition);
        self.backend()?.drop_collection(&collection)?;
        tracing::debug!(target: TARGET, %collection, %partition, "collection dropped");
        Ok(())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("open", &self.is_open())
            .finish()
    }
}
