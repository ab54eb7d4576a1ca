//! Store configuration
//!
//! ```toml
//! database = "attrstore"
//! entities_collection = "entities"
//! policy = "per_service"
//! ```
//!
//! Every field has a default, so an empty document is a valid configuration.

use attrstore_core::{Error, Partition, Result};
use serde::{Deserialize, Serialize};

/// How a partition is mapped to a physical collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionPolicy {
    /// One collection for every tenant (default)
    #[default]
    Single,
    /// One collection per service, `<entities_collection>_<service>`
    PerService,
}

/// Configuration for [`crate::Store::open`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database name
    pub database: String,
    /// Base name of the entities collection
    pub entities_collection: String,
    /// Collection selection policy
    pub policy: CollectionPolicy,
}

impl StoreConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database name
    pub fn database(mut self, name: impl Into<String>) -> Self {
        self.database = name.into();
        self
    }

    /// Set the entities collection name
    pub fn entities_collection(mut self, name: impl Into<String>) -> Self {
        self.entities_collection = name.into();
        self
    }

    /// Set the collection policy
    pub fn policy(mut self, policy: CollectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| Error::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty names
    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            return Err(Error::invalid_config("database name is empty"));
        }
        if self.entities_collection.is_empty() {
            return Err(Error::invalid_config("entities collection name is empty"));
        }
        Ok(())
    }

    /// Collection holding the entities of `partition`
    pub fn collection_for(&self, partition: &Partition) -> String {
        match self.policy {
            CollectionPolicy::Single => self.entities_collection.clone(),
            CollectionPolicy::PerService => {
                format!("{}_{}", self.entities_collection, partition.service)
            }
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: "attrstore".to_string(),
            entities_collection: "entities".to_string(),
            policy: CollectionPolicy::Single,
        }
    }
}
