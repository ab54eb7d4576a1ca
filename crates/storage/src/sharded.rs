//! Sharded in-memory backend
//!
//! # Design
//!
//! - Collections: DashMap by name, each an `Arc<Collection>`
//! - Collection: DashMap by [`Partition`], one shard per (service, service path)
//! - Shard: FxHashMap by [`EntityId`]
//!
//! Tenants never contend with each other: every write locks only the shard of
//! its own partition. A conditional update holds the shard's write guard
//! across the precondition check and the update, which is what makes it
//! atomic with respect to other writers of the same document.
//!
//! # Lock order
//!
//! A writer may look up the collection map while holding a shard guard, to
//! confirm its collection was not dropped in between. The reverse never
//! happens: no code holds a collection-map guard while locking a shard.
//!
//! # Finds
//!
//! A find sorts lightweight [`SortRow`]s under the shard read guards and
//! copies nothing else. Documents of the requested page are fetched one at a
//! time as the cursor advances; one removed or changed to no longer match
//! in the meantime is skipped.
//!
//! # Example
//!
//! ```ignore
//! use attrstore_storage::{Backend, ShardedStore};
//!
//! let store = ShardedStore::new();
//! store.insert("entities", doc)?;
//! ```

use crate::cursor::Cursor;
use crate::document::Document;
use crate::filter::Filter;
use crate::plan::{Plan, SortRow};
use crate::traits::{Backend, UpdateOutcome};
use crate::update::Update;
use attrstore_core::{EntityId, Error, Partition, Result};
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const TARGET: &str = "attrstore::storage";

/// Per-partition shard
#[derive(Debug, Default)]
pub struct Shard {
    pub(crate) data: FxHashMap<EntityId, Document>,
}

impl Shard {
    /// Create a new empty shard
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in this shard
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if shard is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A named collection, sharded by partition
#[derive(Debug, Default)]
pub struct Collection {
    shards: DashMap<Partition, Shard>,
}

impl Collection {
    /// Number of documents across all partitions
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.value().len()).sum()
    }

    /// Whether the collection holds no documents
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sort rows of every document the plan's filter admits
    fn sort_rows(&self, plan: &Plan) -> Vec<SortRow> {
        let mut out = Vec::new();
        for shard in self.shards.iter() {
            if !plan.filter.admits_partition(shard.key()) {
                continue;
            }
            out.extend(
                shard
                    .value()
                    .data
                    .values()
                    .filter(|doc| plan.filter.matches(doc))
                    .map(|doc| plan.sort_row(doc)),
            );
        }
        out
    }

    /// Clone out one document
    fn get(&self, id: &EntityId) -> Option<Document> {
        let shard = self.shards.get(&id.partition())?;
        let doc = shard.data.get(id).cloned();
        doc
    }
}

/// In-memory [`Backend`]
pub struct ShardedStore {
    collections: DashMap<String, Arc<Collection>>,
    version: AtomicU64,
}

impl ShardedStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            version: AtomicU64::new(0),
        }
    }

    /// Version of the last committed write
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    #[inline]
    fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Number of collections
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    /// Whether a collection exists
    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Documents across every collection
    pub fn total_documents(&self) -> usize {
        let collections: Vec<_> = self
            .collections
            .iter()
            .map(|c| Arc::clone(c.value()))
            .collect();
        collections.iter().map(|c| c.len()).sum()
    }

    /// Documents of one partition in one collection
    pub fn partition_document_count(&self, collection: &str, partition: &Partition) -> usize {
        self.collection(collection)
            .and_then(|c| c.shards.get(partition).map(|s| s.len()))
            .unwrap_or(0)
    }

    // The map guard is released before the Arc is used, so no collection-level
    // lock is held while a shard is locked.
    fn collection(&self, name: &str) -> Option<Arc<Collection>> {
        self.collections.get(name).map(|c| Arc::clone(c.value()))
    }

    fn collection_or_create(&self, name: &str) -> Arc<Collection> {
        if let Some(c) = self.collection(name) {
            return c;
        }
        Arc::clone(self.collections.entry(name.to_string()).or_default().value())
    }

    /// Whether `coll` is still the collection registered under `name`.
    ///
    /// Checked under a shard guard: a write to a collection that was dropped
    /// after it was looked up would otherwise be lost.
    fn is_registered(&self, name: &str, coll: &Arc<Collection>) -> bool {
        self.collections
            .get(name)
            .is_some_and(|c| Arc::ptr_eq(c.value(), coll))
    }

    fn remove_registered(&self, name: &str, id: &EntityId) -> Option<Document> {
        let coll = self.collection(name)?;
        let mut shard = coll.shards.get_mut(&id.partition())?;
        if !self.is_registered(name, &coll) {
            return None;
        }
        let removed = shard.data.remove(id);
        removed
    }
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShardedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedStore")
            .field("collection_count", &self.collection_count())
            .field("version", &self.version())
            .field("total_documents", &self.total_documents())
            .finish()
    }
}

impl Backend for ShardedStore {
    fn insert(&self, collection: &str, mut doc: Document) -> Result<()> {
        let partition = doc.id.partition();
        loop {
            let coll = self.collection_or_create(collection);
            let mut shard = coll.shards.entry(partition.clone()).or_default();
            if !self.is_registered(collection, &coll) {
                tracing::debug!(target: TARGET, collection, "collection dropped during insert, retrying");
                continue;
            }
            return match shard.data.entry(doc.id.clone()) {
                Entry::Occupied(_) => Err(Error::ExistentEntity),
                Entry::Vacant(slot) => {
                    doc.version = self.next_version();
                    tracing::trace!(target: TARGET, collection, id = %doc.id, version = doc.version, "insert");
                    slot.insert(doc);
                    Ok(())
                }
            };
        }
    }

    fn remove(&self, collection: &str, id: &EntityId) -> Result<()> {
        if self.remove_registered(collection, id).is_none() {
            return Err(Error::NotFoundEntity);
        }
        self.next_version();
        tracing::trace!(target: TARGET, collection, %id, "remove");
        Ok(())
    }

    fn find_one(
        &self,
        collection: &str,
        id: &EntityId,
        projection: &[String],
    ) -> Result<Option<Document>> {
        let found = self.collection(collection).and_then(|c| c.get(id));
        Ok(found.map(|doc| doc.projected(projection)))
    }

    fn conditional_update(
        &self,
        collection: &str,
        id: &EntityId,
        precondition: &Filter,
        update: &Update,
    ) -> Result<UpdateOutcome> {
        let Some(coll) = self.collection(collection) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        let Some(mut shard) = coll.shards.get_mut(&id.partition()) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        if !self.is_registered(collection, &coll) {
            return Ok(UpdateOutcome::NotMatched);
        }
        let Some(doc) = shard.data.get_mut(id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        if !precondition.matches(doc) {
            tracing::trace!(target: TARGET, collection, %id, "precondition not met");
            return Ok(UpdateOutcome::NotMatched);
        }

        let previous = doc.clone();
        update.apply(doc);
        doc.version = self.next_version();
        tracing::trace!(
            target: TARGET,
            collection,
            %id,
            op = update.op_name(),
            version = doc.version,
            "conditional update applied"
        );
        Ok(UpdateOutcome::Applied { previous })
    }

    fn find(&self, collection: &str, plan: &Plan) -> Result<Cursor> {
        let Some(coll) = self.collection(collection) else {
            return Ok(Cursor::empty());
        };

        let mut rows = coll.sort_rows(plan);
        rows.sort_by(|a, b| plan.compare(a, b));
        tracing::trace!(target: TARGET, collection, matched = rows.len(), plan = %plan.describe(), "find");

        let page: Vec<EntityId> = rows
            .into_iter()
            .skip(plan.skip)
            .take(plan.limit.unwrap_or(usize::MAX))
            .map(|row| row.id)
            .collect();
        let filter = plan.filter.clone();
        let projection = plan.projection.clone();
        let docs = page.into_iter().filter_map(move |id| {
            coll.get(&id)
                .filter(|doc| filter.matches(doc))
                .map(|doc| Ok(doc.projected(&projection)))
        });
        Ok(Cursor::new(docs))
    }

    fn count(&self, collection: &str, filter: &Filter) -> Result<usize> {
        let Some(coll) = self.collection(collection) else {
            return Ok(0);
        };
        let mut n = 0;
        for shard in coll.shards.iter() {
            if filter.admits_partition(shard.key()) {
                n += shard.value().data.values().filter(|d| filter.matches(d)).count();
            }
        }
        Ok(n)
    }

    fn drop_collection(&self, collection: &str) -> Result<()> {
        if self.collections.remove(collection).is_some() {
            tracing::debug!(target: TARGET, collection, "collection dropped");
        }
        Ok(())
    }
}
