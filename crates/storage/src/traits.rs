//! Backend trait
//!
//! Everything above this crate talks to storage through [`Backend`]. A
//! backend owns named collections of [`Document`]s keyed by [`EntityId`].
//!
//! The one primitive that carries the concurrency contract is
//! [`Backend::conditional_update`]: the precondition check and the update are
//! a single atomic step with respect to every other write on the same
//! document.

use crate::cursor::Cursor;
use crate::document::Document;
use crate::filter::Filter;
use crate::plan::Plan;
use crate::update::Update;
use attrstore_core::{EntityId, Result};

/// Outcome of [`Backend::conditional_update`]
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The update was applied; `previous` is the document before it
    Applied {
        /// Pre-image
        previous: Document,
    },
    /// No document with the key satisfied the precondition
    NotMatched,
}

impl UpdateOutcome {
    /// Whether the update was applied
    pub fn is_applied(&self) -> bool {
        matches!(self, UpdateOutcome::Applied { .. })
    }
}

/// Document storage
pub trait Backend: Send + Sync {
    /// Insert a new document; `ExistentEntity` if the key is taken
    fn insert(&self, collection: &str, doc: Document) -> Result<()>;

    /// Remove by key; `NotFoundEntity` if absent
    fn remove(&self, collection: &str, id: &EntityId) -> Result<()>;

    /// Read by key, keeping only the projected attributes (empty keeps all)
    fn find_one(
        &self,
        collection: &str,
        id: &EntityId,
        projection: &[String],
    ) -> Result<Option<Document>>;

    /// Atomically apply `update` to the document with key `id` if it
    /// satisfies `precondition`
    fn conditional_update(
        &self,
        collection: &str,
        id: &EntityId,
        precondition: &Filter,
        update: &Update,
    ) -> Result<UpdateOutcome>;

    /// Run a find
    fn find(&self, collection: &str, plan: &Plan) -> Result<Cursor>;

    /// Number of documents matching `filter`
    fn count(&self, collection: &str, filter: &Filter) -> Result<usize>;

    /// Drop a collection; dropping an absent collection is not an error
    fn drop_collection(&self, collection: &str) -> Result<()>;
}
