//! Entity queries
//!
//! A [`Query`] is a stateless description of which entities to read and how
//! to order and page them. [`QueryEngine`] turns it into a backend [`Plan`],
//! always scoped to one (service, service path) partition, and hands back a
//! lazy [`EntityCursor`].
//!
//! Filter construction:
//! - the partition terms are always present
//! - id list (`In`) and id pattern (`Regex`) are separate terms, so both apply
//! - type list and type pattern likewise
//! - an absent list or pattern adds no term, so it matches everything

use crate::store::Store;
use attrstore_core::{Entity, Error, Partition, Result};
use attrstore_storage::{Cursor, Filter, KeyField, Pattern, Plan, SortKey};
use std::sync::Arc;

const TARGET: &str = "attrstore::query";

/// Filter, projection, sort and pagination for a read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Exact ids; empty means any
    pub ids: Vec<String>,
    /// Regular expression on the id
    pub id_pattern: Option<String>,
    /// Exact types; empty means any
    pub types: Vec<String>,
    /// Regular expression on the type
    pub type_pattern: Option<String>,
    /// Attributes to return; empty returns all
    pub attrs: Vec<String>,
    /// Maximum results; 0 is unbounded
    pub limit: usize,
    /// Results to skip after sorting
    pub offset: usize,
    /// Sort keys, most significant first; `!name` sorts descending
    pub order_by: Vec<String>,
}

impl Query {
    /// Query matching every entity of the partition
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to these ids
    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to ids matching `pattern`
    pub fn id_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.id_pattern = Some(pattern.into());
        self
    }

    /// Restrict to these types
    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to types matching `pattern`
    pub fn type_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.type_pattern = Some(pattern.into());
        self
    }

    /// Return only these attributes
    pub fn attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    /// Set the limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the offset
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Set the sort keys
    pub fn order_by<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Filter for this query within `partition`
    pub fn filter(&self, partition: &Partition) -> Result<Filter> {
        let mut terms = vec![
            Filter::Eq(KeyField::Service, partition.service.clone()),
            Filter::Eq(KeyField::ServicePath, partition.service_path.clone()),
        ];
        push_field_terms(&mut terms, KeyField::Id, &self.ids, self.id_pattern.as_deref())?;
        push_field_terms(
            &mut terms,
            KeyField::Type,
            &self.types,
            self.type_pattern.as_deref(),
        )?;
        Ok(Filter::and(terms))
    }

    /// Backend plan for this query within `partition`
    ///
    /// Empty sort keys (`""` or a bare `"!"`) are ignored.
    pub fn to_plan(&self, partition: &Partition) -> Result<Plan> {
        let sort = self
            .order_by
            .iter()
            .filter_map(|k| SortKey::parse(k))
            .collect();
        Ok(Plan::new(self.filter(partition)?)
            .with_projection(self.attrs.clone())
            .with_sort(sort)
            .with_skip(self.offset)
            .with_limit((self.limit > 0).then_some(self.limit)))
    }
}

fn push_field_terms(
    terms: &mut Vec<Filter>,
    field: KeyField,
    values: &[String],
    pattern: Option<&str>,
) -> Result<()> {
    if !values.is_empty() {
        terms.push(Filter::In(field, values.to_vec()));
    }
    if let Some(p) = pattern.filter(|p| !p.is_empty()) {
        terms.push(Filter::Regex(field, Pattern::new(p)?));
    }
    Ok(())
}

/// Lazy, forward-only sequence of query results
///
/// Iteration ends at the last match or at the first backend failure; check
/// [`EntityCursor::err`] afterwards to tell the two apart.
#[derive(Debug)]
pub struct EntityCursor {
    inner: Cursor,
}

impl EntityCursor {
    /// Next entity, or `None` at the end or on failure
    pub fn next_entity(&mut self) -> Option<Entity> {
        self.inner.next_document().map(Entity::from)
    }

    /// Failure that ended iteration, if any
    pub fn err(&self) -> Option<&Error> {
        self.inner.err()
    }
}

impl Iterator for EntityCursor {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        self.next_entity()
    }
}

/// Query evaluation over a [`Store`]
#[derive(Clone, Debug)]
pub struct QueryEngine {
    store: Arc<Store>,
}

impl QueryEngine {
    /// Create a new QueryEngine over `store`
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Evaluate `query` within the partition
    pub fn run(&self, query: &Query, service: &str, service_path: &str) -> Result<EntityCursor> {
        let partition = Partition::new(service, service_path);
        let plan = query.to_plan(&partition)?;
        let collection = self.store.collection_for(&partition);
        tracing::trace!(target: TARGET, %collection, plan = %plan.describe(), "query planned");

        let inner = self.store.backend()?.find(&collection, &plan)?;
        Ok(EntityCursor { inner })
    }

    /// Number of entities matching `query`, ignoring offset and limit
    pub fn count(&self, query: &Query, service: &str, service_path: &str) -> Result<usize> {
        let partition = Partition::new(service, service_path);
        let filter = query.filter(&partition)?;
        let collection = self.store.collection_for(&partition);
        tracing::trace!(target: TARGET, %collection, filter = %filter.describe(), "count planned");
        self.store.backend()?.count(&collection, &filter)
    }
}
