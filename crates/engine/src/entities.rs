//! Entity mutations
//!
//! [`EntityStore`] is a stateless facade over an `Arc<Store>`. Every
//! operation addresses one entity by [`EntityId`], validates its input before
//! touching storage, and runs as a single backend call.
//!
//! Conditional mutations go through one path: the backend applies the update
//! only if the document satisfies a precondition, and on a mismatch a
//! follow-up read decides which error the caller sees.
//!
//! | Operation          | Precondition                  | Mismatch on a live entity |
//! |--------------------|-------------------------------|---------------------------|
//! | `add_only`         | none of the attributes exist  | `ExistentAttr`            |
//! | `update`           | every attribute exists        | `NotFoundAttr`            |
//! | `upsert_all`, etc. | none                          | `NotFoundEntity`          |
//!
//! A missing entity is always `NotFoundEntity`.

use crate::store::Store;
use attrstore_core::{
    validate_attr_name, validate_attrs, validate_entity, AttrMap, Attribute, Entity, EntityId,
    Error, Opt, OptionSet, Result,
};
use attrstore_storage::{Backend, Document, Filter, Update, UpdateOutcome};
use std::sync::Arc;

const TARGET: &str = "attrstore::entities";

/// What must hold on the stored document for a conditional write to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    /// Only that the entity exists
    Exists,
    /// None of the named attributes is present
    AttrsAbsent,
    /// All of the named attributes are present
    AttrsPresent,
}

impl Guard {
    fn filter(self, attrs: &AttrMap) -> Filter {
        match self {
            Guard::Exists => Filter::All,
            Guard::AttrsAbsent => Filter::attrs_missing(attrs.keys()),
            Guard::AttrsPresent => Filter::attrs_exist(attrs.keys()),
        }
    }

    fn mismatch_error(self) -> Error {
        match self {
            Guard::Exists => Error::NotFoundEntity,
            Guard::AttrsAbsent => Error::ExistentAttr,
            Guard::AttrsPresent => Error::NotFoundAttr,
        }
    }
}

/// Entity mutation and lookup operations
///
/// Cheap to clone; clones share the same [`Store`].
#[derive(Clone)]
pub struct EntityStore {
    store: Arc<Store>,
}

impl EntityStore {
    /// Create a new EntityStore over `store`
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Underlying store handle
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    fn collection(&self, id: &EntityId) -> String {
        self.store.collection_for(&id.partition())
    }

    // ========== Whole-entity operations ==========

    /// Persist a new entity
    ///
    /// Fails with `ExistentEntity` if the key is taken.
    pub fn create(&self, entity: &Entity) -> Result<()> {
        validate_entity(entity)?;
        let backend = self.store.backend()?;
        backend.insert(&self.collection(&entity.id), Document::from(entity.clone()))?;
        tracing::debug!(target: TARGET, id = %entity.id, op = "create", attrs = entity.attrs.len(), "mutation applied");
        Ok(())
    }

    /// Remove an entity
    pub fn delete(&self, id: &EntityId) -> Result<()> {
        let backend = self.store.backend()?;
        backend.remove(&self.collection(id), id)?;
        tracing::debug!(target: TARGET, %id, op = "delete", "mutation applied");
        Ok(())
    }

    /// Read an entity, optionally keeping only the named attributes
    ///
    /// `None` or an empty list returns every attribute.
    pub fn get(&self, id: &EntityId, projection: Option<&[String]>) -> Result<Entity> {
        let backend = self.store.backend()?;
        backend
            .find_one(&self.collection(id), id, projection.unwrap_or(&[]))?
            .map(Entity::from)
            .ok_or(Error::NotFoundEntity)
    }

    // ========== Attribute reads ==========

    /// Read one attribute
    pub fn get_attribute(&self, id: &EntityId, name: &str) -> Result<Attribute> {
        let mut entity = self.get(id, Some(&[name.to_string()]))?;
        entity.attrs.remove(name).ok_or(Error::NotFoundAttr)
    }

    /// Read every attribute
    pub fn get_all_attributes(&self, id: &EntityId) -> Result<AttrMap> {
        Ok(self.get(id, None)?.attrs)
    }

    // ========== Attribute writes ==========
    //
    // Each returns the entity as it was before the write.

    /// Remove one attribute
    ///
    /// Removing an attribute that is not there succeeds and leaves the
    /// entity unchanged.
    pub fn delete_attribute(&self, id: &EntityId, name: &str) -> Result<Entity> {
        self.apply(
            "delete_attribute",
            id,
            Guard::Exists,
            &AttrMap::new(),
            Update::UnsetAttr(name.to_string()),
        )
    }

    /// Set or replace one attribute
    pub fn set_attribute(&self, id: &EntityId, name: &str, attr: Attribute) -> Result<Entity> {
        validate_attr_name(name)?;
        let mut attrs = AttrMap::new();
        attrs.insert(name.to_string(), attr);
        self.apply("set_attribute", id, Guard::Exists, &attrs, Update::SetAttrs(attrs.clone()))
    }

    /// Replace the whole attribute map
    pub fn set_all(&self, id: &EntityId, attrs: AttrMap) -> Result<Entity> {
        validate_attrs(&attrs)?;
        self.apply("set_all", id, Guard::Exists, &attrs, Update::ReplaceAttrs(attrs.clone()))
    }

    /// Add attributes, only if none of them exists yet
    ///
    /// Never partially applied: if any attribute is already present nothing
    /// is written and the call fails with `ExistentAttr`.
    pub fn add_only(&self, id: &EntityId, attrs: AttrMap) -> Result<Entity> {
        validate_attrs(&attrs)?;
        self.apply("add_only", id, Guard::AttrsAbsent, &attrs, Update::SetAttrs(attrs.clone()))
    }

    /// Overwrite attributes, only if all of them exist
    pub fn update(&self, id: &EntityId, attrs: AttrMap) -> Result<Entity> {
        validate_attrs(&attrs)?;
        self.apply("update", id, Guard::AttrsPresent, &attrs, Update::SetAttrs(attrs.clone()))
    }

    /// Set each attribute whether or not it exists
    pub fn upsert_all(&self, id: &EntityId, attrs: AttrMap) -> Result<Entity> {
        validate_attrs(&attrs)?;
        self.apply("upsert_all", id, Guard::Exists, &attrs, Update::SetAttrs(attrs.clone()))
    }

    /// Add or merge attributes as selected by the request options
    ///
    /// With `append` this is [`add_only`](Self::add_only), otherwise
    /// [`upsert_all`](Self::upsert_all).
    pub fn append_attributes(
        &self,
        id: &EntityId,
        attrs: AttrMap,
        options: &OptionSet,
    ) -> Result<Entity> {
        if options.get(Opt::Append) {
            self.add_only(id, attrs)
        } else {
            self.upsert_all(id, attrs)
        }
    }

    fn apply(
        &self,
        op: &'static str,
        id: &EntityId,
        guard: Guard,
        attrs: &AttrMap,
        update: Update,
    ) -> Result<Entity> {
        let backend = self.store.backend()?;
        let collection = self.collection(id);
        let precondition = guard.filter(attrs);

        match backend.conditional_update(&collection, id, &precondition, &update)? {
            UpdateOutcome::Applied { previous } => {
                tracing::debug!(
                    target: TARGET,
                    %id,
                    op,
                    prior_version = previous.version,
                    "mutation applied"
                );
                Ok(previous.into())
            }
            UpdateOutcome::NotMatched => Err(classify_mismatch(
                backend.as_ref(),
                &collection,
                id,
                op,
                guard,
                &precondition,
            )?),
        }
    }
}

/// Decide why a conditional write did not apply
///
/// Runs only after the write failed to match. If the follow-up read sees a
/// document that now satisfies the precondition, a concurrent writer got in
/// between; the failure observed at write time is still reported.
fn classify_mismatch(
    backend: &dyn Backend,
    collection: &str,
    id: &EntityId,
    op: &'static str,
    guard: Guard,
    precondition: &Filter,
) -> Result<Error> {
    let Some(doc) = backend.find_one(collection, id, &[])? else {
        return Ok(Error::NotFoundEntity);
    };
    if precondition.matches(&doc) {
        tracing::warn!(
            target: TARGET,
            %id,
            op,
            version = doc.version,
            "entity changed between conditional write and follow-up read"
        );
    }
    Ok(guard.mismatch_error())
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("store", &self.store)
            .finish()
    }
}
