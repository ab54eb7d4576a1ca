//! attrstore: schema-flexible entity-attribute store
//!
//! Entities are keyed by (id, type, service, service path) and carry a
//! dynamic set of attributes (value, optional type tag, metadata). This crate
//! re-exports the workspace:
//!
//! - model, representations and errors from `attrstore-core`
//! - backend trait, query vocabulary and in-memory backend from `attrstore-storage`
//! - store handle, mutations and queries from `attrstore-engine`
//!
//! # Quick start
//!
//! ```
//! use attrstore::{Attribute, Entity, EntityId, EntityStore, Query, QueryEngine, Store};
//!
//! let store = Store::ephemeral();
//! let entities = EntityStore::new(store.clone());
//!
//! let id = EntityId::new("room1", "Room", "smartcity", "/madrid");
//! let room = Entity::new(id.clone()).with_attr("temperature", Attribute::typed(21.5, "celsius"));
//! entities.create(&room).unwrap();
//!
//! let queries = QueryEngine::new(store);
//! let found: Vec<_> = queries
//!     .run(&Query::new().types(["Room"]), "smartcity", "/madrid")
//!     .unwrap()
//!     .collect();
//! assert_eq!(found.len(), 1);
//! ```

#![warn(missing_docs)]

pub mod logging;

pub use attrstore_core::{
    attribute_from_object, attributes_from_key_values, attributes_from_object, from_key_values,
    from_normalized, parse_attributes, parse_entity, render_entity, validate_attr_name,
    validate_attrs, validate_entity, AttrMap, Attribute, Entity, EntityId, Error, ErrorKind,
    Metadata, Object, Opt, OptionSet, Partition, ReservedName, Result, Value,
    DEFAULT_ENTITY_TYPE,
};
pub use attrstore_engine::{
    CollectionPolicy, EntityCursor, EntityStore, Query, QueryEngine, Store, StoreConfig,
};
pub use attrstore_storage::{
    Backend, Cursor, Direction, Document, Filter, KeyField, Pattern, Plan, ShardedStore, SortKey,
    Update, UpdateOutcome,
};
