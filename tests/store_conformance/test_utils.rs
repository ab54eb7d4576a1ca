//! Shared fixtures for the conformance suite

use attrstore::{
    AttrMap, Attribute, Entity, EntityId, EntityStore, QueryEngine, Store, StoreConfig,
};
use std::sync::Arc;

pub const SERVICE: &str = "S";
pub const SERVICE_PATH: &str = "SP";

/// Store, mutation facade and query facade sharing one backend
pub struct TestStore {
    pub store: Arc<Store>,
    pub entities: EntityStore,
    pub queries: QueryEngine,
}

impl TestStore {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        attrstore::logging::init_with("attrstore=debug");
        let store = Store::open(config).expect("open store");
        Self {
            entities: EntityStore::new(Arc::clone(&store)),
            queries: QueryEngine::new(Arc::clone(&store)),
            store,
        }
    }

    /// Store pre-loaded with [`population`]
    pub fn populated() -> Self {
        let ts = Self::new();
        for e in population() {
            ts.entities.create(&e).expect("create fixture entity");
        }
        ts
    }
}

pub fn entity_id(id: &str, entity_type: &str) -> EntityId {
    EntityId::new(id, entity_type, SERVICE, SERVICE_PATH)
}

/// Six entities: I1..I3 of type T1 (status ON), E4..E6 of type T2 (status
/// OFF), temperatures 12.3 to 62.3 in steps of 10
pub fn population() -> Vec<Entity> {
    let rows = [
        ("I1", "T1", 12.3, "ON"),
        ("I2", "T1", 22.3, "ON"),
        ("I3", "T1", 32.3, "ON"),
        ("E4", "T2", 42.3, "OFF"),
        ("E5", "T2", 52.3, "OFF"),
        ("E6", "T2", 62.3, "OFF"),
    ];
    rows.iter()
        .map(|(id, t, temp, status)| {
            Entity::new(entity_id(id, t))
                .with_attr("temperature", Attribute::typed(*temp, "celsius"))
                .with_attr("status", Attribute::new(*status))
        })
        .collect()
}

pub fn attrs(pairs: &[(&str, Attribute)]) -> AttrMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
