//! Stored document shape
//!
//! One document per entity:
//!
//! ```text
//! { _id: {id, type, service, servicepath}, attrs: { <name>: {value, type?, metadata} } }
//! ```

use attrstore_core::{AttrMap, Entity, EntityId, Value};
use serde::{Deserialize, Serialize};

/// A persisted entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Primary key
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Attribute map
    #[serde(default)]
    pub attrs: AttrMap,
    /// Store version of the last committed write; not part of the document
    #[serde(skip)]
    pub version: u64,
}

impl Document {
    /// Document for a key with no attributes
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            attrs: AttrMap::new(),
            version: 0,
        }
    }

    /// Whether the named attribute is present
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Value of the named attribute, the `attrs.<name>.value` path
    pub fn attr_value(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name).map(|attr| &attr.value)
    }

    /// Keep only the named attributes; an empty list keeps everything
    pub fn projected(mut self, names: &[String]) -> Self {
        if !names.is_empty() {
            self.attrs.retain(|name, _| names.iter().any(|n| n == name));
        }
        self
    }
}

impl From<Entity> for Document {
    fn from(entity: Entity) -> Self {
        Self {
            id: entity.id,
            attrs: entity.attrs,
            version: 0,
        }
    }
}

impl From<Document> for Entity {
    fn from(doc: Document) -> Self {
        Entity {
            id: doc.id,
            attrs: doc.attrs,
        }
    }
}
