//! Entity model types
//!
//! - [`EntityId`]: composite key (id, type, service, service path)
//! - [`Partition`]: the (service, service path) tenancy scope of a key
//! - [`Attribute`]: value + optional type tag + metadata
//! - [`Entity`]: key + attribute map

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Entity type assigned when a payload carries no `type`.
pub const DEFAULT_ENTITY_TYPE: &str = "Thing";

/// Attribute metadata: name -> value.
pub type Metadata = HashMap<String, Value>;

/// Attribute map of an entity: attribute name -> attribute.
pub type AttrMap = HashMap<String, Attribute>;

/// JSON object as exchanged with the transport layer.
pub type Object = serde_json::Map<String, serde_json::Value>;

/// Composite primary key of an entity
///
/// Serializes as `{id, type, service, servicepath}`, the `_id` of a stored
/// document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    /// Local id, unique within (type, service, service path)
    pub id: String,
    /// Entity type
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Owning service (tenant)
    pub service: String,
    /// Service path within the tenant
    #[serde(rename = "servicepath")]
    pub service_path: String,
}

impl EntityId {
    /// Create a new key
    pub fn new(
        id: impl Into<String>,
        entity_type: impl Into<String>,
        service: impl Into<String>,
        service_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
            service: service.into(),
            service_path: service_path.into(),
        }
    }

    /// Tenancy partition this key belongs to
    pub fn partition(&self) -> Partition {
        Partition::new(self.service.clone(), self.service_path.clone())
    }

    /// Same id and type moved into another partition
    pub fn in_partition(&self, partition: &Partition) -> Self {
        Self {
            id: self.id.clone(),
            entity_type: self.entity_type.clone(),
            service: partition.service.clone(),
            service_path: partition.service_path.clone(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}/{}/{}",
            self.service, self.service_path, self.entity_type, self.id
        )
    }
}

/// Tenancy scope: (service, service path)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Partition {
    /// Owning service
    pub service: String,
    /// Service path within the service
    #[serde(rename = "servicepath")]
    pub service_path: String,
}

impl Partition {
    /// Create a partition
    pub fn new(service: impl Into<String>, service_path: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            service_path: service_path.into(),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.service, self.service_path)
    }
}

/// A named attribute's payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute value
    pub value: Value,
    /// Type tag; `None` when the producer supplied none
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub attr_type: Option<String>,
    /// Metadata, empty when not supplied
    #[serde(default)]
    pub metadata: Metadata,
}

impl Attribute {
    /// Attribute with a type inferred from the value and empty metadata
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        let attr_type = Some(value.inferred_type().to_string());
        Self {
            value,
            attr_type,
            metadata: Metadata::new(),
        }
    }

    /// Attribute with an explicit type tag and empty metadata
    pub fn typed(value: impl Into<Value>, attr_type: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            attr_type: Some(attr_type.into()),
            metadata: Metadata::new(),
        }
    }

    /// Attribute with no type tag and empty metadata
    pub fn untyped(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            attr_type: None,
            metadata: Metadata::new(),
        }
    }

    /// Add a metadata entry (builder pattern)
    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }
}

/// An entity: composite key plus attribute map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity key
    pub id: EntityId,
    /// Attributes by name
    pub attrs: AttrMap,
}

impl Entity {
    /// Entity with no attributes
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            attrs: AttrMap::new(),
        }
    }

    /// Add an attribute (builder pattern)
    pub fn with_attr(mut self, name: impl Into<String>, attr: Attribute) -> Self {
        self.attrs.insert(name.into(), attr);
        self
    }

    /// Look up an attribute by name
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.get(name)
    }
}
