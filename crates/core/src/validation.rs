//! Structural validation of entities and attribute maps.
//!
//! The reserved names are checked here once; every representation converter
//! and every mutation goes through [`validate_attr_name`].

use crate::error::{Error, Result};
use crate::types::{AttrMap, Entity};

/// Key carrying the entity id in every representation.
pub const ID_FIELD: &str = "id";
/// Key carrying the entity type in every representation.
pub const TYPE_FIELD: &str = "type";

/// Names that identify the entity and can never name an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedName {
    /// `id`
    Id,
    /// `type`
    Type,
}

impl ReservedName {
    /// All reserved names, in check order
    pub const ALL: [ReservedName; 2] = [ReservedName::Id, ReservedName::Type];

    /// The reserved key as it appears in payloads
    pub fn as_str(self) -> &'static str {
        match self {
            ReservedName::Id => ID_FIELD,
            ReservedName::Type => TYPE_FIELD,
        }
    }

    /// Classify a name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            ID_FIELD => Some(ReservedName::Id),
            TYPE_FIELD => Some(ReservedName::Type),
            _ => None,
        }
    }

    /// Error reported when this name is used as an attribute
    pub fn as_attr_error(self) -> Error {
        match self {
            ReservedName::Id => Error::InvalidAttrId,
            ReservedName::Type => Error::InvalidAttrType,
        }
    }
}

/// Reject reserved names
pub fn validate_attr_name(name: &str) -> Result<()> {
    match ReservedName::parse(name) {
        Some(reserved) => Err(reserved.as_attr_error()),
        None => Ok(()),
    }
}

/// Reject an attribute map holding a reserved name
///
/// Checked in [`ReservedName::ALL`] order, so a map holding both reports
/// `InvalidAttrId`.
pub fn validate_attrs(attrs: &AttrMap) -> Result<()> {
    for reserved in ReservedName::ALL {
        if attrs.contains_key(reserved.as_str()) {
            return Err(reserved.as_attr_error());
        }
    }
    Ok(())
}

/// Validate an entity before it is persisted
///
/// Order: empty id, empty type, then attribute names.
pub fn validate_entity(entity: &Entity) -> Result<()> {
    if entity.id.id.is_empty() {
        return Err(Error::EmptyEntityId);
    }
    if entity.id.entity_type.is_empty() {
        return Err(Error::EmptyEntityType);
    }
    validate_attrs(&entity.attrs)
}
