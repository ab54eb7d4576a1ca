//! Wire representations of entities
//!
//! Two representations are exchanged with the transport layer:
//!
//! | Representation | Shape                                           | Fidelity              |
//! |----------------|-------------------------------------------------|-----------------------|
//! | key-value      | `{id, type, <name>: <raw>}`                     | values only           |
//! | normalized     | `{id, type, <name>: {value, type?, metadata?}}` | value, type, metadata |
//!
//! Every converter routes attribute names through
//! [`validate_attr_name`](crate::validation::validate_attr_name) so the
//! reserved-name rule cannot drift between representations.

use crate::error::{Error, Result};
use crate::options::{Opt, OptionSet};
use crate::types::{AttrMap, Attribute, Entity, EntityId, Metadata, Object, DEFAULT_ENTITY_TYPE};
use crate::validation::{validate_attr_name, ReservedName, ID_FIELD, TYPE_FIELD};
use crate::value::Value;

const VALUE_FIELD: &str = "value";
const ATTR_TYPE_FIELD: &str = "type";
const METADATA_FIELD: &str = "metadata";

// =============================================================================
// Key-value representation
// =============================================================================

/// Build an entity from its key-value representation
///
/// `id` is mandatory; `type` defaults to [`DEFAULT_ENTITY_TYPE`]. Every other
/// key becomes an attribute with an inferred type and empty metadata. The
/// returned key has empty service/service path; the caller scopes it.
pub fn from_key_values(kv: &Object) -> Result<Entity> {
    let id = entity_id_from_object(kv)?;
    let attrs = attributes_from_key_values(kv, true)?;
    Ok(Entity { id, attrs })
}

/// Build an attribute map from raw values
///
/// With `ignore_reserved` the `id`/`type` keys are skipped, otherwise they
/// are rejected.
pub fn attributes_from_key_values(kv: &Object, ignore_reserved: bool) -> Result<AttrMap> {
    let mut attrs = AttrMap::with_capacity(kv.len());
    for (name, raw) in kv {
        if !admit_name(name, ignore_reserved)? {
            continue;
        }
        attrs.insert(name.clone(), Attribute::new(Value::from(raw.clone())));
    }
    Ok(attrs)
}

impl Entity {
    /// Key-value representation: attribute values plus id and type
    pub fn to_key_values(&self) -> Object {
        let mut kv = Object::new();
        for (name, attr) in &self.attrs {
            kv.insert(name.clone(), attr.value.clone().into_inner());
        }
        kv.insert(ID_FIELD.to_string(), self.id.id.clone().into());
        kv.insert(TYPE_FIELD.to_string(), self.id.entity_type.clone().into());
        kv
    }

    /// Attribute values in the requested order
    ///
    /// Fails with `NotFoundAttr` on the first name the entity lacks.
    pub fn to_values(&self, names: &[String]) -> Result<Vec<Value>> {
        names
            .iter()
            .map(|name| {
                self.attrs
                    .get(name)
                    .map(|attr| attr.value.clone())
                    .ok_or(Error::NotFoundAttr)
            })
            .collect()
    }

    /// Normalized representation: every attribute as `{value, type?, metadata}`
    pub fn to_normalized(&self) -> Object {
        let mut obj = Object::new();
        obj.insert(ID_FIELD.to_string(), self.id.id.clone().into());
        obj.insert(TYPE_FIELD.to_string(), self.id.entity_type.clone().into());
        for (name, attr) in &self.attrs {
            obj.insert(name.clone(), attribute_to_object(attr).into());
        }
        obj
    }
}

// =============================================================================
// Normalized representation
// =============================================================================

/// Build an entity from its normalized representation
pub fn from_normalized(obj: &Object) -> Result<Entity> {
    let id = entity_id_from_object(obj)?;
    let attrs = attributes_from_object(obj, true)?;
    Ok(Entity { id, attrs })
}

/// Build an attribute map from `{name: {value, type?, metadata?}}`
///
/// With `ignore_reserved` the `id`/`type` keys are skipped, otherwise the
/// first of them present fails with `InvalidAttrId`/`InvalidAttrType`.
pub fn attributes_from_object(obj: &Object, ignore_reserved: bool) -> Result<AttrMap> {
    let mut attrs = AttrMap::with_capacity(obj.len());
    for (name, raw) in obj {
        if !admit_name(name, ignore_reserved)? {
            continue;
        }
        attrs.insert(name.clone(), attribute_from_object(raw)?);
    }
    Ok(attrs)
}

/// Parse a single `{value, type?, metadata?}` attribute
pub fn attribute_from_object(raw: &serde_json::Value) -> Result<Attribute> {
    let obj = raw.as_object().ok_or(Error::AttrNotAnObject)?;

    let value = obj
        .get(VALUE_FIELD)
        .cloned()
        .map(Value::from)
        .ok_or(Error::MissingValueField)?;

    let attr_type = match obj.get(ATTR_TYPE_FIELD) {
        Some(serde_json::Value::String(t)) => Some(t.clone()),
        Some(_) => return Err(Error::AttrTypeNotAString),
        None => None,
    };

    let metadata = match obj.get(METADATA_FIELD) {
        Some(serde_json::Value::Object(md)) => md
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v.clone())))
            .collect(),
        Some(_) => return Err(Error::MdNotAnObject),
        None => Metadata::new(),
    };

    Ok(Attribute {
        value,
        attr_type,
        metadata,
    })
}

fn attribute_to_object(attr: &Attribute) -> Object {
    let mut obj = Object::new();
    obj.insert(VALUE_FIELD.to_string(), attr.value.clone().into_inner());
    if let Some(t) = &attr.attr_type {
        obj.insert(ATTR_TYPE_FIELD.to_string(), t.clone().into());
    }
    let metadata: Object = attr
        .metadata
        .iter()
        .map(|(k, v)| (k.clone(), v.clone().into_inner()))
        .collect();
    obj.insert(METADATA_FIELD.to_string(), metadata.into());
    obj
}

/// Extract id/type shared by both representations.
fn entity_id_from_object(obj: &Object) -> Result<EntityId> {
    let id = match obj.get(ID_FIELD) {
        Some(serde_json::Value::String(id)) => id.clone(),
        Some(_) => return Err(Error::IdNotAString),
        None => return Err(Error::MissingEntityId),
    };
    let entity_type = match obj.get(TYPE_FIELD) {
        Some(serde_json::Value::String(t)) => t.clone(),
        Some(_) => return Err(Error::TypeNotAString),
        None => DEFAULT_ENTITY_TYPE.to_string(),
    };
    Ok(EntityId {
        id,
        entity_type,
        ..EntityId::default()
    })
}

/// `Ok(false)` for a reserved name that should be skipped.
fn admit_name(name: &str, ignore_reserved: bool) -> Result<bool> {
    if ignore_reserved && ReservedName::parse(name).is_some() {
        return Ok(false);
    }
    validate_attr_name(name)?;
    Ok(true)
}

// =============================================================================
// Option-driven entry points
// =============================================================================

/// Parse an entity payload, key-value form when `keyValues` is set
pub fn parse_entity(payload: &serde_json::Value, options: &OptionSet) -> Result<Entity> {
    let obj = payload.as_object().ok_or(Error::EmptyObject)?;
    if options.get(Opt::KeyValues) {
        from_key_values(obj)
    } else {
        from_normalized(obj)
    }
}

/// Parse an attribute payload, key-value form when `keyValues` is set
///
/// Reserved names are rejected. A payload that is not an object, or an
/// object with no keys, fails with `EmptyObject`.
pub fn parse_attributes(payload: &serde_json::Value, options: &OptionSet) -> Result<AttrMap> {
    let obj = payload
        .as_object()
        .filter(|o| !o.is_empty())
        .ok_or(Error::EmptyObject)?;
    if options.get(Opt::KeyValues) {
        attributes_from_key_values(obj, false)
    } else {
        attributes_from_object(obj, false)
    }
}

/// Render an entity for a response
///
/// - `keyValues`: key-value object
/// - `values`: array of the values of `attrs`, in order
/// - otherwise: normalized object
pub fn render_entity(
    entity: &Entity,
    options: &OptionSet,
    attrs: &[String],
) -> Result<serde_json::Value> {
    if options.get(Opt::KeyValues) {
        Ok(entity.to_key_values().into())
    } else if options.get(Opt::Values) {
        let values = entity.to_values(attrs)?;
        Ok(values.into_iter().map(Value::into_inner).collect())
    } else {
        Ok(entity.to_normalized().into())
    }
}
