//! Core types for attrstore
//!
//! This crate defines the entity/attribute data model shared by every other
//! crate in the workspace:
//! - Value: dynamically typed attribute value
//! - EntityId, Partition, Attribute, Entity: the model
//! - repr: key-value and normalized representations
//! - validation: reserved names and entity checks
//! - options: representation option sets
//! - Error: the error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod options;
pub mod repr;
pub mod types;
pub mod validation;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use options::{Opt, OptionSet};
pub use repr::{
    attribute_from_object, attributes_from_key_values, attributes_from_object, from_key_values,
    from_normalized, parse_attributes, parse_entity, render_entity,
};
pub use types::{
    AttrMap, Attribute, Entity, EntityId, Metadata, Object, Partition, DEFAULT_ENTITY_TYPE,
};
pub use validation::{validate_attr_name, validate_attrs, validate_entity, ReservedName};
pub use value::Value;
