//! Document filters
//!
//! A [`Filter`] is a small predicate tree over the document key and attribute
//! presence. Backends evaluate it with [`Filter::matches`]; the sharded store
//! additionally prunes whole partitions with [`Filter::admits_partition`].
//! [`Filter::describe`] renders the equivalent document-store query, used in
//! logs and by `Plan::describe`.

use crate::document::Document;
use attrstore_core::{EntityId, Error, Partition, Result};
use regex::Regex;
use serde_json::{json, Value as JsonValue};
use std::fmt;

/// Key component a filter can test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyField {
    /// Local id
    Id,
    /// Entity type
    Type,
    /// Service
    Service,
    /// Service path
    ServicePath,
}

impl KeyField {
    /// Dotted path in the stored document
    pub fn path(self) -> &'static str {
        match self {
            KeyField::Id => "_id.id",
            KeyField::Type => "_id.type",
            KeyField::Service => "_id.service",
            KeyField::ServicePath => "_id.servicepath",
        }
    }

    /// Read this component from a key
    pub fn get(self, id: &EntityId) -> &str {
        match self {
            KeyField::Id => &id.id,
            KeyField::Type => &id.entity_type,
            KeyField::Service => &id.service,
            KeyField::ServicePath => &id.service_path,
        }
    }

    fn get_from_partition(self, partition: &Partition) -> Option<&str> {
        match self {
            KeyField::Service => Some(&partition.service),
            KeyField::ServicePath => Some(&partition.service_path),
            KeyField::Id | KeyField::Type => None,
        }
    }
}

/// Compiled regular expression with its source text
///
/// Matching is unanchored: the pattern may match anywhere in the field.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&source).map_err(|e| Error::invalid_pattern(source.clone(), e))?;
        Ok(Self { source, regex })
    }

    /// Source text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern matches anywhere in `text`
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Predicate over stored documents
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document
    All,
    /// Key component equals a string
    Eq(KeyField, String),
    /// Key component is one of the strings; an empty list matches nothing
    In(KeyField, Vec<String>),
    /// Key component matches a pattern
    Regex(KeyField, Pattern),
    /// Attribute is present
    AttrExists(String),
    /// Attribute is absent
    AttrMissing(String),
    /// All sub-filters hold
    And(Vec<Filter>),
}

impl Filter {
    /// Conjunction, flattened
    ///
    /// `All` operands are dropped; nested `And`s are spliced in. No operands
    /// gives `All`, a single operand is returned as is.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Filter {
        let mut flat = Vec::new();
        for f in filters {
            match f {
                Filter::All => {}
                Filter::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Filter::All,
            1 => flat.remove(0),
            _ => Filter::And(flat),
        }
    }

    /// Exact match on the full key
    pub fn key(id: &EntityId) -> Filter {
        Filter::And(vec![
            Filter::Eq(KeyField::Id, id.id.clone()),
            Filter::Eq(KeyField::Type, id.entity_type.clone()),
            Filter::Eq(KeyField::Service, id.service.clone()),
            Filter::Eq(KeyField::ServicePath, id.service_path.clone()),
        ])
    }

    /// Documents of one partition
    pub fn partition(partition: &Partition) -> Filter {
        Filter::And(vec![
            Filter::Eq(KeyField::Service, partition.service.clone()),
            Filter::Eq(KeyField::ServicePath, partition.service_path.clone()),
        ])
    }

    /// Every named attribute is present
    pub fn attrs_exist<'a>(names: impl IntoIterator<Item = &'a String>) -> Filter {
        Filter::and(names.into_iter().map(|n| Filter::AttrExists(n.clone())))
    }

    /// None of the named attributes is present
    pub fn attrs_missing<'a>(names: impl IntoIterator<Item = &'a String>) -> Filter {
        Filter::and(names.into_iter().map(|n| Filter::AttrMissing(n.clone())))
    }

    /// Evaluate against a document
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, v) => field.get(&doc.id) == v,
            Filter::In(field, vs) => {
                let actual = field.get(&doc.id);
                vs.iter().any(|v| v == actual)
            }
            Filter::Regex(field, p) => p.is_match(field.get(&doc.id)),
            Filter::AttrExists(name) => doc.has_attr(name),
            Filter::AttrMissing(name) => !doc.has_attr(name),
            Filter::And(fs) => fs.iter().all(|f| f.matches(doc)),
        }
    }

    /// Whether any document of `partition` could match
    ///
    /// Conservative: only service and service path terms are decided here.
    pub fn admits_partition(&self, partition: &Partition) -> bool {
        match self {
            Filter::Eq(field, v) => field
                .get_from_partition(partition)
                .map_or(true, |actual| actual == v),
            Filter::In(field, vs) => field
                .get_from_partition(partition)
                .map_or(true, |actual| vs.iter().any(|v| v == actual)),
            Filter::Regex(field, p) => field
                .get_from_partition(partition)
                .map_or(true, |actual| p.is_match(actual)),
            Filter::And(fs) => fs.iter().all(|f| f.admits_partition(partition)),
            Filter::All | Filter::AttrExists(_) | Filter::AttrMissing(_) => true,
        }
    }

    /// Equivalent document-store query
    pub fn describe(&self) -> JsonValue {
        match self {
            Filter::All => json!({}),
            Filter::Eq(field, v) => json!({ field.path(): v }),
            Filter::In(field, vs) => json!({ field.path(): { "$in": vs } }),
            Filter::Regex(field, p) => json!({ field.path(): { "$regex": p.as_str() } }),
            Filter::AttrExists(name) => json!({ format!("attrs.{name}"): { "$exists": true } }),
            Filter::AttrMissing(name) => json!({ format!("attrs.{name}"): { "$exists": false } }),
            Filter::And(fs) => {
                json!({ "$and": fs.iter().map(Filter::describe).collect::<Vec<_>>() })
            }
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::All
    }
}
