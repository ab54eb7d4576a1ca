//! Query plans
//!
//! A [`Plan`] is what a backend executes for a find: filter, projection,
//! compound sort, skip and limit.
//!
//! Sort order on attribute values follows [`Value::sort_cmp`]; a document
//! lacking the sort attribute sorts as if its value were null. Documents that
//! tie on every sort key are ordered by their full key, in the direction of
//! the first sort key. Pagination over a stable data set is deterministic and
//! a fully descending sort is the exact reverse of the ascending one.
//!
//! Backends sort [`SortRow`]s rather than documents, so only the page that is
//! returned ever needs to be copied out of storage.

use crate::document::Document;
use crate::filter::Filter;
use attrstore_core::{EntityId, Value};
use serde_json::{json, Map, Value as JsonValue};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// One term of a compound sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Attribute whose value is compared
    pub attr: String,
    /// Direction
    pub direction: Direction,
}

impl SortKey {
    /// Ascending on `attr`
    pub fn asc(attr: impl Into<String>) -> Self {
        Self {
            attr: attr.into(),
            direction: Direction::Ascending,
        }
    }

    /// Descending on `attr`
    pub fn desc(attr: impl Into<String>) -> Self {
        Self {
            attr: attr.into(),
            direction: Direction::Descending,
        }
    }

    /// Parse the `[!]attr` form; `None` for an empty name
    pub fn parse(term: &str) -> Option<Self> {
        match term.strip_prefix('!') {
            Some("") => None,
            Some(attr) => Some(Self::desc(attr)),
            None if term.is_empty() => None,
            None => Some(Self::asc(term)),
        }
    }

    /// Dotted path of the compared value
    pub fn path(&self) -> String {
        format!("attrs.{}.value", self.attr)
    }

    /// Value compared for `doc`; null when the attribute is missing
    pub fn value_of(&self, doc: &Document) -> Value {
        doc.attr_value(&self.attr).cloned().unwrap_or_default()
    }

    /// Order two sort values in this key's direction
    pub fn order(&self, a: &Value, b: &Value) -> Ordering {
        self.direction.apply(a.sort_cmp(b))
    }
}

impl Direction {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// Sort values of one match, extracted once per document
#[derive(Debug, Clone, PartialEq)]
pub struct SortRow {
    /// Key of the matched document
    pub id: EntityId,
    /// One value per sort key, in plan order
    pub values: Vec<Value>,
}

/// A find request as executed by a backend
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    /// Which documents
    pub filter: Filter,
    /// Attributes to return; empty returns all
    pub projection: Vec<String>,
    /// Compound sort, most significant first
    pub sort: Vec<SortKey>,
    /// Matches to skip after sorting
    pub skip: usize,
    /// Maximum documents returned; `None` is unbounded
    pub limit: Option<usize>,
}

impl Plan {
    /// Plan returning every match of `filter`, unsorted, unprojected
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Set the projection
    pub fn with_projection(mut self, names: Vec<String>) -> Self {
        self.projection = names;
        self
    }

    /// Set the sort
    pub fn with_sort(mut self, sort: Vec<SortKey>) -> Self {
        self.sort = sort;
        self
    }

    /// Set the skip count
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Set the limit
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Sort row for a matched document
    pub fn sort_row(&self, doc: &Document) -> SortRow {
        SortRow {
            id: doc.id.clone(),
            values: self.sort.iter().map(|k| k.value_of(doc)).collect(),
        }
    }

    /// Total order used to sort matches
    pub fn compare(&self, a: &SortRow, b: &SortRow) -> Ordering {
        self.sort
            .iter()
            .zip(a.values.iter().zip(&b.values))
            .map(|(k, (va, vb))| k.order(va, vb))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| self.tie_break(&a.id, &b.id))
    }

    // Ties follow the leading key's direction.
    fn tie_break(&self, a: &EntityId, b: &EntityId) -> Ordering {
        let direction = self
            .sort
            .first()
            .map_or(Direction::Ascending, |k| k.direction);
        direction.apply(a.cmp(b))
    }

    /// Equivalent document-store find, for logs
    pub fn describe(&self) -> JsonValue {
        let mut out = Map::new();
        out.insert("filter".into(), self.filter.describe());
        if !self.projection.is_empty() {
            let fields: Map<String, JsonValue> = self
                .projection
                .iter()
                .map(|n| (format!("attrs.{n}"), json!(1)))
                .collect();
            out.insert("projection".into(), JsonValue::Object(fields));
        }
        if !self.sort.is_empty() {
            let keys: Vec<JsonValue> = self
                .sort
                .iter()
                .map(|k| {
                    let dir = match k.direction {
                        Direction::Ascending => 1,
                        Direction::Descending => -1,
                    };
                    json!({ k.path(): dir })
                })
                .collect();
            out.insert("sort".into(), JsonValue::Array(keys));
        }
        if self.skip > 0 {
            out.insert("skip".into(), json!(self.skip));
        }
        if let Some(limit) = self.limit {
            out.insert("limit".into(), json!(limit));
        }
        JsonValue::Object(out)
    }
}
