//! Field updates applied by a conditional write.

use crate::document::Document;
use attrstore_core::AttrMap;

/// Change applied to a document once its precondition holds
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Set each named attribute, leaving the others untouched
    SetAttrs(AttrMap),
    /// Replace the whole attribute map
    ReplaceAttrs(AttrMap),
    /// Remove one attribute; a missing attribute is a no-op
    UnsetAttr(String),
}

impl Update {
    /// Apply in place
    pub fn apply(&self, doc: &mut Document) {
        match self {
            Update::SetAttrs(attrs) => {
                for (name, attr) in attrs {
                    doc.attrs.insert(name.clone(), attr.clone());
                }
            }
            Update::ReplaceAttrs(attrs) => doc.attrs = attrs.clone(),
            Update::UnsetAttr(name) => {
                doc.attrs.remove(name);
            }
        }
    }

    /// Operator name, for logs
    pub fn op_name(&self) -> &'static str {
        match self {
            Update::SetAttrs(_) => "$set",
            Update::ReplaceAttrs(_) => "$set attrs",
            Update::UnsetAttr(_) => "$unset",
        }
    }
}
