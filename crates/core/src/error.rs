//! Error types for attrstore
//!
//! Every operation in the workspace reports failures through [`Error`].
//! Variants are grouped by [`ErrorKind`], which is what callers at the
//! transport boundary map to status codes.

use thiserror::Error;

/// Result type alias used across attrstore crates
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Entity or attribute absent
    NotFound,
    /// Entity or attribute already present
    Conflict,
    /// Payload does not have the shape of an entity or attribute
    Malformed,
    /// Well-formed input that violates a domain rule
    InvalidUse,
    /// Backend failures, lifecycle misuse, bad configuration
    Internal,
}

/// Errors returned by the model, mutation and query layers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // ---------------------------------------------------------------------
    // Invalid target
    // ---------------------------------------------------------------------
    /// Attribute is not present on the entity
    #[error("attribute not found")]
    NotFoundAttr,

    /// At least one attribute is already present on the entity
    #[error("attribute already exists")]
    ExistentAttr,

    /// An entity with the same key is already stored
    #[error("entity already exists")]
    ExistentEntity,

    /// No entity is stored under the key
    #[error("entity not found")]
    NotFoundEntity,

    // ---------------------------------------------------------------------
    // Invalid object as an entity
    // ---------------------------------------------------------------------
    /// Object has no `id` key
    #[error("missing entity id")]
    MissingEntityId,

    /// Attribute object has no `value` key
    #[error("missing value in attribute")]
    MissingValueField,

    /// Attribute is not a JSON object
    #[error("attribute is not an object")]
    AttrNotAnObject,

    /// `id` is present but not a string
    #[error("id is not a string")]
    IdNotAString,

    /// `type` is present but not a string
    #[error("type is not a string")]
    TypeNotAString,

    /// Attribute `type` is present but not a string
    #[error("attribute type is not a string")]
    AttrTypeNotAString,

    /// Attribute `metadata` is present but not an object
    #[error("metadata is not an object")]
    MdNotAnObject,

    /// Payload object carries no keys
    #[error("empty object")]
    EmptyObject,

    /// Payload is not parseable JSON
    #[error("invalid JSON: {reason}")]
    ParsingJson {
        /// Parser message
        reason: String,
    },

    /// A query pattern is not a valid regular expression
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Pattern as supplied
        pattern: String,
        /// Compiler message
        reason: String,
    },

    // ---------------------------------------------------------------------
    // Invalid domain use
    // ---------------------------------------------------------------------
    /// Entity id is the empty string
    #[error("empty entity id")]
    EmptyEntityId,

    /// Entity type is the empty string
    #[error("empty entity type")]
    EmptyEntityType,

    /// `id` used as an attribute name
    #[error("id is not valid as an attribute name")]
    InvalidAttrId,

    /// `type` used as an attribute name
    #[error("type is not valid as an attribute name")]
    InvalidAttrType,

    // ---------------------------------------------------------------------
    // Internal
    // ---------------------------------------------------------------------
    /// The store handle was closed
    #[error("store is closed")]
    StoreClosed,

    /// Backend failure
    #[error("storage error: {message}")]
    Storage {
        /// Backend message
        message: String,
    },

    /// Configuration rejected at open time
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong
        message: String,
    },
}

impl Error {
    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage {
            message: message.into(),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        Error::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFoundAttr | Error::NotFoundEntity => ErrorKind::NotFound,
            Error::ExistentAttr | Error::ExistentEntity => ErrorKind::Conflict,
            Error::MissingEntityId
            | Error::MissingValueField
            | Error::AttrNotAnObject
            | Error::IdNotAString
            | Error::TypeNotAString
            | Error::AttrTypeNotAString
            | Error::MdNotAnObject
            | Error::EmptyObject
            | Error::ParsingJson { .. }
            | Error::InvalidPattern { .. } => ErrorKind::Malformed,
            Error::EmptyEntityId
            | Error::EmptyEntityType
            | Error::InvalidAttrId
            | Error::InvalidAttrType => ErrorKind::InvalidUse,
            Error::StoreClosed | Error::Storage { .. } | Error::InvalidConfig { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// HTTP status code the transport layer should answer with
    ///
    /// | Kind                           | Status |
    /// |--------------------------------|--------|
    /// | NotFound                       | 404    |
    /// | Conflict, Malformed, InvalidUse| 400    |
    /// | Internal                       | 500    |
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict | ErrorKind::Malformed | ErrorKind::InvalidUse => 400,
            ErrorKind::Internal => 500,
        }
    }

    /// Render as a `{"error": "<message>"}` JSON body
    pub fn to_json(&self) -> String {
        serde_json::json!({ "error": self.to_string() }).to_string()
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ParsingJson {
            reason: e.to_string(),
        }
    }
}
