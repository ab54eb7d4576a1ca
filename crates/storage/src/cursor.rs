//! Forward-only result cursor
//!
//! A [`Cursor`] yields documents until its source is exhausted or fails. A
//! failure ends iteration and is kept for [`Cursor::err`], so callers iterate
//! with a plain `for` loop and check the error once afterwards.

use crate::document::Document;
use attrstore_core::{Error, Result};
use std::fmt;

type Source = Box<dyn Iterator<Item = Result<Document>> + Send>;

/// Result cursor
pub struct Cursor {
    source: Source,
    error: Option<Error>,
    exhausted: bool,
}

impl Cursor {
    /// Cursor over a fallible source
    pub fn new<I>(source: I) -> Self
    where
        I: Iterator<Item = Result<Document>> + Send + 'static,
    {
        Self {
            source: Box::new(source),
            error: None,
            exhausted: false,
        }
    }

    /// Cursor over documents already in hand
    pub fn from_documents(docs: Vec<Document>) -> Self {
        Self::new(docs.into_iter().map(Ok))
    }

    /// Cursor with nothing to yield
    pub fn empty() -> Self {
        Self::from_documents(Vec::new())
    }

    /// Next document, or `None` when exhausted or failed
    pub fn next_document(&mut self) -> Option<Document> {
        if self.exhausted {
            return None;
        }
        match self.source.next() {
            Some(Ok(doc)) => Some(doc),
            Some(Err(e)) => {
                self.error = Some(e);
                self.exhausted = true;
                None
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }

    /// Failure that ended iteration, if any
    pub fn err(&self) -> Option<&Error> {
        self.error.as_ref()
    }
}

impl Iterator for Cursor {
    type Item = Document;

    fn next(&mut self) -> Option<Document> {
        self.next_document()
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("exhausted", &self.exhausted)
            .field("error", &self.error)
            .finish()
    }
}
