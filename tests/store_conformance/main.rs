//! Store Conformance Test Suite
//!
//! Exercises the public surface of `attrstore` end to end against the
//! in-memory backend.
//!
//! ## Test Groups
//!
//! - **mutation**: create/delete and the conditional attribute writes
//! - **query**: filters, sort, pagination, projection
//! - **representation**: payload parsing and rendering at the boundary
//! - **concurrency**: conditional writes racing on one entity
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test store_conformance
//! ```

mod test_utils;

mod concurrency_conformance;
mod mutation_conformance;
mod query_conformance;
mod representation_conformance;
