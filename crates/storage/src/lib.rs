//! Document storage for attrstore
//!
//! This crate defines the [`Backend`] seam between the entity layer and the
//! document store, the query vocabulary that crosses it ([`Filter`],
//! [`Update`], [`Plan`], [`Cursor`]) and [`ShardedStore`], the in-memory
//! backend.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cursor;
pub mod document;
pub mod filter;
pub mod plan;
pub mod sharded;
pub mod traits;
pub mod update;

pub use cursor::Cursor;
pub use document::Document;
pub use filter::{Filter, KeyField, Pattern};
pub use plan::{Direction, Plan, SortKey, SortRow};
pub use sharded::{Collection, Shard, ShardedStore};
pub use traits::{Backend, UpdateOutcome};
pub use update::Update;
