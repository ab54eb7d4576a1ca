//! Entity store engine
//!
//! - [`Store`]: explicit handle owning the backend and collection policy
//! - [`EntityStore`]: atomic per-entity mutations and lookups
//! - [`QueryEngine`]: partition-scoped filtered, sorted, paginated reads
//!
//! # Example
//!
//! ```ignore
//! use attrstore_engine::{EntityStore, Query, QueryEngine, Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::default())?;
//! let entities = EntityStore::new(store.clone());
//! entities.create(&entity)?;
//!
//! let queries = QueryEngine::new(store);
//! for e in queries.run(&Query::new().order_by(["!temperature"]), "S", "SP")? {
//!     println!("{}", e.id);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod entities;
pub mod query;
pub mod store;

pub use config::{CollectionPolicy, StoreConfig};
pub use entities::EntityStore;
pub use query::{EntityCursor, Query, QueryEngine};
pub use store::Store;
