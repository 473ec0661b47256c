//! Data store for the smart group rule engine.
//!
//! All collections (users, custom field values, ideas, comments, votes and
//! smart groups) live in polars DataFrames inside an immutable [`Snapshot`].
//! Queries are composed as `LazyFrame`s and only run when a scope is
//! materialized through [`DataStore::fetch`], which is also where data-fetch
//! round trips are counted.
//!
//! Reference entities (idea statuses, topics, projects, areas, custom fields
//! and their options) are small and held in memory as [`References`]; looking
//! them up is not a fetch.

pub mod columns;
pub mod error;
pub mod groups;
pub mod loader;
pub mod participation;
pub mod references;
pub mod scope;
pub mod snapshot;
pub mod store;

pub use error::StoreError;
pub use loader::load_dataset;
pub use participation::{ParticipationTarget, drop_users, keep_users, participants};
pub use references::References;
pub use scope::{GroupScope, UserScope};
pub use snapshot::{Snapshot, SnapshotBuilder};
pub use store::DataStore;
