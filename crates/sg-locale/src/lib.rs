//! Translation catalog for smart group rule descriptions.
//!
//! Templates live in TOML files, one per locale, with a table per rule type
//! and a key per predicate. English, French and Dutch are embedded; extra
//! files can be layered on top from a directory.

pub mod catalog;
pub mod embedded;
pub mod error;

pub use catalog::{Catalog, DEFAULT_LOCALE, interpolate};
pub use error::LocaleError;
