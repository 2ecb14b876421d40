//! SQLite backend for the Murmur social-network store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Documents keep their
//! array-valued fields (friends, thought back-references, embedded
//! reactions) as JSON columns, manipulated in place with SQLite's JSON1
//! functions.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
