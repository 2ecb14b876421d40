//! Core types and trait definitions for the Murmur social-network store.
//!
//! This crate carries no HTTP or database dependencies; every other crate
//! in the workspace depends on it, never the other way around.

pub mod error;
pub mod store;
pub mod thought;
pub mod user;

pub use error::{Error, Result};
