//! # Fact Catalog
//!
//! The fixed collection of facts a rotation cycles through. This crate owns the
//! fact data model and the in-memory catalog; it knows nothing about which facts
//! a user has already seen.
//!
//! ## Core Components
//!
//! - **facts**: The `Fact` record and its identifier
//! - **catalog**: Loading, lookup and random selection with exclusion
//! - **error**: Load failures

pub mod catalog;
pub mod error;
pub mod facts;

pub use catalog::*;
pub use error::*;
pub use facts::*;
