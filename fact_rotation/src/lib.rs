//! # Fact Rotation
//!
//! Shows facts from a [`fact_catalog::FactCatalog`] one at a time, never
//! repeating a fact until every fact has been shown, then starting over.
//! Progress survives restarts through a pluggable state store.
//!
//! ## Core Components
//!
//! - **tracker**: The persisted set of facts shown in the current cycle
//! - **rotation**: Exhaustion check, reset, random selection and recording
//! - **presentation**: The presenter seam plus a terminal presenter
//! - **trigger**: Host events and the debounce gate in front of the rotation
//! - **session**: Wires gate, rotator and presenter together
//! - **config**: TOML settings
//!
//! ## Design Philosophy
//!
//! - **Never blocks the user**: Persistence failures are logged and reported, but
//!   a selected fact is always presented
//! - **Single-threaded**: One rotation at a time; callers serialize triggers
//! - **Injected state**: No global singletons; the store is passed in

pub mod config;
pub mod presentation;
pub mod rotation;
pub mod session;
pub mod tracker;
pub mod trigger;

pub use config::*;
pub use presentation::*;
pub use rotation::*;
pub use session::*;
pub use tracker::*;
pub use trigger::*;
