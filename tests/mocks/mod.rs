//! Mock implementations for testing without a host application.
//!
//! Scene graphs, type universes and validators that simulate well-formed
//! and malformed inputs.

pub mod scene;

pub use scene::*;
