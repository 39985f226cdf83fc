//! Validation engine module.
//!
//! Provides marker registration, target dispatch and result aggregation.

pub mod registry;
pub mod result;
pub mod runner;
pub mod validator;
