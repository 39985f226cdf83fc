//! Integration tests for scene-validator.
//!
//! These tests drive the public API end to end using mock universes and graphs.

pub mod cli_tests;
pub mod discovery_tests;
pub mod hierarchy_tests;
pub mod output_tests;
pub mod registry_tests;
