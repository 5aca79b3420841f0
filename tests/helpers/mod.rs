//! Shared helpers for integration tests
//!
//! Tolerance assertions and deterministic observation fixtures.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
