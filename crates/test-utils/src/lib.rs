//! Shared test utilities for oaslint crates.

pub mod assertions;
pub mod fixtures;

pub use assertions::{format_messages};
pub use fixtures::{index, BROKEN_PETSTORE, NO_SERVERS, PETSTORE};
