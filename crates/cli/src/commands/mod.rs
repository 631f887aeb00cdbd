//! CLI command implementations.

pub mod migrate;
pub mod store;
pub mod users;
