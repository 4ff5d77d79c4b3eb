//! CLI command implementations.

pub mod compare;
pub mod config;
pub mod search;
