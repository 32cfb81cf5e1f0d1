//! CLI command implementations.

pub mod common;
pub mod diagnose;
pub mod sweep;
pub mod validate;
