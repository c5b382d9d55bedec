//! CLI command implementations.

pub mod common;
pub mod compare;
pub mod run;
pub mod version;
