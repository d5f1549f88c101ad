//! Subcommand implementations.

pub mod batch;
pub mod bench;
pub mod compress;
pub mod fit;
pub mod generate;
