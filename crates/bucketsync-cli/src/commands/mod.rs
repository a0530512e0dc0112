//! Subcommands

pub mod sync;
