//! Subcommands

pub mod address;
pub mod config;
pub mod query;
pub mod units;
