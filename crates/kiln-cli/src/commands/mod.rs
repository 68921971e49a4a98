//! Command implementations for the Kiln CLI.

pub mod dev;
pub mod serve;
