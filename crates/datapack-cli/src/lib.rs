//! Library components for the data package CLI.

pub mod commands;
pub mod logging;
