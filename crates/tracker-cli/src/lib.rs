//! CLI library components for the tracker importer.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
