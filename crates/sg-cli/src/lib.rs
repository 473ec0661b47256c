//! Library side of the `smart-groups` command line tool.

pub mod commands;
pub mod config;
pub mod logging;
pub mod workspace;
