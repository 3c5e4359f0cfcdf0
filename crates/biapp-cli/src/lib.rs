//! biapp-cli library root.
//!
//! Re-exports the config, session and command modules so integration tests
//! can drive the evaluation form without going through argument parsing.

pub mod cli;
pub mod commands;
pub mod config;
pub mod session;
