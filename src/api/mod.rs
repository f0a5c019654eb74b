//! API Module
//!
//! Structure:
//! - commands.rs: one handler per CLI subcommand
//! - engine_status.rs: `sar-triage info` payload
//! - scenarios.rs: built-in field scenarios

pub mod commands;
pub mod engine_status;
pub mod scenarios;

pub use commands::*;
