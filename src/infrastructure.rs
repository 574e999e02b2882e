//! Infrastructure layer
//!
//! This module handles the process-level concerns around the library:
//! - CLI argument processing for the demo binary
//! - Configuration loading

pub mod cli;
pub mod config;
