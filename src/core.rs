//! Core state management
//!
//! This module contains the Elm/Redux-like state side of the library:
//! - Messages and the actions that carry them
//! - Application state
//! - Core reducers and the commands they request
//! - The store that ties them together

pub mod action;
pub mod cmd;
pub mod cmd_executor;
pub mod msg;
pub mod state;
pub mod store;
pub mod update;
