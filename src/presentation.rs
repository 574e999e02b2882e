//! Presentation layer
//!
//! Components and the views they are attached to.

pub mod components;
pub mod views;
