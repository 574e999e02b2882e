//! Typed errors for views and components
//!
//! Callbacks and application code use `color_eyre::eyre::Result`; these types
//! cover the failure modes callers are expected to match on.

use thiserror::Error;

use crate::domain::ids::{ComponentId, ViewId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("view {view_id} is full: {requested} item(s) requested, {remaining} slot(s) left")]
    ViewFull {
        view_id: ViewId,
        requested: usize,
        remaining: usize,
    },

    #[error("view {0} has been stopped")]
    ViewStopped(ViewId),

    #[error("view {view_id} already has an item with custom id {custom_id}")]
    DuplicateCustomId {
        view_id: ViewId,
        custom_id: ComponentId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentError {
    #[error("link button {0} opens a url and cannot be pressed")]
    LinkButton(ComponentId),

    #[error("component {0} is disabled")]
    Disabled(ComponentId),

    #[error("invalid selection for {custom_id}: {reason}")]
    InvalidSelection {
        custom_id: ComponentId,
        reason: String,
    },

    #[error("invalid input for {custom_id}: {reason}")]
    InvalidInput {
        custom_id: ComponentId,
        reason: String,
    },

    #[error("no component registered as {0}")]
    UnknownComponent(String),

    #[error("invalid props for {name}: {reason}")]
    InvalidProps { name: String, reason: String },
}
