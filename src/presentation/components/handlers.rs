//! Decorators for component callbacks
//!
//! These wrap a [`Callback`] before it is handed to a component, unlike the
//! wrappers in [`super::wrappers`], which decorate a component in place.

use std::sync::Arc;

use tracing::error;

use crate::{
    core::msg::Msg,
    presentation::components::{callback, Callback},
    utils::{error_boundary, retry, RetryConfig},
};

/// Log failures of `inner` under `name`; the error is still returned
pub fn with_error_boundary(name: impl Into<String>, inner: Callback) -> Callback {
    let name: Arc<str> = name.into().into();
    callback(move |interaction| {
        let inner = Arc::clone(&inner);
        let name = Arc::clone(&name);
        async move { error_boundary(&name, inner(interaction)).await }
    })
}

/// Run `inner` again on failure, spaced out as `config` says
///
/// Every attempt sees the same interaction, so replies from failed attempts
/// stay in its response log.
pub fn with_retry(inner: Callback, config: RetryConfig) -> Callback {
    callback(move |interaction| {
        let inner = Arc::clone(&inner);
        let config = config.clone();
        async move { retry(&config, "component callback", || inner(interaction.clone())).await }
    })
}

/// Record a `COMPONENT_INTERACTION` for `component_id` naming `handler`, then
/// run `inner`
///
/// The action goes to the view the interaction came from. Without one the
/// miss is logged and `inner` still runs.
pub fn cascade_component(
    component_id: impl Into<String>,
    handler: impl Into<String>,
    inner: Callback,
) -> Callback {
    let component_id: Arc<str> = component_id.into().into();
    let handler: Arc<str> = handler.into().into();
    callback(move |interaction| {
        let inner = Arc::clone(&inner);
        let component_id = Arc::clone(&component_id);
        let handler = Arc::clone(&handler);
        async move {
            match interaction.view() {
                Some(view) => {
                    view.dispatch(Msg::handler_interaction(
                        &*component_id,
                        view.id(),
                        Some(interaction.user_id()),
                        &*handler,
                    ))
                    .await;
                }
                None => error!("Could not find view for component {component_id}"),
            }
            inner(interaction).await
        }
    })
}
