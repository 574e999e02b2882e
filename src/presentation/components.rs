//! Component tree
//!
//! A [`Component`] contributes an ordered list of leaf [`Item`]s. Leaves are
//! the stateful buttons, selects and text inputs; [`CompositeComponent`] and
//! the patterns built on it only group leaves. Adding a component to a
//! [`View`] flattens it and hands every leaf to the view in order.
//!
//! Leaves are shared handles: cloning a `StatefulButton` gives another handle
//! to the same button, so a button kept by the caller observes the view it was
//! later attached to.

use std::{future::Future, sync::Arc};

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tracing::error;

use crate::{
    core::msg::Msg,
    domain::{ids::ComponentId, Interaction, UserId},
    error::ViewError,
    presentation::views::{View, ViewHandle},
    Result,
};

pub mod button;
pub mod composition;
pub mod handlers;
pub mod input;
pub mod patterns;
pub mod registry;
pub mod select;
pub mod wrappers;

pub use button::{ButtonStyle, StatefulButton, WeakButton};
pub use composition::CompositeComponent;
pub use handlers::{cascade_component, with_error_boundary, with_retry};
pub use input::{
    create_boolean_field, create_select_field, create_text_field, modal_callback, FieldKind,
    InputField, Modal, ModalCallback, TextInput, TextStyle,
};
pub use patterns::{
    page_callback, ConfirmationButtons, FormLayout, PageCallback, PaginationControls,
};
pub use registry::{create_component, factory, get_component, register_component, Factory};
pub use select::{SelectKind, SelectOption, StatefulSelect};
pub use wrappers::{
    with_confirmation, with_cooldown, with_loading_label, with_loading_state, CONFIRMATION_TIMEOUT,
};

/// Async function run when a component is triggered
pub type Callback = Arc<dyn Fn(Interaction) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Wrap an async closure as a [`Callback`]
pub fn callback<F, Fut>(f: F) -> Callback
where
    F: Fn(Interaction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |interaction| f(interaction).boxed())
}

/// Leaf unit accepted by a view
#[derive(Debug, Clone)]
pub enum Item {
    Button(StatefulButton),
    Select(StatefulSelect),
    TextInput(TextInput),
}

impl Item {
    pub fn custom_id(&self) -> ComponentId {
        match self {
            Item::Button(button) => button.custom_id(),
            Item::Select(select) => select.custom_id(),
            Item::TextInput(input) => input.custom_id().to_owned(),
        }
    }

    pub fn as_button(&self) -> Option<&StatefulButton> {
        match self {
            Item::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn as_select(&self) -> Option<&StatefulSelect> {
        match self {
            Item::Select(select) => Some(select),
            _ => None,
        }
    }

    pub fn as_text_input(&self) -> Option<&TextInput> {
        match self {
            Item::TextInput(input) => Some(input),
            _ => None,
        }
    }

    /// Route the item's interactions to `view`
    pub(crate) fn bind(&self, view: ViewHandle) {
        match self {
            Item::Button(button) => button.bind(view),
            Item::Select(select) => select.bind(view),
            Item::TextInput(_) => {}
        }
    }
}

/// Anything that can be added to a view
pub trait Component: Send + Sync {
    /// Leaf items in the order they are added to a view
    fn items(&self) -> Vec<Item>;

    /// Add every item to `view`, in order
    ///
    /// When the view reports less remaining capacity than there are items,
    /// nothing is added.
    fn add_to_view(&self, view: &mut dyn View) -> Result<(), ViewError> {
        let items = self.items();
        if let Some(remaining) = view.remaining_capacity() {
            if remaining < items.len() {
                return Err(ViewError::ViewFull {
                    view_id: view.id().to_owned(),
                    requested: items.len(),
                    remaining,
                });
            }
        }

        for item in items {
            view.add_item(item)?;
        }
        Ok(())
    }
}

impl Component for Item {
    fn items(&self) -> Vec<Item> {
        vec![self.clone()]
    }
}

impl<C: Component + ?Sized> Component for Box<C> {
    fn items(&self) -> Vec<Item> {
        (**self).items()
    }
}

impl<C: Component + ?Sized> Component for Arc<C> {
    fn items(&self) -> Vec<Item> {
        (**self).items()
    }
}

/// Leaves whose trigger runs a replaceable handler
///
/// The handler is what `press` / `choose` ends up calling; wrappers decorate
/// it in place.
pub trait Interactive: Component + Clone {
    fn custom_id(&self) -> ComponentId;
    fn handler(&self) -> Option<Callback>;
    fn set_handler(&self, handler: Option<Callback>);
}

/// Record an interaction with `component_id` in the store of `view`
pub(crate) async fn report_interaction(
    view: Option<&ViewHandle>,
    component_id: &str,
    user_id: UserId,
    value: Value,
) {
    match view {
        Some(view) => {
            view.dispatch(Msg::component_interaction(
                component_id,
                view.id(),
                Some(user_id),
                value,
            ))
            .await;
        }
        None => error!("Could not find view for component {component_id}"),
    }
}
