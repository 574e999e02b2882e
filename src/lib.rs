//! # cascadeui - stateful components for chat-bot message views
//!
//! A headless component library: buttons, select menus and text inputs are
//! composed into trees, attached to views, and report every interaction to a
//! reducer-driven state store before running user callbacks.
//!
//! ## Architecture Overview
//!
//! The state side follows an Elm/Redux-like pattern:
//!
//! - **Model** (`state`): serializable application state
//! - **Message** (`msg`): what happened, wrapped into an `Action`
//! - **Update** (`update`): core reducers, pure state transitions
//! - **Command** (`cmd`): side effects requested by reducers
//! - **Store** (`store`): dispatch, custom reducers, subscribers, history
//!
//! The presentation side holds the component tree:
//!
//! - [`presentation::components`] - `Component`, `CompositeComponent`,
//!   `StatefulButton`, selects, inputs, patterns and wrappers
//! - [`presentation::views`] - the `View` sink and the stateful views
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use cascadeui::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(Store::default());
//!     let mut view = StatefulView::builder("ActionBarView")
//!         .store(Arc::clone(&store))
//!         .user_id(42)
//!         .build()
//!         .await;
//!
//!     let save = StatefulButton::primary("Save", Some(callback(|_| async { Ok(()) })));
//!     let mut bar = CompositeComponent::new();
//!     bar.add_component(save.clone())
//!         .add_component(StatefulButton::danger("Cancel", None));
//!     bar.add_to_view(&mut view).unwrap();
//!
//!     save.press(Interaction::new(42)).await.unwrap();
//!     assert_eq!(store.state().components[&save.custom_id()].interactions.len(), 1);
//! }
//! ```

pub mod app;
pub mod core;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;
pub mod utils;

/// Commonly used types, re-exported for `use cascadeui::prelude::*`.
pub mod prelude {
    pub use crate::core::{
        action::Action,
        msg::Msg,
        state::AppState,
        store::{get_store, Store},
    };
    pub use crate::domain::{Interaction, Response};
    pub use crate::error::{ComponentError, ViewError};
    pub use crate::presentation::components::{
        callback, ButtonStyle, Callback, Component, CompositeComponent, Item, StatefulButton,
        StatefulSelect, TextInput,
    };
    pub use crate::presentation::views::{StatefulView, View, ViewHandle};
}

/// Result type used throughout the library
pub type Result<T, E = color_eyre::eyre::Report> = std::result::Result<T, E>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
