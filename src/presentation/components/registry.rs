//! Named component factories
//!
//! Factories build a component from JSON props so that component trees can
//! be described as data. The built-in patterns are registered up front.

use std::{collections::HashMap, sync::Arc};

use derive_deref::{Deref, DerefMut};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{
    error::ComponentError,
    presentation::components::{
        Component, ConfirmationButtons, FormLayout, InputField, PaginationControls,
    },
};

/// Builds a component from JSON props
pub type Factory =
    Arc<dyn Fn(&Value) -> Result<Box<dyn Component>, ComponentError> + Send + Sync>;

/// Wrap a closure as a [`Factory`]
pub fn factory<F>(f: F) -> Factory
where
    F: Fn(&Value) -> Result<Box<dyn Component>, ComponentError> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Default, Deref, DerefMut)]
pub struct ComponentRegistry(HashMap<String, Factory>);

impl ComponentRegistry {
    /// Registry holding `confirmation_buttons`, `pagination_controls` and
    /// `form_layout`
    pub fn with_builtins() -> Self {
        let mut registry = Self::default();
        registry.insert(
            "confirmation_buttons".into(),
            factory(|props| {
                let props: ConfirmationProps = parse_props("confirmation_buttons", props)?;
                let buttons = ConfirmationButtons::new(None, None)
                    .with_labels(props.confirm_label, props.cancel_label);
                Ok(Box::new(buttons) as Box<dyn Component>)
            }),
        );
        registry.insert(
            "pagination_controls".into(),
            factory(|props| {
                let props: PaginationProps = parse_props("pagination_controls", props)?;
                Ok(Box::new(PaginationControls::new(
                    props.page_count,
                    props.current_page,
                    None,
                )) as Box<dyn Component>)
            }),
        );
        registry.insert(
            "form_layout".into(),
            factory(|props| {
                let props: FormProps = parse_props("form_layout", props)?;
                Ok(Box::new(FormLayout::new(props.fields, None)) as Box<dyn Component>)
            }),
        );
        registry
    }
}

#[derive(Deserialize)]
struct ConfirmationProps {
    #[serde(default = "default_confirm_label")]
    confirm_label: String,
    #[serde(default = "default_cancel_label")]
    cancel_label: String,
}

fn default_confirm_label() -> String {
    String::from("Yes")
}

fn default_cancel_label() -> String {
    String::from("No")
}

#[derive(Deserialize)]
struct PaginationProps {
    page_count: usize,
    #[serde(default)]
    current_page: usize,
}

#[derive(Deserialize)]
struct FormProps {
    fields: Vec<InputField>,
}

fn parse_props<T: DeserializeOwned>(name: &str, props: &Value) -> Result<T, ComponentError> {
    // Props may be omitted entirely for factories whose fields all default
    let props = if props.is_null() {
        Value::Object(Default::default())
    } else {
        props.clone()
    };
    serde_json::from_value(props).map_err(|e| ComponentError::InvalidProps {
        name: name.to_owned(),
        reason: e.to_string(),
    })
}

lazy_static! {
    static ref REGISTRY: RwLock<ComponentRegistry> = RwLock::new(ComponentRegistry::with_builtins());
}

/// Register `factory` under `name`, replacing any earlier factory
pub fn register_component(name: impl Into<String>, factory: Factory) {
    REGISTRY.write().insert(name.into(), factory);
}

pub fn get_component(name: &str) -> Option<Factory> {
    REGISTRY.read().get(name).map(Arc::clone)
}

/// Build the component registered as `name` from `props`
pub fn create_component(name: &str, props: &Value) -> Result<Box<dyn Component>, ComponentError> {
    let factory =
        get_component(name).ok_or_else(|| ComponentError::UnknownComponent(name.to_owned()))?;
    factory(props)
}
