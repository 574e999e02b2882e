use std::{fmt, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display};

use crate::{
    domain::{ids::new_component_id, ComponentId, Interaction},
    error::{ComponentError, ViewError},
    presentation::{
        components::{callback, report_interaction, Callback, Component, Interactive, Item},
        views::ViewHandle,
    },
    Result,
};

/// What a select menu picks from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SelectKind {
    /// Fixed list of string options
    Dropdown,
    Role,
    Channel,
    User,
    Mentionable,
}

/// One entry of a dropdown
///
/// Deserializing fills a missing `label` with `"Option"` and a missing
/// `value` with the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOption")]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub default: bool,
}

#[derive(Deserialize)]
struct RawOption {
    #[serde(default = "default_option_label")]
    label: String,
    value: Option<String>,
    description: Option<String>,
    emoji: Option<String>,
    #[serde(default)]
    default: bool,
}

fn default_option_label() -> String {
    String::from("Option")
}

impl From<RawOption> for SelectOption {
    fn from(raw: RawOption) -> Self {
        let value = raw.value.unwrap_or_else(|| raw.label.clone());
        Self {
            label: raw.label,
            value,
            description: raw.description,
            emoji: raw.emoji,
            default: raw.default,
        }
    }
}

impl SelectOption {
    /// Option whose value is its label
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: label.clone(),
            label,
            description: None,
            emoji: None,
            default: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    pub fn from_json(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

impl From<&str> for SelectOption {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

struct SelectInner {
    kind: SelectKind,
    custom_id: ComponentId,
    placeholder: Option<String>,
    options: Vec<SelectOption>,
    min_values: usize,
    max_values: usize,
    values: Vec<String>,
    disabled: bool,
    row: Option<u8>,
    handler: Option<Callback>,
    view: Option<ViewHandle>,
}

/// A select menu that records choices in the store of its view
#[derive(Clone)]
pub struct StatefulSelect {
    inner: Arc<RwLock<SelectInner>>,
}

impl StatefulSelect {
    fn build(
        kind: SelectKind,
        options: Vec<SelectOption>,
        placeholder: Option<&str>,
        callback: Option<Callback>,
    ) -> Self {
        let select = Self {
            inner: Arc::new(RwLock::new(SelectInner {
                kind,
                custom_id: new_component_id("select"),
                placeholder: placeholder.map(str::to_owned),
                options,
                min_values: 1,
                max_values: 1,
                values: Vec::new(),
                disabled: false,
                row: None,
                handler: None,
                view: None,
            })),
        };
        if let Some(callback) = callback {
            select.set_callback(callback);
        }
        select
    }

    pub fn dropdown(
        options: impl IntoIterator<Item = SelectOption>,
        placeholder: Option<&str>,
        callback: Option<Callback>,
    ) -> Self {
        Self::build(
            SelectKind::Dropdown,
            options.into_iter().collect(),
            placeholder,
            callback,
        )
    }

    pub fn role(placeholder: Option<&str>, callback: Option<Callback>) -> Self {
        Self::build(SelectKind::Role, Vec::new(), placeholder, callback)
    }

    pub fn channel(placeholder: Option<&str>, callback: Option<Callback>) -> Self {
        Self::build(SelectKind::Channel, Vec::new(), placeholder, callback)
    }

    pub fn user(placeholder: Option<&str>, callback: Option<Callback>) -> Self {
        Self::build(SelectKind::User, Vec::new(), placeholder, callback)
    }

    pub fn mentionable(placeholder: Option<&str>, callback: Option<Callback>) -> Self {
        Self::build(SelectKind::Mentionable, Vec::new(), placeholder, callback)
    }

    pub fn with_custom_id(self, custom_id: impl Into<ComponentId>) -> Self {
        self.inner.write().custom_id = custom_id.into();
        self
    }

    pub fn with_min_values(self, min_values: usize) -> Self {
        self.inner.write().min_values = min_values;
        self
    }

    pub fn with_max_values(self, max_values: usize) -> Self {
        self.inner.write().max_values = max_values;
        self
    }

    pub fn with_row(self, row: u8) -> Self {
        self.inner.write().row = Some(row);
        self
    }

    pub fn with_disabled(self, disabled: bool) -> Self {
        self.inner.write().disabled = disabled;
        self
    }

    pub fn kind(&self) -> SelectKind {
        self.inner.read().kind
    }

    pub fn custom_id(&self) -> ComponentId {
        self.inner.read().custom_id.clone()
    }

    pub fn placeholder(&self) -> Option<String> {
        self.inner.read().placeholder.clone()
    }

    pub fn options(&self) -> Vec<SelectOption> {
        self.inner.read().options.clone()
    }

    /// Values of the last accepted choice
    pub fn values(&self) -> Vec<String> {
        self.inner.read().values.clone()
    }

    pub fn min_values(&self) -> usize {
        self.inner.read().min_values
    }

    pub fn max_values(&self) -> usize {
        self.inner.read().max_values
    }

    pub fn row(&self) -> Option<u8> {
        self.inner.read().row
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.read().disabled
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.write().disabled = disabled;
    }

    /// Replace the callback; choices dispatch the chosen values before it runs
    pub fn set_callback(&self, user_callback: Callback) {
        let weak = Arc::downgrade(&self.inner);
        self.set_handler(Some(callback(move |interaction| {
            let target = weak.upgrade().map(|inner| {
                let inner = inner.read();
                (inner.view.clone(), inner.custom_id.clone())
            });
            let user_callback = Arc::clone(&user_callback);
            async move {
                if let Some((view, custom_id)) = target {
                    let value = Value::from(interaction.values().to_vec());
                    report_interaction(view.as_ref(), &custom_id, interaction.user_id(), value)
                        .await;
                }
                user_callback(interaction).await
            }
        })));
    }

    pub fn handler(&self) -> Option<Callback> {
        self.inner.read().handler.clone()
    }

    pub fn set_handler(&self, handler: Option<Callback>) {
        self.inner.write().handler = handler;
    }

    /// Choose `values` as `interaction`'s user
    ///
    /// The number of values must lie in `min_values..=max_values` and, for
    /// dropdowns, every value must be one of the option values. Accepted
    /// values are stored before the handler runs.
    pub async fn choose(&self, interaction: Interaction, values: Vec<String>) -> Result<()> {
        let (handler, view) = {
            let mut inner = self.inner.write();
            if inner.disabled {
                return Err(ComponentError::Disabled(inner.custom_id.clone()).into());
            }
            if let Some(view) = inner.view.as_ref().filter(|view| view.is_stopped()) {
                return Err(ViewError::ViewStopped(view.id().to_owned()).into());
            }
            inner.check(&values)?;
            inner.values = values.clone();
            (inner.handler.clone(), inner.view.clone())
        };

        match handler {
            Some(handler) => handler(interaction.with_values(values).with_view(view)).await,
            None => Ok(()),
        }
    }

    pub(crate) fn bind(&self, view: ViewHandle) {
        self.inner.write().view = Some(view);
    }
}

impl SelectInner {
    fn check(&self, values: &[String]) -> Result<(), ComponentError> {
        if values.len() < self.min_values || values.len() > self.max_values {
            return Err(ComponentError::InvalidSelection {
                custom_id: self.custom_id.clone(),
                reason: format!(
                    "expected {} to {} value(s), got {}",
                    self.min_values,
                    self.max_values,
                    values.len()
                ),
            });
        }

        if self.kind == SelectKind::Dropdown {
            if let Some(unknown) = values
                .iter()
                .find(|value| !self.options.iter().any(|option| &option.value == *value))
            {
                return Err(ComponentError::InvalidSelection {
                    custom_id: self.custom_id.clone(),
                    reason: format!("{unknown} is not an option"),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for StatefulSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("StatefulSelect")
            .field("custom_id", &inner.custom_id)
            .field("kind", &inner.kind)
            .field("options", &inner.options.len())
            .field("values", &inner.values)
            .finish()
    }
}

impl Component for StatefulSelect {
    fn items(&self) -> Vec<Item> {
        vec![Item::Select(self.clone())]
    }
}

impl Interactive for StatefulSelect {
    fn custom_id(&self) -> ComponentId {
        StatefulSelect::custom_id(self)
    }

    fn handler(&self) -> Option<Callback> {
        StatefulSelect::handler(self)
    }

    fn set_handler(&self, handler: Option<Callback>) {
        StatefulSelect::set_handler(self, handler);
    }
}
