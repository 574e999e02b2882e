use std::{collections::BTreeMap, fmt, future::Future, sync::Arc};

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display};

use crate::{
    core::msg::Msg,
    domain::{ComponentId, Interaction},
    error::ComponentError,
    presentation::{
        components::{Component, Item, SelectOption},
        views::ViewHandle,
    },
    Result,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    /// Single line
    #[default]
    Short,
    Paragraph,
}

/// A text field of a modal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInput {
    pub label: String,
    pub placeholder: Option<String>,
    pub default: Option<String>,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub style: TextStyle,
    custom_id: ComponentId,
}

impl TextInput {
    /// Required short input with custom id `input_<label>`
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let custom_id = format!("input_{}", label.to_lowercase().replace(' ', "_"));
        Self {
            label,
            placeholder: None,
            default: None,
            required: true,
            min_length: None,
            max_length: None,
            style: TextStyle::default(),
            custom_id,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn custom_id(&self) -> &str {
        &self.custom_id
    }

    /// Check a submitted value against `required` and the length limits
    ///
    /// Lengths count characters. An empty optional value skips the length
    /// checks.
    pub fn validate(&self, value: &str) -> Result<(), ComponentError> {
        let invalid = |reason: String| ComponentError::InvalidInput {
            custom_id: self.custom_id.clone(),
            reason,
        };

        if value.is_empty() {
            return if self.required {
                Err(invalid(format!("{} is required", self.label)))
            } else {
                Ok(())
            };
        }

        let length = value.chars().count();
        if let Some(min) = self.min_length.filter(|min| length < *min) {
            return Err(invalid(format!("at least {min} character(s) required, got {length}")));
        }
        if let Some(max) = self.max_length.filter(|max| length > *max) {
            return Err(invalid(format!("at most {max} character(s) allowed, got {length}")));
        }
        Ok(())
    }
}

impl Component for TextInput {
    fn items(&self) -> Vec<Item> {
        vec![Item::TextInput(self.clone())]
    }
}

/// Called with the submitted `custom_id -> value` map
pub type ModalCallback =
    Arc<dyn Fn(Interaction, BTreeMap<String, String>) -> BoxFuture<'static, Result<()>> + Send + Sync>;

pub fn modal_callback<F, Fut>(f: F) -> ModalCallback
where
    F: Fn(Interaction, BTreeMap<String, String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |interaction, values| f(interaction, values).boxed())
}

/// A dialog of text inputs
#[derive(Clone)]
pub struct Modal {
    title: String,
    inputs: Vec<TextInput>,
    callback: Option<ModalCallback>,
    view: Option<ViewHandle>,
}

impl Modal {
    pub fn new(title: impl Into<String>, inputs: impl IntoIterator<Item = TextInput>) -> Self {
        Self {
            title: title.into(),
            inputs: inputs.into_iter().collect(),
            callback: None,
            view: None,
        }
    }

    pub fn with_callback(mut self, callback: ModalCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Report submissions to the store of `view`
    pub fn for_view(mut self, view: &ViewHandle) -> Self {
        self.view = Some(view.clone());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn inputs(&self) -> &[TextInput] {
        &self.inputs
    }

    pub fn input(&self, custom_id: &str) -> Option<&TextInput> {
        self.inputs.iter().find(|input| input.custom_id == custom_id)
    }

    /// Submit the dialog
    ///
    /// Missing values fall back to the input default. Every input is validated
    /// before anything is dispatched; keys that match no input are dropped.
    /// A modal opened for a view dispatches `MODAL_SUBMITTED`, then the
    /// callback runs or the interaction is deferred.
    pub async fn submit(
        &self,
        interaction: Interaction,
        mut values: BTreeMap<String, String>,
    ) -> Result<()> {
        let mut collected = BTreeMap::new();
        for input in &self.inputs {
            let value = values
                .remove(&input.custom_id)
                .or_else(|| input.default.clone())
                .unwrap_or_default();
            input.validate(&value)?;
            collected.insert(input.custom_id.clone(), value);
        }

        if let Some(view) = &self.view {
            view.dispatch(Msg::modal_submitted(
                view.id(),
                collected.clone(),
                Some(interaction.user_id()),
            ))
            .await;
        }

        match &self.callback {
            Some(callback) => callback(interaction, collected).await,
            None => {
                interaction.defer();
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modal")
            .field("title", &self.title)
            .field("inputs", &self.inputs)
            .field("view", &self.view.as_ref().map(ViewHandle::id))
            .finish()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    #[serde(alias = "text")]
    String,
    Select,
    Boolean,
}

/// Field definition for forms
///
/// Serializes to a flat JSON object: `type`, `id`, `label`, `required` and
/// any extra options such as `placeholder`, `options` or `default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputField {
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl InputField {
    pub fn new(
        kind: FieldKind,
        id: impl Into<String>,
        label: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            label: label.into(),
            required,
            options: Map::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Label, or the id when no label was given
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.options.get("placeholder").and_then(Value::as_str)
    }

    /// Initial state of a boolean field
    pub fn default_bool(&self) -> bool {
        self.options
            .get("default")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Options of a select field; entries that are not valid options are skipped
    pub fn select_options(&self) -> Vec<SelectOption> {
        self.options
            .get("options")
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|option| SelectOption::from_json(option.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn create_text_field(
    id: impl Into<String>,
    label: impl Into<String>,
    required: bool,
    placeholder: Option<&str>,
) -> InputField {
    let field = InputField::new(FieldKind::String, id, label, required);
    match placeholder {
        Some(placeholder) => field.with_option("placeholder", Value::from(placeholder)),
        None => field,
    }
}

pub fn create_select_field(
    id: impl Into<String>,
    label: impl Into<String>,
    options: Vec<SelectOption>,
    required: bool,
    placeholder: Option<&str>,
) -> InputField {
    let options = options
        .into_iter()
        .filter_map(|option| serde_json::to_value(option).ok())
        .collect::<Vec<_>>();
    let field = InputField::new(FieldKind::Select, id, label, required)
        .with_option("options", Value::Array(options));
    match placeholder {
        Some(placeholder) => field.with_option("placeholder", Value::from(placeholder)),
        None => field,
    }
}

pub fn create_boolean_field(
    id: impl Into<String>,
    label: impl Into<String>,
    required: bool,
) -> InputField {
    InputField::new(FieldKind::Boolean, id, label, required)
}
