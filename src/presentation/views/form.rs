use std::{
    collections::BTreeMap,
    fmt,
    future::Future,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use serde_json::Value;

use crate::{
    domain::Interaction,
    error::ViewError,
    presentation::{
        components::{
            callback, ButtonStyle, FieldKind, InputField, Item, StatefulButton,
            StatefulSelect,
        },
        views::{StatefulView, View},
    },
    Result,
};

pub const SUBMIT_ID: &str = "form_submit";

/// Called with the collected values when a complete form is submitted
pub type FormCallback = Arc<
    dyn Fn(Interaction, BTreeMap<String, Value>) -> BoxFuture<'static, Result<()>> + Send + Sync,
>;

pub fn form_callback<F, Fut>(f: F) -> FormCallback
where
    F: Fn(Interaction, BTreeMap<String, Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |interaction, values| f(interaction, values).boxed())
}

struct FormState {
    fields: Vec<InputField>,
    values: Mutex<BTreeMap<String, Value>>,
    on_submit: Option<FormCallback>,
}

impl FormState {
    fn set(&self, field_id: &str, value: Value) {
        self.values.lock().insert(field_id.to_owned(), value);
    }

    fn missing_fields(&self) -> Vec<String> {
        let values = self.values.lock();
        self.fields
            .iter()
            .filter(|field| field.required)
            .filter(|field| values.get(&field.id).map_or(true, Value::is_null))
            .map(|field| field.display_label().to_owned())
            .collect()
    }

    async fn submit(&self, interaction: Interaction) -> Result<()> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            interaction.send_message(
                format!("Please complete all required fields: {}", missing.join(", ")),
                true,
            );
            return Ok(());
        }

        let values = self.values.lock().clone();
        match &self.on_submit {
            Some(on_submit) => on_submit(interaction, values).await,
            None => {
                let values = serde_json::to_string(&values)?;
                interaction.send_message(format!("Form submitted with values: {values}"), true);
                Ok(())
            }
        }
    }
}

/// A view collecting answers for a list of fields
///
/// Select fields get a `form_<id>` dropdown, boolean fields a
/// `form_<id>_yes` / `form_<id>_no` pair on row `index % 5`, and a
/// `form_submit` button comes last. Text fields have no control here and are
/// filled through [`FormView::set_value`].
pub struct FormView {
    view: StatefulView,
    title: String,
    state: Arc<FormState>,
}

impl FormView {
    pub fn new(
        mut view: StatefulView,
        title: impl Into<String>,
        fields: Vec<InputField>,
        on_submit: Option<FormCallback>,
    ) -> Result<Self, ViewError> {
        let state = Arc::new(FormState {
            fields,
            values: Mutex::new(BTreeMap::new()),
            on_submit,
        });

        for (index, field) in state.fields.iter().enumerate() {
            let row = (index % 5) as u8;
            match field.kind {
                FieldKind::Select => {
                    view.add_item(Item::Select(select_control(&state, field, row)))?;
                }
                FieldKind::Boolean => {
                    view.add_item(Item::Button(answer_button(&state, field, true, row)))?;
                    view.add_item(Item::Button(answer_button(&state, field, false, row)))?;
                }
                FieldKind::String => {}
            }
        }

        let submit_state = Arc::clone(&state);
        let submit = StatefulButton::primary(
            "Submit",
            Some(callback(move |interaction| {
                let state = Arc::clone(&submit_state);
                async move { state.submit(interaction).await }
            })),
        )
        .with_custom_id(SUBMIT_ID)
        .with_row((state.fields.len() % 5) as u8);
        view.add_item(Item::Button(submit))?;

        Ok(Self {
            view,
            title: title.into(),
            state,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &[InputField] {
        &self.state.fields
    }

    /// Answers collected so far, keyed by field id
    pub fn values(&self) -> BTreeMap<String, Value> {
        self.state.values.lock().clone()
    }

    pub fn set_value(&self, field_id: &str, value: Value) {
        self.state.set(field_id, value);
    }

    /// Labels of required fields without an answer, in field order
    pub fn missing_fields(&self) -> Vec<String> {
        self.state.missing_fields()
    }

    /// One `label: value` line per field; required labels end with `*`
    pub fn summary(&self) -> String {
        let values = self.state.values.lock();
        self.state
            .fields
            .iter()
            .map(|field| {
                let marker = if field.required { " *" } else { "" };
                let value = match (field.kind, values.get(&field.id)) {
                    (FieldKind::Boolean, Some(Value::Bool(true))) => "Yes".to_owned(),
                    (FieldKind::Boolean, Some(Value::Bool(false))) => "No".to_owned(),
                    (_, None | Some(Value::Null)) | (FieldKind::Boolean, _) => {
                        "Not set".to_owned()
                    }
                    (_, Some(Value::String(value))) => value.clone(),
                    (_, Some(value)) => value.to_string(),
                };
                format!("{}{marker}: {value}", field.display_label())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn select_control(state: &Arc<FormState>, field: &InputField, row: u8) -> StatefulSelect {
    let placeholder = field
        .placeholder()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Select {}...", field.display_label()));
    let field_id = field.id.clone();
    let state = Arc::clone(state);

    StatefulSelect::dropdown(
        field.select_options(),
        Some(placeholder.as_str()),
        Some(callback(move |interaction| {
            if let Some(value) = interaction.values().first() {
                state.set(&field_id, Value::String(value.clone()));
            }
            async move {
                interaction.defer();
                Ok(())
            }
        })),
    )
    .with_custom_id(format!("form_{}", field.id))
    .with_min_values(usize::from(field.required))
    .with_max_values(1)
    .with_row(row)
}

fn answer_button(state: &Arc<FormState>, field: &InputField, answer: bool, row: u8) -> StatefulButton {
    let (label, style, suffix) = if answer {
        ("Yes", ButtonStyle::Success, "yes")
    } else {
        ("No", ButtonStyle::Danger, "no")
    };
    let field_id = field.id.clone();
    let state = Arc::clone(state);

    StatefulButton::with_style(
        label,
        style,
        Some(callback(move |interaction| {
            state.set(&field_id, Value::Bool(answer));
            async move {
                interaction.defer();
                Ok(())
            }
        })),
    )
    .with_custom_id(format!("form_{}_{suffix}", field.id))
    .with_row(row)
}

impl Deref for FormView {
    type Target = StatefulView;

    fn deref(&self) -> &Self::Target {
        &self.view
    }
}

impl DerefMut for FormView {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.view
    }
}

impl fmt::Debug for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormView")
            .field("view", &self.view)
            .field("title", &self.title)
            .field("fields", &self.state.fields)
            .field("values", &self.values())
            .finish()
    }
}
