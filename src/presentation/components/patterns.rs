//! Ready-made component groups

use std::{fmt, future::Future, sync::Arc};

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;

use crate::{
    domain::Interaction,
    presentation::components::{
        callback, ButtonStyle, Callback, Component, CompositeComponent, FieldKind, InputField,
        Item, StatefulButton, StatefulSelect, TextInput, WeakButton,
    },
    Result,
};

/// Yes / No button pair
#[derive(Debug)]
pub struct ConfirmationButtons {
    confirm: StatefulButton,
    cancel: StatefulButton,
}

impl ConfirmationButtons {
    pub fn new(on_confirm: Option<Callback>, on_cancel: Option<Callback>) -> Self {
        Self {
            confirm: StatefulButton::success("Yes", on_confirm),
            cancel: StatefulButton::danger("No", on_cancel),
        }
    }

    pub fn with_labels(self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm.set_label(confirm);
        self.cancel.set_label(cancel);
        self
    }

    pub fn with_styles(self, confirm: ButtonStyle, cancel: ButtonStyle) -> Self {
        self.confirm.set_style(confirm);
        self.cancel.set_style(cancel);
        self
    }

    pub fn confirm_button(&self) -> &StatefulButton {
        &self.confirm
    }

    pub fn cancel_button(&self) -> &StatefulButton {
        &self.cancel
    }
}

impl Component for ConfirmationButtons {
    fn items(&self) -> Vec<Item> {
        vec![
            Item::Button(self.confirm.clone()),
            Item::Button(self.cancel.clone()),
        ]
    }
}

/// Called with the zero-based page after each page change
pub type PageCallback =
    Arc<dyn Fn(Interaction, usize) -> BoxFuture<'static, Result<()>> + Send + Sync>;

pub fn page_callback<F, Fut>(f: F) -> PageCallback
where
    F: Fn(Interaction, usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |interaction, page| f(interaction, page).boxed())
}

struct Pager {
    page_count: usize,
    current_page: Mutex<usize>,
    on_page_change: Option<PageCallback>,
    prev: WeakButton,
    indicator: WeakButton,
    next: WeakButton,
}

impl Pager {
    /// Move by one page; `None` when already at the edge
    fn step(&self, forward: bool) -> Option<usize> {
        let page = {
            let mut current = self.current_page.lock();
            match forward {
                true if *current + 1 < self.page_count => *current += 1,
                false if *current > 0 => *current -= 1,
                _ => return None,
            }
            *current
        };
        self.sync_buttons(page);
        Some(page)
    }

    fn sync_buttons(&self, page: usize) {
        if let Some(prev) = self.prev.upgrade() {
            prev.set_disabled(page == 0);
        }
        if let Some(next) = self.next.upgrade() {
            next.set_disabled(page + 1 >= self.page_count);
        }
        if let Some(indicator) = self.indicator.upgrade() {
            indicator.set_label(page_label(page, self.page_count));
        }
    }

    async fn turn(&self, interaction: Interaction, forward: bool) -> Result<()> {
        let Some(page) = self.step(forward) else {
            return Ok(());
        };

        match &self.on_page_change {
            Some(on_page_change) => on_page_change(interaction, page).await,
            None => {
                interaction.defer();
                Ok(())
            }
        }
    }
}

fn page_label(page: usize, page_count: usize) -> String {
    format!("Page {}/{}", page + 1, page_count)
}

/// Previous / `Page n/m` / Next controls
///
/// The page count is at least 1 and the current page is clamped into range.
/// Previous is disabled on the first page, Next on the last, and the
/// indicator always.
pub struct PaginationControls {
    pager: Arc<Pager>,
    prev: StatefulButton,
    indicator: StatefulButton,
    next: StatefulButton,
}

impl PaginationControls {
    pub fn new(
        page_count: usize,
        current_page: usize,
        on_page_change: Option<PageCallback>,
    ) -> Self {
        let page_count = page_count.max(1);
        let current_page = current_page.min(page_count - 1);

        let prev = StatefulButton::secondary("Previous", None).with_disabled(current_page == 0);
        let indicator = StatefulButton::secondary(page_label(current_page, page_count), None)
            .with_disabled(true);
        let next = StatefulButton::secondary("Next", None)
            .with_disabled(current_page + 1 >= page_count);

        let pager = Arc::new(Pager {
            page_count,
            current_page: Mutex::new(current_page),
            on_page_change,
            prev: prev.downgrade(),
            indicator: indicator.downgrade(),
            next: next.downgrade(),
        });
        prev.set_callback(turn_page(&pager, false));
        next.set_callback(turn_page(&pager, true));

        Self {
            pager,
            prev,
            indicator,
            next,
        }
    }

    /// Give the three buttons fixed custom ids
    pub fn with_custom_ids(self, prev: &str, indicator: &str, next: &str) -> Self {
        Self {
            prev: self.prev.with_custom_id(prev),
            indicator: self.indicator.with_custom_id(indicator),
            next: self.next.with_custom_id(next),
            pager: self.pager,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count
    }

    /// Zero-based current page
    pub fn current_page(&self) -> usize {
        *self.pager.current_page.lock()
    }

    pub fn prev_button(&self) -> &StatefulButton {
        &self.prev
    }

    pub fn indicator(&self) -> &StatefulButton {
        &self.indicator
    }

    pub fn next_button(&self) -> &StatefulButton {
        &self.next
    }
}

fn turn_page(pager: &Arc<Pager>, forward: bool) -> Callback {
    let pager = Arc::clone(pager);
    callback(move |interaction| {
        let pager = Arc::clone(&pager);
        async move { pager.turn(interaction, forward).await }
    })
}

impl Component for PaginationControls {
    fn items(&self) -> Vec<Item> {
        vec![
            Item::Button(self.prev.clone()),
            Item::Button(self.indicator.clone()),
            Item::Button(self.next.clone()),
        ]
    }
}

impl fmt::Debug for PaginationControls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationControls")
            .field("page_count", &self.page_count())
            .field("current_page", &self.current_page())
            .finish()
    }
}

/// Controls generated from field definitions
///
/// String fields become text inputs, boolean fields toggle buttons starting
/// from their `default`, and select fields dropdowns. A "Submit" button is
/// appended when `on_submit` is given.
#[derive(Debug)]
pub struct FormLayout {
    fields: Vec<InputField>,
    controls: Vec<(String, Item)>,
    submit: Option<StatefulButton>,
}

impl FormLayout {
    pub fn new(fields: Vec<InputField>, on_submit: Option<Callback>) -> Self {
        let controls = fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let id = if field.id.is_empty() {
                    format!("field_{index}")
                } else {
                    field.id.clone()
                };
                (id, field_control(field))
            })
            .collect();
        let submit = on_submit.map(|on_submit| StatefulButton::success("Submit", Some(on_submit)));

        Self {
            fields,
            controls,
            submit,
        }
    }

    pub fn fields(&self) -> &[InputField] {
        &self.fields
    }

    /// Control generated for the field `id`
    pub fn control(&self, id: &str) -> Option<&Item> {
        self.controls
            .iter()
            .find(|(field_id, _)| field_id == id)
            .map(|(_, item)| item)
    }

    pub fn submit_button(&self) -> Option<&StatefulButton> {
        self.submit.as_ref()
    }
}

fn field_control(field: &InputField) -> Item {
    let label = field.display_label();
    match field.kind {
        FieldKind::String => {
            let mut input = TextInput::new(label).with_required(field.required);
            if let Some(placeholder) = field.placeholder() {
                input = input.with_placeholder(placeholder);
            }
            Item::TextInput(input)
        }
        FieldKind::Boolean => {
            Item::Button(StatefulButton::toggle(label, None, field.default_bool(), None))
        }
        FieldKind::Select => Item::Select(StatefulSelect::dropdown(
            field.select_options(),
            field.placeholder(),
            None,
        )),
    }
}

impl Component for FormLayout {
    fn items(&self) -> Vec<Item> {
        let mut composite = CompositeComponent::new();
        for (_, control) in &self.controls {
            composite.add_component(control.clone());
        }
        if let Some(submit) = &self.submit {
            composite.add_component(submit.clone());
        }
        composite.items()
    }
}
