//! Scripted walk-through used by the `cascadeui` binary
//!
//! Builds a few views on a fresh store, drives their components the way a
//! user would and returns the resulting state.

use std::{collections::BTreeMap, sync::Arc};

use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::{
    core::{
        msg::Msg,
        state::AppState,
        store::{reducer, Store},
    },
    domain::{Interaction, UserId},
    infrastructure::config::Config,
    utils::RetryConfig,
    presentation::{
        components::{
            callback, cascade_component, create_boolean_field, create_select_field,
            create_text_field, modal_callback, with_confirmation, with_cooldown,
            with_error_boundary, with_loading_state, with_retry, Component, CompositeComponent,
            Item, Modal, SelectOption, StatefulButton, TextInput,
        },
        views::{form_callback, paginated, FormView, PaginatedView, StatefulView},
    },
    Result,
};

pub const COUNTER_INCREMENTED: &str = "COUNTER_INCREMENTED";

pub struct App {
    pub config: Config,
    pub user_id: UserId,
    pub pages: usize,
    pub store: Arc<Store>,
}

impl App {
    pub fn new(config: Config, user_id: UserId, pages: usize) -> Self {
        let store = Arc::new(Store::new(&config.store));
        Self {
            config,
            user_id,
            pages,
            store,
        }
    }

    pub async fn run(&self) -> Result<AppState> {
        self.store.register_reducer(
            COUNTER_INCREMENTED,
            reducer(|action, mut state| {
                if let Msg::Custom { payload, .. } = &action.msg {
                    let by = payload.as_i64().unwrap_or(1);
                    let current = state
                        .application
                        .get("counter")
                        .and_then(Value::as_i64)
                        .unwrap_or(0);
                    state
                        .application
                        .insert("counter".into(), json!(current + by));
                }
                state
            }),
        );

        let view = self.action_bar().await?;
        let mut view = self.pagination(view).await?;
        let close = view.add_exit_button("Close")?;
        self.form().await?;

        let interaction = self.interaction();
        close.press(interaction.clone()).await?;
        if let Some(reply) = interaction.last_message() {
            info!("{reply}");
        }

        Ok(self.store.state())
    }

    fn interaction(&self) -> Interaction {
        Interaction::new(self.user_id)
    }

    async fn action_bar(&self) -> Result<StatefulView> {
        let mut view = StatefulView::builder("ActionBarView")
            .store(Arc::clone(&self.store))
            .config(&self.config.view)
            .user_id(self.user_id)
            .build()
            .await;
        view.attach_message("demo_message", Some("demo_channel".into()))
            .await;

        let store = Arc::clone(&self.store);
        let save = StatefulButton::primary(
            "Save",
            Some(callback(move |interaction| {
                let store = Arc::clone(&store);
                async move {
                    store
                        .dispatch(Msg::custom(COUNTER_INCREMENTED, json!(1)), None)
                        .await;
                    interaction.send_message("Saved.", true);
                    Ok(())
                }
            })),
        );
        let notify = StatefulButton::toggle("Notifications", None, false, None);
        let refresh = with_cooldown(
            with_loading_state(
                StatefulButton::secondary(
                    "Refresh",
                    Some(with_retry(
                        callback(|interaction| async move {
                            interaction.defer();
                            Ok(())
                        }),
                        RetryConfig::default(),
                    )),
                ),
                &self.config.components,
            ),
            self.config.components.cooldown(),
        );

        let reset = with_confirmation(
            StatefulButton::danger(
                "Reset",
                Some(cascade_component(
                    "reset",
                    "on_reset",
                    with_error_boundary(
                        "reset",
                        callback(|interaction| async move {
                            interaction.send_message("Preferences reset.", true);
                            Ok(())
                        }),
                    ),
                )),
            ),
            "Reset preferences",
            "Notification settings go back to their defaults.",
        );

        let mut bar = CompositeComponent::new();
        bar.add_component(save.clone())
            .add_component(notify.clone())
            .add_component(refresh.clone())
            .add_component(reset.clone());
        bar.add_to_view(&mut view)?;

        if let Some(timeout) = self.config.view.timeout() {
            let view_id = view.id().to_owned();
            view.spawn(async move {
                tokio::time::sleep(timeout).await;
                warn!("view {view_id} is still open after {timeout:?}");
                Ok(())
            });
        }

        save.press(self.interaction()).await?;
        save.press(self.interaction()).await?;
        notify.press(self.interaction()).await?;
        info!("notifications toggled to {:?}", notify.is_toggled());

        refresh.press(self.interaction()).await?;
        let throttled = self.interaction();
        refresh.press(throttled.clone()).await?;
        if let Some(reply) = throttled.last_message() {
            info!("{reply}");
        }

        let asked = self.interaction();
        reset.press(asked.clone()).await?;
        if let Some(prompt) = asked.last_prompt().and_then(|id| asked.take_view(&id)) {
            if let Some(yes) = prompt.items().first().and_then(Item::as_button) {
                yes.press(self.interaction()).await?;
            }
        }
        if let Some(reply) = asked.last_message() {
            info!("{reply}");
        }

        let modal = Modal::new(
            "Feedback",
            [TextInput::new("Comment").with_max_length(200)],
        )
        .for_view(view.handle())
        .with_callback(modal_callback(|interaction, values| async move {
            info!("feedback received: {values:?}");
            interaction.send_message("Thanks for the feedback!", true);
            Ok(())
        }));
        let mut values = BTreeMap::new();
        values.insert("input_comment".to_owned(), "Works nicely".to_owned());
        modal.submit(self.interaction(), values).await?;

        Ok(view)
    }

    async fn pagination(&self, view: StatefulView) -> Result<PaginatedView> {
        let mut params = Map::new();
        params.insert("pages".into(), json!(self.pages));
        let next = view.transition_to("PaginatedView", params).await?;
        view.exit().await;

        let pages = (1..=self.pages)
            .map(|page| format!("Page {page} of the demo content"))
            .collect();
        let view = PaginatedView::new(next, pages)?;

        if let Some(next_button) = button(view.items(), paginated::NEXT_ID) {
            while !next_button.is_disabled() {
                next_button.press(self.interaction()).await?;
            }
        }
        info!(
            "paginated to page {}: {:?}",
            view.current_page() + 1,
            view.current_content()
        );

        Ok(view)
    }

    async fn form(&self) -> Result<()> {
        let view = StatefulView::builder("FormView")
            .store(Arc::clone(&self.store))
            .config(&self.config.view)
            .user_id(self.user_id)
            .build()
            .await;
        let fields = vec![
            create_text_field("nickname", "Nickname", false, Some("How should we call you?")),
            create_select_field(
                "plan",
                "Plan",
                vec![SelectOption::new("Free"), SelectOption::new("Pro")],
                true,
                None,
            ),
            create_boolean_field("terms", "Accept terms", true),
        ];
        let form = FormView::new(
            view,
            "Signup",
            fields,
            Some(form_callback(|interaction, values| async move {
                info!("form submitted: {values:?}");
                interaction.send_message("Signed up!", true);
                Ok(())
            })),
        )?;

        let submit = button(form.items(), "form_submit");
        let incomplete = self.interaction();
        if let Some(submit) = &submit {
            submit.press(incomplete.clone()).await?;
        }
        if let Some(reply) = incomplete.last_message() {
            info!("{reply}");
        }

        form.set_value("nickname", json!("demo"));
        if let Some(Item::Select(plan)) = form.item("form_plan") {
            plan.choose(self.interaction(), vec!["Pro".into()]).await?;
        }
        if let Some(accept) = button(form.items(), "form_terms_yes") {
            accept.press(self.interaction()).await?;
        }
        if let Some(submit) = &submit {
            submit.press(self.interaction()).await?;
        }
        info!("form summary:\n{}", form.summary());

        form.exit().await;
        Ok(())
    }
}

fn button(items: &[Item], custom_id: &str) -> Option<StatefulButton> {
    items
        .iter()
        .find(|item| item.custom_id() == custom_id)
        .and_then(Item::as_button)
        .cloned()
}
