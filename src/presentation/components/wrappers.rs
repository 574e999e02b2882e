//! Decorators around a component's handler

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::{
    domain::Interaction,
    infrastructure::config::ComponentsConfig,
    presentation::{
        components::{callback, Component, ConfirmationButtons, Interactive, StatefulButton},
        views::StatefulView,
    },
};

/// How long a confirmation prompt waits for an answer
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Show the configured loading label while the button's handler runs
pub fn with_loading_state(button: StatefulButton, config: &ComponentsConfig) -> StatefulButton {
    with_loading_label(button, config.loading_label.as_str())
}

/// Disable the button and show `loading_label` while its handler runs
///
/// The enabled state comes back once the handler returns, whether it
/// succeeded or not. So does the original label, unless the handler gave the
/// button a new one (a toggle flipping, say). A button without a handler is
/// returned as is.
pub fn with_loading_label(button: StatefulButton, loading_label: impl Into<String>) -> StatefulButton {
    let Some(original) = button.handler() else {
        return button;
    };
    let loading_label = loading_label.into();
    let weak = button.downgrade();

    button.set_handler(Some(callback(move |interaction| {
        let original = Arc::clone(&original);
        let button = weak.upgrade();
        let loading_label = loading_label.clone();
        async move {
            let Some(button) = button else {
                return original(interaction).await;
            };

            let label = button.label();
            let disabled = button.is_disabled();
            button.set_label(loading_label.as_str());
            button.set_disabled(true);

            let result = original(interaction).await;

            if button.label() == loading_label {
                button.set_label(label);
            }
            button.set_disabled(disabled);
            result
        }
    })));
    button
}

/// Ask for confirmation before running the component's handler
///
/// Each trigger replies with an ephemeral [`Response::Prompt`] carrying a new
/// `ConfirmationView` with Yes / No buttons, built on the store of the
/// component's view (the process-wide store when it has none). Yes exits the
/// prompt and runs the wrapped handler with the original interaction; No
/// exits the prompt and defers.
///
/// [`Response::Prompt`]: crate::domain::Response::Prompt
pub fn with_confirmation<C: Interactive>(
    component: C,
    title: impl Into<String>,
    message: impl Into<String>,
) -> C {
    let Some(original) = component.handler() else {
        return component;
    };
    let title = title.into();
    let message = message.into();

    component.set_handler(Some(callback(move |interaction| {
        let original = Arc::clone(&original);
        let title = title.clone();
        let message = message.clone();
        async move {
            let mut builder = StatefulView::builder("ConfirmationView")
                .user_id(interaction.user_id())
                .timeout(Some(CONFIRMATION_TIMEOUT));
            if let Some(view) = interaction.view() {
                builder = builder.store(Arc::clone(view.store()));
            }
            let mut prompt = builder.build().await;

            let pending = interaction.detached();
            let handle = prompt.handle().clone();
            let on_confirm = {
                let handle = handle.clone();
                callback(move |_| {
                    let handle = handle.clone();
                    let original = Arc::clone(&original);
                    let pending = pending.clone();
                    async move {
                        handle.exit().await;
                        original(pending).await
                    }
                })
            };
            let on_cancel = callback(move |answer: Interaction| {
                let handle = handle.clone();
                async move {
                    handle.exit().await;
                    answer.defer();
                    Ok(())
                }
            });
            ConfirmationButtons::new(Some(on_confirm), Some(on_cancel)).add_to_view(&mut prompt)?;

            interaction.send_prompt(title, message, prompt, true);
            Ok(())
        }
    })));
    component
}

/// Reject interactions arriving within `cooldown` of the last accepted one
///
/// A rejected interaction gets an ephemeral reply with the remaining time and
/// the wrapped handler does not run.
pub fn with_cooldown<C: Interactive>(component: C, cooldown: Duration) -> C {
    let Some(original) = component.handler() else {
        return component;
    };
    let cooldown_until: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));

    component.set_handler(Some(callback(move |interaction| {
        let original = Arc::clone(&original);
        let now = Instant::now();
        let remaining = {
            let mut slot = cooldown_until.lock();
            match *slot {
                Some(until) if now < until => Some(until - now),
                _ => {
                    *slot = Some(now + cooldown);
                    None
                }
            }
        };

        async move {
            if let Some(remaining) = remaining {
                interaction.send_message(
                    format!(
                        "This action is on cooldown. Try again in {:.1} seconds.",
                        remaining.as_secs_f64()
                    ),
                    true,
                );
                return Ok(());
            }
            original(interaction).await
        }
    })));
    component
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use color_eyre::eyre::eyre;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        core::store::Store,
        domain::Response,
        infrastructure::config::Config,
        presentation::{
            components::{Callback, Item, SelectOption, StatefulSelect},
            views::View,
        },
    };

    fn counting(counter: &Arc<AtomicUsize>) -> Callback {
        let counter = Arc::clone(counter);
        callback(move |_| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
    }

    #[tokio::test]
    async fn test_loading_state_during_and_after_callback() {
        let seen = Arc::new(Mutex::new(None));
        let button = StatefulButton::primary("Save", None);
        let probe = button.downgrade();
        let sink = Arc::clone(&seen);
        button.set_callback(callback(move |_| {
            let observed = probe
                .upgrade()
                .map(|button| (button.label(), button.is_disabled()));
            let sink = Arc::clone(&sink);
            async move {
                *sink.lock() = observed;
                Ok(())
            }
        }));
        let button = with_loading_state(button, &ComponentsConfig::default());

        button.press(Interaction::new(1)).await.unwrap();

        assert_eq!(*seen.lock(), Some(("Loading...".to_string(), true)));
        assert_eq!(button.label(), "Save");
        assert!(!button.is_disabled());
    }

    #[tokio::test]
    async fn test_loading_state_uses_configured_label() {
        let dir =
            std::env::temp_dir().join(format!("cascadeui-wrappers-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.json5"),
            r#"{ components: { loading_label: "Busy..." } }"#,
        )
        .unwrap();
        let config = Config::load_from(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        let seen = Arc::new(Mutex::new(None));
        let button = StatefulButton::primary("Export", None);
        let probe = button.downgrade();
        let sink = Arc::clone(&seen);
        button.set_callback(callback(move |_| {
            let observed = probe.upgrade().map(|button| button.label());
            let sink = Arc::clone(&sink);
            async move {
                *sink.lock() = observed;
                Ok(())
            }
        }));
        let button = with_loading_state(button, &config.components);

        button.press(Interaction::new(1)).await.unwrap();

        assert_eq!(seen.lock().as_deref(), Some("Busy..."));
        assert_eq!(button.label(), "Export");
    }

    #[tokio::test]
    async fn test_loading_label_keeps_toggle_label() {
        let toggle = with_loading_label(
            StatefulButton::toggle("Alerts", None, false, None),
            "Saving...",
        );

        toggle.press(Interaction::new(1)).await.unwrap();

        assert_eq!(toggle.is_toggled(), Some(true));
        assert_eq!(toggle.label(), "Alerts ✓");
        assert!(!toggle.is_disabled());
    }

    #[tokio::test]
    async fn test_loading_state_restores_after_error() {
        let button = with_loading_label(
            StatefulButton::primary(
                "Deploy",
                Some(callback(|_| async { Err(eyre!("deploy failed")) })),
            ),
            "Deploying...",
        );

        assert!(button.press(Interaction::new(1)).await.is_err());
        assert_eq!(button.label(), "Deploy");
        assert!(!button.is_disabled());
    }

    #[test]
    fn test_loading_state_ignores_button_without_handler() {
        let button = with_loading_state(
            StatefulButton::primary("Idle", None),
            &ComponentsConfig::default(),
        );
        assert!(button.handler().is_none());
    }

    #[tokio::test]
    async fn test_cooldown_rejects_repeated_presses() {
        let counter = Arc::new(AtomicUsize::new(0));
        let button = with_cooldown(
            StatefulButton::primary("Refresh", Some(counting(&counter))),
            Duration::from_secs(60),
        );

        button.press(Interaction::new(1)).await.unwrap();
        let second = Interaction::new(1);
        button.press(second.clone()).await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        let reply = second.last_message().unwrap();
        assert!(reply.starts_with("This action is on cooldown. Try again in "));
        assert!(reply.ends_with(" seconds."));
        assert!(matches!(
            second.responses()[0],
            Response::Message {
                ephemeral: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_cooldown_expires() {
        let counter = Arc::new(AtomicUsize::new(0));
        let button = with_cooldown(
            StatefulButton::primary("Refresh", Some(counting(&counter))),
            Duration::from_millis(20),
        );

        button.press(Interaction::new(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        button.press(Interaction::new(1)).await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    async fn confirmed_delete(counter: &Arc<AtomicUsize>) -> (Arc<Store>, StatefulView, StatefulButton) {
        let store = Arc::new(Store::default());
        let mut view = StatefulView::builder("SettingsView")
            .store(Arc::clone(&store))
            .user_id(3)
            .build()
            .await;
        let counter = Arc::clone(counter);
        let delete = with_confirmation(
            StatefulButton::danger(
                "Delete",
                Some(callback(move |interaction| {
                    let counter = Arc::clone(&counter);
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        interaction.send_message("Deleted.", true);
                        Ok(())
                    }
                })),
            ),
            "Delete everything",
            "This cannot be undone.",
        );
        view.add_item(Item::Button(delete.clone())).unwrap();
        (store, view, delete)
    }

    fn prompt_button(prompt: &StatefulView, index: usize) -> StatefulButton {
        prompt.items()[index].as_button().unwrap().clone()
    }

    #[tokio::test]
    async fn test_confirmation_runs_callback_on_yes() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (store, _view, delete) = confirmed_delete(&counter).await;
        let interaction = Interaction::new(3);

        delete.press(interaction.clone()).await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        let prompt_id = interaction.last_prompt().unwrap();
        assert_eq!(
            interaction.responses()[0],
            Response::Prompt {
                title: "Delete everything".into(),
                message: "This cannot be undone.".into(),
                view_id: prompt_id.clone(),
                ephemeral: true,
            }
        );
        let prompt = interaction.take_view(&prompt_id).unwrap();
        assert_eq!(prompt.view_type(), "ConfirmationView");
        assert!(store.state().view(&prompt_id).is_some());

        prompt_button(&prompt, 0).press(Interaction::new(3)).await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(interaction.last_message().as_deref(), Some("Deleted."));
        assert!(prompt.is_stopped());
        assert!(store.state().view(&prompt_id).is_none());
    }

    #[tokio::test]
    async fn test_confirmation_cancel_skips_callback() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (store, _view, delete) = confirmed_delete(&counter).await;
        let interaction = Interaction::new(3);
        delete.press(interaction.clone()).await.unwrap();
        let prompt = interaction
            .take_view(&interaction.last_prompt().unwrap())
            .unwrap();

        let answer = Interaction::new(3);
        prompt_button(&prompt, 1).press(answer.clone()).await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(answer.responses(), vec![Response::Deferred]);
        assert!(store.state().view(prompt.id()).is_none());
        assert!(prompt_button(&prompt, 0).press(Interaction::new(3)).await.is_err());
    }

    #[tokio::test]
    async fn test_cooldown_wraps_selects() {
        let counter = Arc::new(AtomicUsize::new(0));
        let select = with_cooldown(
            StatefulSelect::dropdown([SelectOption::new("a")], None, Some(counting(&counter))),
            Duration::from_secs(60),
        );

        select.choose(Interaction::new(1), vec!["a".into()]).await.unwrap();
        select.choose(Interaction::new(1), vec!["a".into()]).await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
