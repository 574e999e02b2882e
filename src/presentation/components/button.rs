use std::{
    fmt,
    sync::{Arc, Weak},
};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use crate::{
    domain::{
        ids::{new_component_id, ComponentId, ViewId},
        Interaction,
    },
    error::{ComponentError, ViewError},
    presentation::{
        components::{callback, report_interaction, Callback, Component, Interactive, Item},
        views::ViewHandle,
    },
    Result,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    #[default]
    Primary,
    Secondary,
    Success,
    Danger,
    Link,
}

struct Toggle {
    label: String,
    toggled_label: String,
    toggled: bool,
}

struct ButtonInner {
    label: String,
    style: ButtonStyle,
    disabled: bool,
    custom_id: ComponentId,
    emoji: Option<String>,
    url: Option<String>,
    row: Option<u8>,
    toggle: Option<Toggle>,
    handler: Option<Callback>,
    view: Option<ViewHandle>,
}

/// A button that records presses in the store of the view it is attached to
///
/// With a callback, a press dispatches `COMPONENT_INTERACTION` (value `true`)
/// and then runs the callback. Without one, pressing does nothing.
#[derive(Clone)]
pub struct StatefulButton {
    inner: Arc<RwLock<ButtonInner>>,
}

/// Non-owning handle to a button
#[derive(Clone)]
pub struct WeakButton(Weak<RwLock<ButtonInner>>);

impl WeakButton {
    pub fn upgrade(&self) -> Option<StatefulButton> {
        self.0.upgrade().map(|inner| StatefulButton { inner })
    }
}

impl StatefulButton {
    pub fn new(label: impl Into<String>, callback: Option<Callback>) -> Self {
        Self::with_style(label, ButtonStyle::default(), callback)
    }

    pub fn with_style(
        label: impl Into<String>,
        style: ButtonStyle,
        callback: Option<Callback>,
    ) -> Self {
        let button = Self {
            inner: Arc::new(RwLock::new(ButtonInner {
                label: label.into(),
                style,
                disabled: false,
                custom_id: new_component_id("button"),
                emoji: None,
                url: None,
                row: None,
                toggle: None,
                handler: None,
                view: None,
            })),
        };
        if let Some(callback) = callback {
            button.set_callback(callback);
        }
        button
    }

    pub fn primary(label: impl Into<String>, callback: Option<Callback>) -> Self {
        Self::with_style(label, ButtonStyle::Primary, callback)
    }

    pub fn secondary(label: impl Into<String>, callback: Option<Callback>) -> Self {
        Self::with_style(label, ButtonStyle::Secondary, callback)
    }

    pub fn success(label: impl Into<String>, callback: Option<Callback>) -> Self {
        Self::with_style(label, ButtonStyle::Success, callback)
    }

    pub fn danger(label: impl Into<String>, callback: Option<Callback>) -> Self {
        Self::with_style(label, ButtonStyle::Danger, callback)
    }

    /// A button that opens `url`; it has no callback and cannot be pressed
    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        let button = Self::with_style(label, ButtonStyle::Link, None);
        button.inner.write().url = Some(url.into());
        button
    }

    /// A button flipping between two labelled states
    ///
    /// Each press flips the state, relabels and restyles the button
    /// (success when on, secondary when off), records the new state and then
    /// runs `callback`, or defers the interaction when there is none.
    pub fn toggle(
        label: impl Into<String>,
        toggled_label: Option<String>,
        toggled: bool,
        callback: Option<Callback>,
    ) -> Self {
        let label = label.into();
        let toggled_label = toggled_label.unwrap_or_else(|| format!("{label} ✓"));
        let (current, style) = if toggled {
            (toggled_label.clone(), ButtonStyle::Success)
        } else {
            (label.clone(), ButtonStyle::Secondary)
        };

        let button = Self::with_style(current, style, None);
        button.inner.write().toggle = Some(Toggle {
            label,
            toggled_label,
            toggled,
        });

        button.set_handler(Some(button.toggle_handler(callback)));
        button
    }

    pub fn with_custom_id(self, custom_id: impl Into<ComponentId>) -> Self {
        self.inner.write().custom_id = custom_id.into();
        self
    }

    pub fn with_emoji(self, emoji: impl Into<String>) -> Self {
        self.inner.write().emoji = Some(emoji.into());
        self
    }

    /// Row hint, 0 to 4
    pub fn with_row(self, row: u8) -> Self {
        self.inner.write().row = Some(row);
        self
    }

    pub fn with_disabled(self, disabled: bool) -> Self {
        self.set_disabled(disabled);
        self
    }

    pub fn label(&self) -> String {
        self.inner.read().label.clone()
    }

    pub fn set_label(&self, label: impl Into<String>) {
        self.inner.write().label = label.into();
    }

    pub fn style(&self) -> ButtonStyle {
        self.inner.read().style
    }

    pub fn set_style(&self, style: ButtonStyle) {
        self.inner.write().style = style;
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.read().disabled
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.write().disabled = disabled;
    }

    pub fn custom_id(&self) -> ComponentId {
        self.inner.read().custom_id.clone()
    }

    pub fn emoji(&self) -> Option<String> {
        self.inner.read().emoji.clone()
    }

    pub fn url(&self) -> Option<String> {
        self.inner.read().url.clone()
    }

    pub fn row(&self) -> Option<u8> {
        self.inner.read().row
    }

    /// Current state of a toggle button, `None` for other buttons
    pub fn is_toggled(&self) -> Option<bool> {
        self.inner.read().toggle.as_ref().map(|toggle| toggle.toggled)
    }

    /// Id of the view this button is attached to
    pub fn view_id(&self) -> Option<ViewId> {
        self.inner
            .read()
            .view
            .as_ref()
            .map(|view| view.id().to_owned())
    }

    pub fn downgrade(&self) -> WeakButton {
        WeakButton(Arc::downgrade(&self.inner))
    }

    /// Whether both handles point at the same button
    pub fn ptr_eq(&self, other: &StatefulButton) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Replace the callback; presses dispatch the interaction before running it
    ///
    /// On a toggle button the new callback runs after the flip, in place of
    /// the one given to [`StatefulButton::toggle`].
    pub fn set_callback(&self, user_callback: Callback) {
        if self.is_toggled().is_some() {
            self.set_handler(Some(self.toggle_handler(Some(user_callback))));
            return;
        }

        let weak = self.downgrade();
        self.set_handler(Some(callback(move |interaction| {
            let weak = weak.clone();
            let user_callback = Arc::clone(&user_callback);
            async move {
                if let Some(button) = weak.upgrade() {
                    button.report(&interaction, Value::Bool(true)).await;
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

    /// Trigger the button as `interaction`'s user
    ///
    /// Fails for link buttons, disabled buttons and buttons whose view has
    /// been stopped.
    pub async fn press(&self, interaction: Interaction) -> Result<()> {
        let (handler, view) = {
            let inner = self.inner.read();
            if inner.url.is_some() {
                return Err(ComponentError::LinkButton(inner.custom_id.clone()).into());
            }
            if inner.disabled {
                return Err(ComponentError::Disabled(inner.custom_id.clone()).into());
            }
            (inner.handler.clone(), inner.view.clone())
        };
        if let Some(view) = view.as_ref().filter(|view| view.is_stopped()) {
            return Err(ViewError::ViewStopped(view.id().to_owned()).into());
        }

        match handler {
            Some(handler) => handler(interaction.with_view(view)).await,
            None => Ok(()),
        }
    }

    pub(crate) fn bind(&self, view: ViewHandle) {
        self.inner.write().view = Some(view);
    }

    async fn report(&self, interaction: &Interaction, value: Value) {
        let (view, custom_id) = {
            let inner = self.inner.read();
            (inner.view.clone(), inner.custom_id.clone())
        };
        report_interaction(view.as_ref(), &custom_id, interaction.user_id(), value).await;
    }

    /// Flip, record the new state, then run `user_callback` or defer
    fn toggle_handler(&self, user_callback: Option<Callback>) -> Callback {
        let weak = self.downgrade();
        callback(move |interaction| {
            let weak = weak.clone();
            let user_callback = user_callback.clone();
            async move {
                let Some(button) = weak.upgrade() else {
                    return Ok(());
                };
                let toggled = button.flip();
                button.report(&interaction, Value::Bool(toggled)).await;

                match user_callback {
                    Some(user_callback) => user_callback(interaction).await,
                    None => {
                        interaction.defer();
                        Ok(())
                    }
                }
            }
        })
    }

    fn flip(&self) -> bool {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let Some(toggle) = inner.toggle.as_mut() else {
            return false;
        };

        toggle.toggled = !toggle.toggled;
        if toggle.toggled {
            inner.label = toggle.toggled_label.clone();
            inner.style = ButtonStyle::Success;
        } else {
            inner.label = toggle.label.clone();
            inner.style = ButtonStyle::Secondary;
        }
        toggle.toggled
    }
}

impl fmt::Debug for StatefulButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("StatefulButton")
            .field("custom_id", &inner.custom_id)
            .field("label", &inner.label)
            .field("style", &inner.style)
            .field("disabled", &inner.disabled)
            .field("has_handler", &inner.handler.is_some())
            .finish()
    }
}

impl Component for StatefulButton {
    fn items(&self) -> Vec<Item> {
        vec![Item::Button(self.clone())]
    }
}

impl Interactive for StatefulButton {
    fn custom_id(&self) -> ComponentId {
        StatefulButton::custom_id(self)
    }

    fn handler(&self) -> Option<Callback> {
        StatefulButton::handler(self)
    }

    fn set_handler(&self, handler: Option<Callback>) {
        StatefulButton::set_handler(self, handler);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::domain::Response;

    fn counter_callback(counter: &Arc<AtomicUsize>) -> Callback {
        let counter = Arc::clone(counter);
        callback(move |_| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
    }

    #[rstest]
    #[case(StatefulButton::primary("a", None), ButtonStyle::Primary)]
    #[case(StatefulButton::secondary("a", None), ButtonStyle::Secondary)]
    #[case(StatefulButton::success("a", None), ButtonStyle::Success)]
    #[case(StatefulButton::danger("a", None), ButtonStyle::Danger)]
    #[case(StatefulButton::link("a", "https://example.com"), ButtonStyle::Link)]
    fn test_style_constructors(#[case] button: StatefulButton, #[case] expected: ButtonStyle) {
        assert_eq!(button.style(), expected);
        assert!(button.custom_id().starts_with("button_"));
    }

    #[tokio::test]
    async fn test_press_without_callback_is_noop() {
        let button = StatefulButton::new("Idle", None);
        let interaction = Interaction::new(1);

        button.press(interaction.clone()).await.unwrap();

        assert!(button.handler().is_none());
        assert!(!interaction.is_done());
    }

    #[tokio::test]
    async fn test_detached_press_still_runs_callback() {
        let counter = Arc::new(AtomicUsize::new(0));
        let button = StatefulButton::primary("Save", Some(counter_callback(&counter)));

        button.press(Interaction::new(1)).await.unwrap();
        button.press(Interaction::new(1)).await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(button.view_id(), None);
    }

    #[tokio::test]
    async fn test_disabled_and_link_buttons_reject_presses() {
        let disabled = StatefulButton::primary("Off", None).with_disabled(true);
        let err = disabled.press(Interaction::new(1)).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ComponentError>(),
            Some(&ComponentError::Disabled(disabled.custom_id()))
        );

        let link = StatefulButton::link("Docs", "https://example.com");
        let err = link.press(Interaction::new(1)).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ComponentError>(),
            Some(&ComponentError::LinkButton(link.custom_id()))
        );
        assert_eq!(link.url().as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn test_toggle_flips_label_and_style() {
        let toggle = StatefulButton::toggle("Notifications", None, false, None);
        assert_eq!(toggle.label(), "Notifications");
        assert_eq!(toggle.style(), ButtonStyle::Secondary);
        assert_eq!(toggle.is_toggled(), Some(false));

        let interaction = Interaction::new(1);
        toggle.press(interaction.clone()).await.unwrap();

        assert_eq!(toggle.label(), "Notifications ✓");
        assert_eq!(toggle.style(), ButtonStyle::Success);
        assert_eq!(toggle.is_toggled(), Some(true));
        assert_eq!(interaction.responses(), vec![Response::Deferred]);

        toggle.press(Interaction::new(1)).await.unwrap();
        assert_eq!(toggle.label(), "Notifications");
        assert_eq!(toggle.is_toggled(), Some(false));
    }

    #[tokio::test]
    async fn test_toggle_starting_on_uses_custom_label() {
        let counter = Arc::new(AtomicUsize::new(0));
        let toggle = StatefulButton::toggle(
            "Dark mode",
            Some("Dark mode: on".into()),
            true,
            Some(counter_callback(&counter)),
        );
        assert_eq!(toggle.label(), "Dark mode: on");
        assert_eq!(toggle.style(), ButtonStyle::Success);

        let interaction = Interaction::new(1);
        toggle.press(interaction.clone()).await.unwrap();

        assert_eq!(toggle.label(), "Dark mode");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!interaction.is_done());
    }

    #[tokio::test]
    async fn test_set_callback_on_toggle_keeps_flipping() {
        let counter = Arc::new(AtomicUsize::new(0));
        let toggle = StatefulButton::toggle("Alerts", None, false, None);
        toggle.set_callback(counter_callback(&counter));

        toggle.press(Interaction::new(1)).await.unwrap();
        assert_eq!(toggle.is_toggled(), Some(true));
        assert_eq!(toggle.label(), "Alerts ✓");

        toggle.press(Interaction::new(1)).await.unwrap();
        assert_eq!(toggle.is_toggled(), Some(false));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let button = StatefulButton::primary("Save", None).with_row(2).with_emoji("💾");
        let copy = button.clone();
        copy.set_label("Saved");

        assert_eq!(button.label(), "Saved");
        assert_eq!(button.row(), Some(2));
        assert_eq!(button.emoji().as_deref(), Some("💾"));
        assert!(button.ptr_eq(&copy));
        assert!(button.downgrade().upgrade().is_some());
    }
}
