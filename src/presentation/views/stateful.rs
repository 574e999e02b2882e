use std::{fmt, future::Future, sync::Arc, time::Duration};

use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    core::{
        msg::{view::ViewUpdate, Msg},
        state::{AppState, ViewState},
        store::{get_store, Store, Subscriber},
    },
    domain::{
        ids::{new_view_id, user_session_id, SessionId, UserId},
        Interaction,
    },
    error::ViewError,
    infrastructure::config::ViewConfig,
    presentation::{
        components::{callback, Item, StatefulButton},
        views::{View, ViewHandle},
    },
};

/// Configures and registers a [`StatefulView`]
pub struct StatefulViewBuilder {
    view_type: String,
    store: Option<Arc<Store>>,
    user_id: Option<UserId>,
    session_id: Option<SessionId>,
    props: Map<String, Value>,
    on_state_changed: Option<Subscriber>,
    max_items: usize,
    timeout: Option<Duration>,
}

impl StatefulViewBuilder {
    fn new(view_type: impl Into<String>) -> Self {
        let config = ViewConfig::default();
        Self {
            view_type: view_type.into(),
            store: None,
            user_id: None,
            session_id: None,
            props: Map::new(),
            on_state_changed: None,
            max_items: config.max_items,
            timeout: config.timeout(),
        }
    }

    /// Store to dispatch into; the process-wide store when not set
    pub fn store(mut self, store: Arc<Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Explicit session; defaults to `user_<user_id>` when a user is set
    pub fn session_id(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn props(mut self, props: Map<String, Value>) -> Self {
        self.props = props;
        self
    }

    pub fn prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    /// Called after every action this view did not dispatch itself
    pub fn on_state_changed(mut self, subscriber: Subscriber) -> Self {
        self.on_state_changed = Some(subscriber);
        self
    }

    pub fn config(mut self, config: &ViewConfig) -> Self {
        self.max_items = config.max_items;
        self.timeout = config.timeout();
        self
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register the view: subscribe, then dispatch `SESSION_CREATED` (when
    /// the view has a session) and `VIEW_CREATED`
    pub async fn build(self) -> StatefulView {
        let store = self.store.unwrap_or_else(get_store);
        let session_id = self
            .session_id
            .or_else(|| self.user_id.map(user_session_id));
        let handle = ViewHandle::new(new_view_id(), Arc::clone(&store));

        if let Some(subscriber) = self.on_state_changed {
            store.subscribe(handle.id(), subscriber);
        }
        if let Some(session_id) = &session_id {
            store
                .dispatch(
                    Msg::session_created(session_id.as_str(), self.user_id, Map::new()),
                    None,
                )
                .await;
        }
        store
            .dispatch(
                Msg::view_created(
                    handle.id(),
                    self.view_type.as_str(),
                    self.user_id,
                    session_id.clone(),
                    self.props,
                ),
                None,
            )
            .await;
        debug!("created {} {}", self.view_type, handle.id());

        StatefulView {
            handle,
            view_type: self.view_type,
            user_id: self.user_id,
            session_id,
            max_items: self.max_items,
            timeout: self.timeout,
            items: Vec::new(),
        }
    }
}

/// A view registered in a store
///
/// Items added to it are bound to the view, so their interactions are
/// dispatched with the view as source. Dropping the view removes its
/// subscription.
pub struct StatefulView {
    handle: ViewHandle,
    view_type: String,
    user_id: Option<UserId>,
    session_id: Option<SessionId>,
    max_items: usize,
    timeout: Option<Duration>,
    items: Vec<Item>,
}

impl StatefulView {
    pub fn builder(view_type: impl Into<String>) -> StatefulViewBuilder {
        StatefulViewBuilder::new(view_type)
    }

    pub fn id(&self) -> &str {
        self.handle.id()
    }

    pub fn view_type(&self) -> &str {
        &self.view_type
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn handle(&self) -> &ViewHandle {
        &self.handle
    }

    pub fn store(&self) -> &Arc<Store> {
        self.handle.store()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_stopped()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, custom_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.custom_id() == custom_id)
    }

    /// This view as currently recorded in the store
    pub fn state(&self) -> Option<ViewState> {
        self.store().state().view(self.id()).cloned()
    }

    pub async fn dispatch(&self, msg: Msg) -> AppState {
        self.handle.dispatch(msg).await
    }

    /// Record the message the view was sent as
    pub async fn attach_message(
        &self,
        message_id: impl Into<String>,
        channel_id: Option<String>,
    ) -> AppState {
        self.dispatch(Msg::view_updated(
            self.id(),
            ViewUpdate::message(message_id, channel_id),
        ))
        .await
    }

    /// Merge `props` into the view's recorded props
    pub async fn update(&self, props: Map<String, Value>) -> AppState {
        let update = ViewUpdate {
            props,
            ..ViewUpdate::default()
        };
        self.dispatch(Msg::view_updated(self.id(), update)).await
    }

    /// Replace this view with a new one of `view_type`
    ///
    /// Dispatches `NAVIGATION`, builds the next view on the same store, user
    /// and session with `params` as its props, and stops this view.
    pub async fn transition_to(
        &self,
        view_type: impl Into<String>,
        params: Map<String, Value>,
    ) -> Result<StatefulView, ViewError> {
        if self.is_stopped() {
            return Err(ViewError::ViewStopped(self.id().to_owned()));
        }

        let view_type = view_type.into();
        self.dispatch(Msg::navigation(view_type.as_str(), params.clone()))
            .await;

        let next = StatefulViewBuilder {
            view_type,
            store: Some(Arc::clone(self.store())),
            user_id: self.user_id,
            session_id: self.session_id.clone(),
            props: params,
            on_state_changed: None,
            max_items: self.max_items,
            timeout: self.timeout,
        }
        .build()
        .await;

        self.handle.stop();
        Ok(next)
    }

    pub async fn exit(&self) {
        self.handle.exit().await;
    }

    /// Background task cancelled when the view exits
    pub fn spawn<F, T>(&self, future: F) -> JoinHandle<crate::Result<T>>
    where
        F: Future<Output = crate::Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        self.handle.spawn(future)
    }

    /// Add a button that exits the view and replies "View closed."
    pub fn add_exit_button(&mut self, label: &str) -> Result<StatefulButton, ViewError> {
        let handle = self.handle.clone();
        let button = StatefulButton::danger(
            label,
            Some(callback(move |interaction: Interaction| {
                let handle = handle.clone();
                async move {
                    interaction.defer();
                    handle.exit().await;
                    interaction.send_message("View closed.", true);
                    Ok(())
                }
            })),
        )
        .with_emoji("❌");

        self.add_item(Item::Button(button.clone()))?;
        Ok(button)
    }

    /// Exit the view when it has been idle longer than its timeout
    ///
    /// Returns whether the view timed out. Its items are cleared.
    pub async fn check_timeout(&mut self) -> bool {
        let Some(timeout) = self.timeout else {
            return false;
        };
        if self.is_stopped() || self.handle.idle_for() < timeout {
            return false;
        }

        debug!("view {} timed out", self.id());
        self.handle.exit().await;
        self.items.clear();
        true
    }
}

impl View for StatefulView {
    fn id(&self) -> &str {
        self.handle.id()
    }

    /// Rejects items once the view is stopped, when it is full and on a
    /// duplicate custom id
    fn add_item(&mut self, item: Item) -> Result<(), ViewError> {
        if self.is_stopped() {
            return Err(ViewError::ViewStopped(self.id().to_owned()));
        }
        if self.items.len() >= self.max_items {
            return Err(ViewError::ViewFull {
                view_id: self.id().to_owned(),
                requested: 1,
                remaining: 0,
            });
        }
        let custom_id = item.custom_id();
        if self.item(&custom_id).is_some() {
            return Err(ViewError::DuplicateCustomId {
                view_id: self.id().to_owned(),
                custom_id,
            });
        }

        item.bind(self.handle.clone());
        self.items.push(item);
        Ok(())
    }

    fn remaining_capacity(&self) -> Option<usize> {
        Some(self.max_items.saturating_sub(self.items.len()))
    }
}

impl Drop for StatefulView {
    fn drop(&mut self) {
        self.handle.store().unsubscribe(self.handle.id());
    }
}

impl fmt::Debug for StatefulView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatefulView")
            .field("id", &self.id())
            .field("view_type", &self.view_type)
            .field("user_id", &self.user_id)
            .field("session_id", &self.session_id)
            .field("items", &self.items.len())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        core::store::subscriber,
        domain::Response,
        presentation::components::{Component, CompositeComponent},
    };

    async fn view_on(store: &Arc<Store>) -> StatefulView {
        StatefulView::builder("MenuView")
            .store(Arc::clone(store))
            .user_id(7)
            .build()
            .await
    }

    #[tokio::test]
    async fn test_build_registers_session_and_view() {
        let store = Arc::new(Store::default());
        let view = view_on(&store).await;

        let state = store.state();
        assert_eq!(view.session_id(), Some("user_7"));
        assert_eq!(state.session("user_7").unwrap().views, vec![view.id().to_string()]);
        assert_eq!(state.view(view.id()).unwrap().view_type, "MenuView");
        let kinds: Vec<_> = store.history().iter().map(|action| action.kind()).collect();
        assert_eq!(kinds, vec!["SESSION_CREATED", "VIEW_CREATED"]);
    }

    #[tokio::test]
    async fn test_view_without_user_has_no_session() {
        let store = Arc::new(Store::default());
        let view = StatefulView::builder("AnonView")
            .store(Arc::clone(&store))
            .build()
            .await;

        assert_eq!(view.session_id(), None);
        assert!(store.state().sessions.is_empty());
    }

    #[tokio::test]
    async fn test_pressing_attached_button_records_interaction() {
        let store = Arc::new(Store::default());
        let mut view = view_on(&store).await;
        let save = StatefulButton::primary("Save", Some(callback(|_| async { Ok(()) })));
        save.add_to_view(&mut view).unwrap();

        save.press(Interaction::new(7)).await.unwrap();

        let state = store.state();
        let component = state.component(&save.custom_id()).unwrap();
        assert_eq!(component.interactions.len(), 1);
        assert_eq!(component.interactions[0].view_id, view.id());
        assert_eq!(component.interactions[0].value, json!(true));
        assert_eq!(save.view_id().as_deref(), Some(view.id()));
    }

    #[tokio::test]
    async fn test_add_item_rejects_duplicates_and_overflow() {
        let store = Arc::new(Store::default());
        let mut view = StatefulView::builder("SmallView")
            .store(Arc::clone(&store))
            .max_items(2)
            .build()
            .await;
        let a = StatefulButton::primary("a", None).with_custom_id("a");

        view.add_item(Item::Button(a.clone())).unwrap();
        assert_eq!(
            view.add_item(Item::Button(a)),
            Err(ViewError::DuplicateCustomId {
                view_id: view.id().to_owned(),
                custom_id: "a".into()
            })
        );

        let bar = CompositeComponent::new()
            .with_component(StatefulButton::primary("b", None))
            .with_component(StatefulButton::primary("c", None));
        assert!(matches!(
            bar.add_to_view(&mut view),
            Err(ViewError::ViewFull {
                requested: 2,
                remaining: 1,
                ..
            })
        ));
        assert_eq!(view.items().len(), 1);
    }

    #[tokio::test]
    async fn test_attach_message_and_update() {
        let store = Arc::new(Store::default());
        let view = view_on(&store).await;

        view.attach_message("m1", Some("c1".into())).await;
        let mut props = Map::new();
        props.insert("theme".into(), json!("dark"));
        view.update(props).await;

        let recorded = view.state().unwrap();
        assert_eq!(recorded.message_id.as_deref(), Some("m1"));
        assert_eq!(recorded.channel_id.as_deref(), Some("c1"));
        assert_eq!(recorded.props.get("theme"), Some(&json!("dark")));
    }

    #[tokio::test]
    async fn test_transition_to_records_navigation_and_stops() {
        let store = Arc::new(Store::default());
        let view = view_on(&store).await;
        let mut params = Map::new();
        params.insert("item".into(), json!(3));

        let next = view.transition_to("DetailView", params).await.unwrap();

        assert!(view.is_stopped());
        assert!(!next.is_stopped());
        assert_eq!(next.session_id(), Some("user_7"));
        let state = store.state();
        let session = state.session("user_7").unwrap();
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history[0].from_view, view.id());
        assert_eq!(session.history[0].to_view_type, "DetailView");
        assert_eq!(session.views.len(), 2);
        assert_eq!(state.view(next.id()).unwrap().props.get("item"), Some(&json!(3)));

        assert!(matches!(
            view.transition_to("Again", Map::new()).await,
            Err(ViewError::ViewStopped(_))
        ));
    }

    #[tokio::test]
    async fn test_exit_button_closes_view() {
        let store = Arc::new(Store::default());
        let mut view = view_on(&store).await;
        let exit = view.add_exit_button("Close").unwrap();
        let interaction = Interaction::new(7);

        exit.press(interaction.clone()).await.unwrap();

        assert!(view.is_stopped());
        assert!(store.state().view(view.id()).is_none());
        assert_eq!(exit.emoji().as_deref(), Some("❌"));
        assert_eq!(interaction.responses()[0], Response::Deferred);
        assert_eq!(interaction.last_message().as_deref(), Some("View closed."));

        let other = StatefulButton::primary("late", None);
        assert!(matches!(
            view.add_item(Item::Button(other)),
            Err(ViewError::ViewStopped(_))
        ));
        assert!(exit.press(Interaction::new(7)).await.is_err());
    }

    #[tokio::test]
    async fn test_subscriber_skips_own_dispatches_and_is_dropped_with_view() {
        let store = Arc::new(Store::default());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let view = StatefulView::builder("WatchingView")
            .store(Arc::clone(&store))
            .on_state_changed(subscriber(move |_, _| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }))
            .build()
            .await;
        let before = hits.load(Ordering::SeqCst);

        view.update(Map::new()).await;
        assert_eq!(hits.load(Ordering::SeqCst), before);

        store
            .dispatch(Msg::session_created("someone", None, Map::new()), None)
            .await;
        assert_eq!(hits.load(Ordering::SeqCst), before + 1);

        let id = view.id().to_owned();
        drop(view);
        assert!(!store.is_subscribed(&id));
    }

    #[tokio::test]
    async fn test_check_timeout() {
        let store = Arc::new(Store::default());
        let mut idle = StatefulView::builder("IdleView")
            .store(Arc::clone(&store))
            .timeout(Some(Duration::ZERO))
            .build()
            .await;
        idle.add_item(Item::Button(StatefulButton::primary("a", None)))
            .unwrap();
        let mut patient = StatefulView::builder("PatientView")
            .store(Arc::clone(&store))
            .timeout(None)
            .build()
            .await;

        assert!(idle.check_timeout().await);
        assert!(idle.is_stopped());
        assert!(idle.items().is_empty());
        assert!(!idle.check_timeout().await);
        assert!(!patient.check_timeout().await);
    }
}
