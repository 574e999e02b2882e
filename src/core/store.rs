use std::{
    collections::{HashMap, VecDeque},
    fmt,
    future::Future,
    sync::Arc,
};

use futures::future::{join_all, BoxFuture, FutureExt};
use lazy_static::lazy_static;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{
    core::{
        action::Action, cmd::Cmd, cmd_executor::CmdExecutor, msg::Msg, state::AppState,
        update::update,
    },
    infrastructure::config::StoreConfig,
    Result,
};

/// Application reducer registered for an action kind
///
/// Runs on a copy of the state without the store locked, so it may read the
/// store through [`Store::state`] or [`Store::history`]. Its result replaces
/// the state only when it returns; a panicking reducer leaves the state as
/// it was. Reducers must not dispatch.
pub type Reducer = Arc<dyn Fn(&Action, AppState) -> AppState + Send + Sync>;

/// Called with the new state after every reduced action
pub type Subscriber = Arc<dyn Fn(AppState, Action) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Wrap a closure as a [`Reducer`]
pub fn reducer<F>(f: F) -> Reducer
where
    F: Fn(&Action, AppState) -> AppState + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap an async closure as a [`Subscriber`]
pub fn subscriber<F, Fut>(f: F) -> Subscriber
where
    F: Fn(AppState, Action) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |state, action| f(state, action).boxed())
}

lazy_static! {
    static ref STORE: Arc<Store> = Arc::new(Store::default());
}

/// The process-wide store, created on first use
pub fn get_store() -> Arc<Store> {
    Arc::clone(&STORE)
}

struct Inner {
    state: AppState,
    custom_reducers: HashMap<String, Reducer>,
    subscribers: Vec<(String, Subscriber)>,
    history: VecDeque<Action>,
}

/// Central state container
///
/// Every change goes through [`Store::dispatch`]: the action is recorded,
/// reduced (custom reducers take precedence over the core ones), and then
/// broadcast to subscribers.
pub struct Store {
    inner: Mutex<Inner>,
    /// Held while an action is reduced and committed, keeping dispatches in
    /// order without locking `inner`
    reducing: Mutex<()>,
    history_limit: usize,
    executor: CmdExecutor,
}

impl Store {
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_state(AppState::default(), config)
    }

    pub fn with_state(state: AppState, config: &StoreConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state,
                custom_reducers: HashMap::new(),
                subscribers: Vec::new(),
                history: VecDeque::new(),
            }),
            reducing: Mutex::new(()),
            history_limit: config.history_limit,
            executor: CmdExecutor::new(),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AppState {
        self.inner.lock().state.clone()
    }

    /// Recently dispatched actions, oldest first
    pub fn history(&self) -> Vec<Action> {
        self.inner.lock().history.iter().cloned().collect()
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Process an action by updating state and notifying subscribers
    ///
    /// `source` is the id of the dispatching view; its own subscriber is
    /// skipped. Returns the state after the action. Kinds without any
    /// reducer are recorded in the history but change nothing and notify
    /// nobody.
    pub async fn dispatch(&self, msg: Msg, source: Option<&str>) -> AppState {
        let action = Action::new(msg, source.map(str::to_owned));
        let kind = action.kind();

        let (state, cmds, subscribers) = {
            let _reducing = self.reducing.lock();

            let (custom, current) = {
                let mut inner = self.inner.lock();
                inner.history.push_back(action.clone());
                while inner.history.len() > self.history_limit {
                    inner.history.pop_front();
                }
                let custom = inner.custom_reducers.get(&kind).map(Arc::clone);
                (custom, inner.state.clone())
            };

            let has_core = action
                .msg
                .action_kind()
                .is_some_and(|kind| kind.has_core_reducer());
            let (next, cmds) = match custom {
                Some(reducer) => (reducer(&action, current), vec![]),
                None if has_core => update(&action, current),
                None => {
                    debug!("no reducer for {kind}");
                    return current;
                }
            };

            let mut inner = self.inner.lock();
            inner.state = next;
            let subscribers: Vec<(String, Subscriber)> = inner
                .subscribers
                .iter()
                .filter(|(id, _)| Some(id.as_str()) != action.source.as_deref())
                .map(|(id, subscriber)| (id.clone(), Arc::clone(subscriber)))
                .collect();

            (inner.state.clone(), cmds, subscribers)
        };

        debug!(
            "dispatched {kind} from {:?}, notifying {} subscriber(s)",
            action.source,
            subscribers.len()
        );
        self.executor.execute_command(&Cmd::batch(cmds));
        self.notify(subscribers, &state, &action).await;

        state
    }

    async fn notify(&self, subscribers: Vec<(String, Subscriber)>, state: &AppState, action: &Action) {
        let notifications = subscribers.into_iter().map(|(id, subscriber)| {
            let future = subscriber(state.clone(), action.clone());
            async move { (id, future.await) }
        });

        for (id, result) in join_all(notifications).await {
            if let Err(e) = result {
                warn!("Error notifying subscriber {id}: {e}");
            }
        }
    }

    /// Register a reducer for `kind`, replacing any earlier one and taking
    /// precedence over the core reducer of the same kind
    pub fn register_reducer(&self, kind: impl Into<String>, reducer: Reducer) {
        self.inner.lock().custom_reducers.insert(kind.into(), reducer);
    }

    /// Remove a custom reducer; a shadowed core reducer applies again
    pub fn unregister_reducer(&self, kind: &str) {
        self.inner.lock().custom_reducers.remove(kind);
    }

    /// Receive state updates under `id`; an existing subscription with the
    /// same id is replaced in place
    pub fn subscribe(&self, id: impl Into<String>, subscriber: Subscriber) {
        let id = id.into();
        let mut inner = self.inner.lock();
        match inner.subscribers.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = subscriber,
            None => inner.subscribers.push((id, subscriber)),
        }
    }

    pub fn unsubscribe(&self, id: &str) {
        self.inner.lock().subscribers.retain(|(existing, _)| existing != id);
    }

    pub fn is_subscribed(&self, id: &str) -> bool {
        self.inner
            .lock()
            .subscribers
            .iter()
            .any(|(existing, _)| existing == id)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Store")
            .field("views", &inner.state.views.len())
            .field("sessions", &inner.state.sessions.len())
            .field("subscribers", &inner.subscribers.len())
            .field("custom_reducers", &inner.custom_reducers.len())
            .field("history", &inner.history.len())
            .field("history_limit", &self.history_limit)
            .finish()
    }
}
