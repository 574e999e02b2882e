//! Views: the sinks components are added to
//!
//! [`View`] is the minimal sink the component tree needs. [`StatefulView`]
//! is the concrete view bound to a [`Store`]; [`PaginatedView`] and
//! [`FormView`] build their own controls on top of it.

use std::{
    fmt,
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    core::{msg::Msg, state::AppState, store::Store},
    domain::ids::ViewId,
    error::ViewError,
    presentation::components::Item,
    utils::get_task_manager,
    Result,
};

pub mod form;
pub mod paginated;
pub mod stateful;

pub use form::{form_callback, FormCallback, FormView};
pub use paginated::PaginatedView;
pub use stateful::{StatefulView, StatefulViewBuilder};

/// Surface that accepts leaf items
pub trait View {
    fn id(&self) -> &str;

    fn add_item(&mut self, item: Item) -> Result<(), ViewError>;

    /// How many more items fit, `None` when unbounded
    fn remaining_capacity(&self) -> Option<usize> {
        None
    }
}

impl View for Vec<Item> {
    fn id(&self) -> &str {
        ""
    }

    fn add_item(&mut self, item: Item) -> Result<(), ViewError> {
        self.push(item);
        Ok(())
    }
}

struct Lifecycle {
    stopped: AtomicBool,
    destroyed: AtomicBool,
    last_activity: Mutex<Instant>,
}

/// Shared handle to a live view
///
/// Attached components keep one to report interactions; it carries the view
/// id, the store and the stopped flag but none of the view's items.
#[derive(Clone)]
pub struct ViewHandle {
    id: ViewId,
    store: Arc<Store>,
    lifecycle: Arc<Lifecycle>,
}

impl ViewHandle {
    pub(crate) fn new(id: ViewId, store: Arc<Store>) -> Self {
        Self {
            id,
            store,
            lifecycle: Arc::new(Lifecycle {
                stopped: AtomicBool::new(false),
                destroyed: AtomicBool::new(false),
                last_activity: Mutex::new(Instant::now()),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn is_stopped(&self) -> bool {
        self.lifecycle.stopped.load(Ordering::SeqCst)
    }

    /// Stop accepting items and interactions
    pub fn stop(&self) {
        self.lifecycle.stopped.store(true, Ordering::SeqCst);
    }

    /// Time since the last dispatch through this view
    pub fn idle_for(&self) -> Duration {
        self.lifecycle.last_activity.lock().elapsed()
    }

    /// Dispatch with this view as the source
    pub async fn dispatch(&self, msg: Msg) -> AppState {
        *self.lifecycle.last_activity.lock() = Instant::now();
        self.store.dispatch(msg, Some(&self.id)).await
    }

    /// Run `future` in the background until it finishes or the view exits
    pub fn spawn<F, T>(&self, future: F) -> JoinHandle<Result<T>>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        get_task_manager().spawn(self.id.as_str(), future)
    }

    /// Stop the view, cancel its background tasks, dispatch `VIEW_DESTROYED`
    /// and drop its subscription
    ///
    /// Only the first call dispatches.
    pub async fn exit(&self) {
        self.stop();
        get_task_manager().cancel_tasks(&self.id);
        if self.lifecycle.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }

        debug!("exiting view {}", self.id);
        self.dispatch(Msg::view_destroyed(self.id.as_str())).await;
        self.store.unsubscribe(&self.id);
    }
}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHandle")
            .field("id", &self.id)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
