//! Background tasks tracked per owner
//!
//! Views own the tasks they start; exiting a view cancels whatever it still
//! has running.

use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use lazy_static::lazy_static;
use parking_lot::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error};

use crate::Result;

type Owned = HashMap<u64, AbortHandle>;
type Tasks = Mutex<HashMap<String, Owned>>;

lazy_static! {
    static ref TASKS: TaskManager = TaskManager::new();
}

/// The process-wide task manager
pub fn get_task_manager() -> &'static TaskManager {
    &TASKS
}

/// Removes a task's entry once its future completes or is dropped
struct Tracked {
    tasks: Arc<Tasks>,
    owner: String,
    id: u64,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        let mut tasks = self.tasks.lock();
        if let Some(owned) = tasks.get_mut(&self.owner) {
            owned.remove(&self.id);
            if owned.is_empty() {
                tasks.remove(&self.owner);
            }
        }
    }
}

fn live(owned: &Owned) -> usize {
    owned.values().filter(|handle| !handle.is_finished()).count()
}

#[derive(Default)]
pub struct TaskManager {
    tasks: Arc<Tasks>,
    next_id: AtomicU64,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `future` on the current Tokio runtime under `owner`
    ///
    /// A failing task is logged with its owner; the error is still returned
    /// through the join handle.
    pub fn spawn<F, T>(&self, owner: impl Into<String>, future: F) -> JoinHandle<Result<T>>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let owner = owner.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let tracked = Tracked {
            tasks: Arc::clone(&self.tasks),
            owner: owner.clone(),
            id,
        };

        let handle = tokio::spawn(async move {
            future
                .await
                .inspect_err(|e| error!("Task error for owner {}: {e}", tracked.owner))
        });

        let mut tasks = self.tasks.lock();
        let owned = tasks.entry(owner).or_default();
        owned.retain(|_, handle| !handle.is_finished());
        if !handle.is_finished() {
            owned.insert(id, handle.abort_handle());
        }
        handle
    }

    /// Abort every unfinished task of `owner`, returning how many there were
    pub fn cancel_tasks(&self, owner: &str) -> usize {
        let owned = self.tasks.lock().remove(owner).unwrap_or_default();
        let mut cancelled = 0;
        for handle in owned.into_values().filter(|handle| !handle.is_finished()) {
            handle.abort();
            cancelled += 1;
        }
        if cancelled > 0 {
            debug!("cancelled {cancelled} task(s) of {owner}");
        }
        cancelled
    }

    /// Running tasks of `owner`, or of everyone when `None`
    pub fn task_count(&self, owner: Option<&str>) -> usize {
        let tasks = self.tasks.lock();
        match owner {
            Some(owner) => tasks.get(owner).map_or(0, live),
            None => tasks.values().map(live).sum(),
        }
    }
}
