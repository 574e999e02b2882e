use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{
    domain::ids::{UserId, ViewId},
    presentation::views::{StatefulView, ViewHandle},
};

/// A reply produced while handling an interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// Acknowledged without a visible reply
    Deferred,
    Message { content: String, ephemeral: bool },
    /// A message carrying a follow-up view the user answers through
    Prompt {
        title: String,
        message: String,
        view_id: ViewId,
        ephemeral: bool,
    },
}

/// A single user interaction with a component
///
/// Clones share the same response log, so a callback can reply through its
/// copy and the caller can inspect the replies afterwards. Views sent with a
/// [`Response::Prompt`] are held until the caller takes them.
#[derive(Debug, Clone)]
pub struct Interaction {
    user_id: UserId,
    values: Vec<String>,
    responses: Arc<Mutex<Vec<Response>>>,
    views: Arc<Mutex<Vec<StatefulView>>>,
    source: Option<ViewHandle>,
}

impl Interaction {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            values: Vec::new(),
            responses: Arc::new(Mutex::new(Vec::new())),
            views: Arc::new(Mutex::new(Vec::new())),
            source: None,
        }
    }

    /// Handle sharing the response log but not the pending views
    ///
    /// Components inside a prompt view hold one of these, so the view never
    /// ends up owning itself.
    pub(crate) fn detached(&self) -> Self {
        Self {
            user_id: self.user_id,
            values: self.values.clone(),
            responses: Arc::clone(&self.responses),
            views: Arc::new(Mutex::new(Vec::new())),
            source: self.source.clone(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Values chosen in a select menu; empty for buttons
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub(crate) fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    /// View of the component that received the interaction, when attached
    pub fn view(&self) -> Option<&ViewHandle> {
        self.source.as_ref()
    }

    pub(crate) fn with_view(mut self, view: Option<ViewHandle>) -> Self {
        self.source = view;
        self
    }

    pub fn defer(&self) {
        self.responses.lock().push(Response::Deferred);
    }

    pub fn send_message(&self, content: impl Into<String>, ephemeral: bool) {
        self.responses.lock().push(Response::Message {
            content: content.into(),
            ephemeral,
        });
    }

    /// Reply with `view` attached
    pub fn send_prompt(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        view: StatefulView,
        ephemeral: bool,
    ) {
        self.responses.lock().push(Response::Prompt {
            title: title.into(),
            message: message.into(),
            view_id: view.id().to_owned(),
            ephemeral,
        });
        self.views.lock().push(view);
    }

    /// Take the view sent with the prompt for `view_id`
    pub fn take_view(&self, view_id: &str) -> Option<StatefulView> {
        let mut views = self.views.lock();
        let index = views.iter().position(|view| view.id() == view_id)?;
        Some(views.remove(index))
    }

    /// View id of the most recent prompt, if any
    pub fn last_prompt(&self) -> Option<ViewId> {
        self.responses
            .lock()
            .iter()
            .rev()
            .find_map(|response| match response {
                Response::Prompt { view_id, .. } => Some(view_id.clone()),
                _ => None,
            })
    }

    /// Whether anything has been sent back for this interaction yet
    pub fn is_done(&self) -> bool {
        !self.responses.lock().is_empty()
    }

    pub fn responses(&self) -> Vec<Response> {
        self.responses.lock().clone()
    }

    /// Content of the most recent message reply, if any
    pub fn last_message(&self) -> Option<String> {
        self.responses
            .lock()
            .iter()
            .rev()
            .find_map(|response| match response {
                Response::Message { content, .. } => Some(content.clone()),
                Response::Deferred | Response::Prompt { .. } => None,
            })
    }
}
