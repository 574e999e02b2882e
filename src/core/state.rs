use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod component;
pub mod session;
pub mod view;

pub use component::{ComponentState, InteractionRecord};
pub use session::{NavigationEntry, SessionState};
pub use view::ViewState;

use crate::domain::ids::{ComponentId, SessionId, ViewId};

/// Unified application state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub sessions: BTreeMap<SessionId, SessionState>,
    pub views: BTreeMap<ViewId, ViewState>,
    pub components: BTreeMap<ComponentId, ComponentState>,
    /// Free-form data owned by application reducers
    pub application: Map<String, Value>,
}

impl AppState {
    pub fn view(&self, view_id: &str) -> Option<&ViewState> {
        self.views.get(view_id)
    }

    pub fn session(&self, session_id: &str) -> Option<&SessionState> {
        self.sessions.get(session_id)
    }

    pub fn component(&self, component_id: &str) -> Option<&ComponentState> {
        self.components.get(component_id)
    }

    /// Views that belong to a session, in the order they were attached
    pub fn session_views(&self, session_id: &str) -> Vec<&ViewState> {
        self.session(session_id)
            .map(|session| {
                session
                    .views
                    .iter()
                    .filter_map(|view_id| self.views.get(view_id))
                    .collect()
            })
            .unwrap_or_default()
    }
}
