use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ids::{SessionId, UserId, ViewId};

/// Per-user grouping of views and navigation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub id: SessionId,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub views: Vec<ViewId>,
    pub history: Vec<NavigationEntry>,
    pub data: Map<String, Value>,
}

/// One step recorded by a `NAVIGATION` action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub from_view: ViewId,
    pub to_view_type: String,
    pub timestamp: DateTime<Utc>,
    pub params: Map<String, Value>,
}

impl SessionState {
    pub fn new(
        id: impl Into<SessionId>,
        user_id: Option<UserId>,
        data: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id,
            created_at: now,
            updated_at: now,
            views: Vec::new(),
            history: Vec::new(),
            data,
        }
    }

    /// Appends the view id unless it is already attached
    pub fn attach_view(&mut self, view_id: &str) {
        if !self.views.iter().any(|id| id == view_id) {
            self.views.push(view_id.to_owned());
        }
    }

    pub fn detach_view(&mut self, view_id: &str) {
        self.views.retain(|id| id != view_id);
    }

    pub fn merge_data(&mut self, data: &Map<String, Value>, now: DateTime<Utc>) {
        self.updated_at = now;
        for (key, value) in data {
            self.data.insert(key.clone(), value.clone());
        }
    }
}
