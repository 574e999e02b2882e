use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    core::msg::view::ViewUpdate,
    domain::ids::{SessionId, UserId, ViewId},
};

/// A live view as recorded in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub id: ViewId,
    pub view_type: String,
    pub user_id: Option<UserId>,
    pub session_id: Option<SessionId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub props: Map<String, Value>,
    pub message_id: Option<String>,
    pub channel_id: Option<String>,
}

impl ViewState {
    pub fn new(
        id: impl Into<ViewId>,
        view_type: impl Into<String>,
        user_id: Option<UserId>,
        session_id: Option<SessionId>,
        props: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            view_type: view_type.into(),
            user_id,
            session_id,
            created_at: now,
            updated_at: now,
            props,
            message_id: None,
            channel_id: None,
        }
    }

    pub fn apply(&mut self, update: &ViewUpdate, now: DateTime<Utc>) {
        self.updated_at = now;
        if let Some(message_id) = &update.message_id {
            self.message_id = Some(message_id.clone());
        }
        if let Some(channel_id) = &update.channel_id {
            self.channel_id = Some(channel_id.clone());
        }
        for (key, value) in &update.props {
            self.props.insert(key.clone(), value.clone());
        }
    }
}
