use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ids::{SessionId, UserId, ViewId};

/// View lifecycle messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewMsg {
    Created {
        view_id: ViewId,
        view_type: String,
        user_id: Option<UserId>,
        session_id: Option<SessionId>,
        props: Map<String, Value>,
    },
    Updated {
        view_id: ViewId,
        update: ViewUpdate,
    },
    Destroyed {
        view_id: ViewId,
    },
}

/// Fields changed on an existing view
///
/// `message_id` / `channel_id` overwrite the stored ids when present; every
/// entry of `props` is merged into the view's props.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewUpdate {
    pub message_id: Option<String>,
    pub channel_id: Option<String>,
    #[serde(default)]
    pub props: Map<String, Value>,
}

impl ViewUpdate {
    pub fn message(message_id: impl Into<String>, channel_id: Option<String>) -> Self {
        Self {
            message_id: Some(message_id.into()),
            channel_id,
            props: Map::new(),
        }
    }

    pub fn prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }
}
