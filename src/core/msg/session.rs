use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ids::{SessionId, UserId};

/// Session messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionMsg {
    Created {
        session_id: SessionId,
        user_id: Option<UserId>,
        data: Map<String, Value>,
    },
    /// Shallow-merges `data` into the session data
    Updated {
        session_id: SessionId,
        data: Map<String, Value>,
    },
}
