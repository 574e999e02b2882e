use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{core::msg::Msg, domain::ids::ViewId};

/// A dispatched message together with where and when it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub msg: Msg,
    /// Id of the view that dispatched the action; that view's subscriber is
    /// not notified about it
    pub source: Option<ViewId>,
    pub timestamp: DateTime<Utc>,
}

impl Action {
    pub fn new(msg: Msg, source: Option<ViewId>) -> Self {
        Self {
            msg,
            source,
            timestamp: Utc::now(),
        }
    }

    pub fn kind(&self) -> String {
        self.msg.kind()
    }
}
