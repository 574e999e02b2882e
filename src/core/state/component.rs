use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ids::{ComponentId, UserId, ViewId};

/// Interaction log of a single component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentState {
    pub id: ComponentId,
    pub interactions: Vec<InteractionRecord>,
    pub last_interaction: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub user_id: Option<UserId>,
    pub view_id: ViewId,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ComponentState {
    pub fn new(id: impl Into<ComponentId>) -> Self {
        Self {
            id: id.into(),
            interactions: Vec::new(),
            last_interaction: None,
        }
    }

    pub fn record(&mut self, record: InteractionRecord) {
        self.last_interaction = Some(record.timestamp);
        self.interactions.push(record);
    }

    pub fn last_value(&self) -> Option<&Value> {
        self.interactions.last().map(|record| &record.value)
    }
}
