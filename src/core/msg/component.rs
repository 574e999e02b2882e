use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ids::{ComponentId, UserId, ViewId};

/// Messages emitted by stateful components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentMsg {
    /// A button press or select choice; `value` is `true` for buttons, the
    /// toggle state for toggles and the chosen values for selects
    Interaction {
        component_id: ComponentId,
        view_id: ViewId,
        user_id: Option<UserId>,
        value: Value,
        /// Name of the handler that ran, for handlers wrapped with
        /// `cascade_component`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        handler: Option<String>,
    },
    ModalSubmitted {
        view_id: ViewId,
        values: BTreeMap<String, String>,
        user_id: Option<UserId>,
    },
}
