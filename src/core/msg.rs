use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub mod component;
pub mod session;
pub mod view;

use crate::domain::ids::{ComponentId, SessionId, UserId, ViewId};
use component::ComponentMsg;
use session::SessionMsg;
use view::{ViewMsg, ViewUpdate};

/// Wire names of the built-in action kinds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    ViewCreated,
    ViewUpdated,
    ViewDestroyed,
    SessionCreated,
    SessionUpdated,
    Navigation,
    ComponentInteraction,
    ModalSubmitted,
}

impl ActionKind {
    /// Whether `update` handles this kind; the rest only reach custom reducers
    pub fn has_core_reducer(&self) -> bool {
        !matches!(self, ActionKind::ModalSubmitted)
    }
}

/// Messages dispatched to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Msg {
    View(ViewMsg),
    Session(SessionMsg),
    Component(ComponentMsg),

    /// The source view is moving to a view of type `destination`
    Navigation {
        destination: String,
        params: Map<String, Value>,
    },

    /// Application-defined action handled by a registered reducer
    Custom { kind: String, payload: Value },
}

impl Msg {
    /// Built-in kind of this message, `None` for custom messages
    pub fn action_kind(&self) -> Option<ActionKind> {
        match self {
            Msg::View(ViewMsg::Created { .. }) => Some(ActionKind::ViewCreated),
            Msg::View(ViewMsg::Updated { .. }) => Some(ActionKind::ViewUpdated),
            Msg::View(ViewMsg::Destroyed { .. }) => Some(ActionKind::ViewDestroyed),
            Msg::Session(SessionMsg::Created { .. }) => Some(ActionKind::SessionCreated),
            Msg::Session(SessionMsg::Updated { .. }) => Some(ActionKind::SessionUpdated),
            Msg::Navigation { .. } => Some(ActionKind::Navigation),
            Msg::Component(ComponentMsg::Interaction { .. }) => {
                Some(ActionKind::ComponentInteraction)
            }
            Msg::Component(ComponentMsg::ModalSubmitted { .. }) => Some(ActionKind::ModalSubmitted),
            Msg::Custom { .. } => None,
        }
    }

    /// Name reducers are registered under, e.g. `VIEW_CREATED`
    pub fn kind(&self) -> String {
        match (self.action_kind(), self) {
            (Some(kind), _) => kind.to_string(),
            (None, Msg::Custom { kind, .. }) => kind.clone(),
            (None, _) => String::new(),
        }
    }

    pub fn view_created(
        view_id: impl Into<ViewId>,
        view_type: impl Into<String>,
        user_id: Option<UserId>,
        session_id: Option<SessionId>,
        props: Map<String, Value>,
    ) -> Self {
        Msg::View(ViewMsg::Created {
            view_id: view_id.into(),
            view_type: view_type.into(),
            user_id,
            session_id,
            props,
        })
    }

    pub fn view_updated(view_id: impl Into<ViewId>, update: ViewUpdate) -> Self {
        Msg::View(ViewMsg::Updated {
            view_id: view_id.into(),
            update,
        })
    }

    pub fn view_destroyed(view_id: impl Into<ViewId>) -> Self {
        Msg::View(ViewMsg::Destroyed {
            view_id: view_id.into(),
        })
    }

    pub fn session_created(
        session_id: impl Into<SessionId>,
        user_id: Option<UserId>,
        data: Map<String, Value>,
    ) -> Self {
        Msg::Session(SessionMsg::Created {
            session_id: session_id.into(),
            user_id,
            data,
        })
    }

    pub fn session_updated(session_id: impl Into<SessionId>, data: Map<String, Value>) -> Self {
        Msg::Session(SessionMsg::Updated {
            session_id: session_id.into(),
            data,
        })
    }

    pub fn navigation(destination: impl Into<String>, params: Map<String, Value>) -> Self {
        Msg::Navigation {
            destination: destination.into(),
            params,
        }
    }

    pub fn component_interaction(
        component_id: impl Into<ComponentId>,
        view_id: impl Into<ViewId>,
        user_id: Option<UserId>,
        value: Value,
    ) -> Self {
        Msg::Component(ComponentMsg::Interaction {
            component_id: component_id.into(),
            view_id: view_id.into(),
            user_id,
            value,
            handler: None,
        })
    }

    /// Interaction recorded on behalf of a named handler
    pub fn handler_interaction(
        component_id: impl Into<ComponentId>,
        view_id: impl Into<ViewId>,
        user_id: Option<UserId>,
        handler: impl Into<String>,
    ) -> Self {
        Msg::Component(ComponentMsg::Interaction {
            component_id: component_id.into(),
            view_id: view_id.into(),
            user_id,
            value: Value::Null,
            handler: Some(handler.into()),
        })
    }

    pub fn modal_submitted(
        view_id: impl Into<ViewId>,
        values: BTreeMap<String, String>,
        user_id: Option<UserId>,
    ) -> Self {
        Msg::Component(ComponentMsg::ModalSubmitted {
            view_id: view_id.into(),
            values,
            user_id,
        })
    }

    pub fn custom(kind: impl Into<String>, payload: Value) -> Self {
        Msg::Custom {
            kind: kind.into(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(Msg::view_destroyed("v1"), "VIEW_DESTROYED")]
    #[case(Msg::session_created("s1", Some(1), Map::new()), "SESSION_CREATED")]
    #[case(Msg::navigation("NextView", Map::new()), "NAVIGATION")]
    #[case(
        Msg::component_interaction("c1", "v1", None, Value::Bool(true)),
        "COMPONENT_INTERACTION"
    )]
    #[case(Msg::custom("COUNTER_INCREMENTED", json!(1)), "COUNTER_INCREMENTED")]
    fn test_msg_kind(#[case] msg: Msg, #[case] expected: &str) {
        assert_eq!(msg.kind(), expected);
    }

    #[test]
    fn test_action_kind_round_trips_through_wire_name() {
        let kind = ActionKind::from_str("MODAL_SUBMITTED").unwrap();
        assert_eq!(kind, ActionKind::ModalSubmitted);
        assert!(!kind.has_core_reducer());
        assert!(ActionKind::ViewCreated.has_core_reducer());
    }

    #[test]
    fn test_msg_serialization() {
        let msg = Msg::component_interaction("c1", "v1", Some(3), json!(["a", "b"]));
        let serialized = serde_json::to_string(&msg).unwrap();
        let deserialized: Msg = serde_json::from_str(&serialized).unwrap();
        assert_eq!(msg, deserialized);
    }
}
