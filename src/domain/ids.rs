use uuid::Uuid;

pub type ViewId = String;
pub type SessionId = String;
pub type ComponentId = String;
pub type UserId = u64;

/// Session id used when a view is opened for a user without an explicit session
pub fn user_session_id(user_id: UserId) -> SessionId {
    format!("user_{user_id}")
}

/// Fresh random id for a view
pub fn new_view_id() -> ViewId {
    Uuid::new_v4().to_string()
}

/// Fresh custom id for a component, e.g. `button_4f0c...`
pub fn new_component_id(prefix: &str) -> ComponentId {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_user_session_id() {
        assert_eq!(user_session_id(42), "user_42");
    }

    #[test]
    fn test_new_component_id_is_prefixed_and_unique() {
        let a = new_component_id("button");
        let b = new_component_id("button");

        assert!(a.starts_with("button_"));
        assert_ne!(a, b);
    }
}
