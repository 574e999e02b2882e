use crate::core::{
    action::Action,
    cmd::Cmd,
    msg::{component::ComponentMsg, session::SessionMsg, view::ViewMsg, Msg},
    state::{AppState, ComponentState, InteractionRecord, NavigationEntry, SessionState, ViewState},
};

/// Core reducer
/// Returns the next state and the commands to run for a built-in action.
/// Actions without a core reducer (`MODAL_SUBMITTED`, custom kinds) come back
/// unchanged.
pub fn update(action: &Action, mut state: AppState) -> (AppState, Vec<Cmd>) {
    let now = action.timestamp;
    let kind = action.kind();

    match &action.msg {
        Msg::View(ViewMsg::Created {
            view_id,
            view_type,
            user_id,
            session_id,
            props,
        }) => {
            if view_id.is_empty() {
                return (state, vec![Cmd::ignored(&kind, "missing view_id")]);
            }

            state.views.insert(
                view_id.clone(),
                ViewState::new(
                    view_id.clone(),
                    view_type.clone(),
                    *user_id,
                    session_id.clone(),
                    props.clone(),
                    now,
                ),
            );

            // Associate with session
            if let Some(session) = session_id
                .as_deref()
                .and_then(|session_id| state.sessions.get_mut(session_id))
            {
                session.attach_view(view_id);
            }

            (state, vec![Cmd::debug(format!("view {view_id} created"))])
        }

        Msg::View(ViewMsg::Updated { view_id, update }) => {
            let updated = state
                .views
                .get_mut(view_id)
                .map(|view| view.apply(update, now))
                .is_some();
            if updated {
                (state, vec![])
            } else {
                (state, vec![Cmd::ignored(&kind, format!("unknown view {view_id}"))])
            }
        }

        Msg::View(ViewMsg::Destroyed { view_id }) => {
            let Some(view) = state.views.remove(view_id) else {
                return (state, vec![Cmd::ignored(&kind, format!("unknown view {view_id}"))]);
            };

            if let Some(session) = view
                .session_id
                .as_deref()
                .and_then(|session_id| state.sessions.get_mut(session_id))
            {
                session.detach_view(view_id);
            }

            (state, vec![Cmd::debug(format!("view {view_id} destroyed"))])
        }

        Msg::Session(SessionMsg::Created {
            session_id,
            user_id,
            data,
        }) => {
            if session_id.is_empty() {
                return (state, vec![Cmd::ignored(&kind, "missing session_id")]);
            }

            // Only create if the session doesn't exist already
            state
                .sessions
                .entry(session_id.clone())
                .or_insert_with(|| SessionState::new(session_id.clone(), *user_id, data.clone(), now));

            (state, vec![])
        }

        Msg::Session(SessionMsg::Updated { session_id, data }) => {
            let updated = state
                .sessions
                .get_mut(session_id)
                .map(|session| session.merge_data(data, now))
                .is_some();
            if updated {
                (state, vec![])
            } else {
                (
                    state,
                    vec![Cmd::ignored(&kind, format!("unknown session {session_id}"))],
                )
            }
        }

        Msg::Navigation {
            destination,
            params,
        } => {
            let Some(source) = action.source.as_deref() else {
                return (state, vec![Cmd::ignored(&kind, "no source view")]);
            };
            if destination.is_empty() {
                return (state, vec![Cmd::ignored(&kind, "missing destination")]);
            }

            let session_id = state
                .views
                .get(source)
                .and_then(|view| view.session_id.clone());
            let recorded = session_id
                .and_then(|session_id| state.sessions.get_mut(&session_id))
                .map(|session| {
                    session.history.push(NavigationEntry {
                        from_view: source.to_owned(),
                        to_view_type: destination.clone(),
                        timestamp: now,
                        params: params.clone(),
                    })
                })
                .is_some();
            if recorded {
                (state, vec![])
            } else {
                (
                    state,
                    vec![Cmd::ignored(&kind, format!("view {source} has no session"))],
                )
            }
        }

        Msg::Component(ComponentMsg::Interaction {
            component_id,
            view_id,
            user_id,
            value,
            handler,
        }) => {
            if component_id.is_empty() || view_id.is_empty() {
                return (state, vec![Cmd::ignored(&kind, "missing component_id or view_id")]);
            }

            state
                .components
                .entry(component_id.clone())
                .or_insert_with(|| ComponentState::new(component_id.clone()))
                .record(InteractionRecord {
                    user_id: *user_id,
                    view_id: view_id.clone(),
                    value: value.clone(),
                    handler: handler.clone(),
                    timestamp: now,
                });

            (state, vec![])
        }

        Msg::Component(ComponentMsg::ModalSubmitted { .. }) | Msg::Custom { .. } => {
            (state, vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{json, Map, Value};

    use super::*;
    use crate::core::msg::view::ViewUpdate;

    fn run(state: AppState, msg: Msg) -> AppState {
        run_from(state, msg, None)
    }

    fn run_from(state: AppState, msg: Msg, source: Option<&str>) -> AppState {
        update(&Action::new(msg, source.map(str::to_owned)), state).0
    }

    fn create_test_state() -> AppState {
        let state = run(
            AppState::default(),
            Msg::session_created("user_1", Some(1), Map::new()),
        );
        run(
            state,
            Msg::view_created("v1", "MenuView", Some(1), Some("user_1".into()), Map::new()),
        )
    }

    #[test]
    fn test_view_created_attaches_to_session() {
        let state = create_test_state();

        let view = state.view("v1").unwrap();
        assert_eq!(view.view_type, "MenuView");
        assert_eq!(view.session_id.as_deref(), Some("user_1"));
        assert_eq!(view.created_at, view.updated_at);
        assert_eq!(state.session("user_1").unwrap().views, vec!["v1".to_string()]);
    }

    #[test]
    fn test_view_created_without_known_session() {
        let state = run(
            AppState::default(),
            Msg::view_created("v1", "MenuView", None, Some("nobody".into()), Map::new()),
        );

        assert!(state.view("v1").is_some());
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_view_created_with_empty_id_is_ignored() {
        let (state, cmds) = update(
            &Action::new(
                Msg::view_created("", "MenuView", None, None, Map::new()),
                None,
            ),
            AppState::default(),
        );

        assert_eq!(state, AppState::default());
        assert_eq!(cmds, vec![Cmd::ignored("VIEW_CREATED", "missing view_id")]);
    }

    #[test]
    fn test_view_updated_merges_props() {
        let state = create_test_state();
        let state = run(
            state,
            Msg::view_updated(
                "v1",
                ViewUpdate::message("m1", Some("c1".into())).prop("page", json!(3)),
            ),
        );

        let view = state.view("v1").unwrap();
        assert_eq!(view.message_id.as_deref(), Some("m1"));
        assert_eq!(view.channel_id.as_deref(), Some("c1"));
        assert_eq!(view.props.get("page"), Some(&json!(3)));
    }

    #[test]
    fn test_view_updated_unknown_view_is_ignored() {
        let state = create_test_state();
        let (next, cmds) = update(
            &Action::new(Msg::view_updated("v9", ViewUpdate::default()), None),
            state.clone(),
        );

        assert_eq!(next, state);
        assert_eq!(cmds.len(), 1);
    }

    #[test]
    fn test_view_destroyed_detaches_from_session() {
        let state = run(create_test_state(), Msg::view_destroyed("v1"));

        assert!(state.view("v1").is_none());
        assert!(state.session("user_1").unwrap().views.is_empty());
    }

    #[test]
    fn test_session_created_keeps_existing_session() {
        let mut data = Map::new();
        data.insert("replaced".into(), Value::Bool(true));
        let state = run(create_test_state(), Msg::session_created("user_1", Some(99), data));

        let session = state.session("user_1").unwrap();
        assert_eq!(session.user_id, Some(1));
        assert!(session.data.is_empty());
        assert_eq!(session.views, vec!["v1".to_string()]);
    }

    #[test]
    fn test_session_updated_merges_data() {
        let mut data = Map::new();
        data.insert("step".into(), json!(2));
        let state = run(create_test_state(), Msg::session_updated("user_1", data));

        assert_eq!(state.session("user_1").unwrap().data.get("step"), Some(&json!(2)));
    }

    #[test]
    fn test_navigation_appends_history() {
        let mut params = Map::new();
        params.insert("item".into(), json!("apple"));
        let state = run_from(
            create_test_state(),
            Msg::navigation("DetailView", params.clone()),
            Some("v1"),
        );

        let history = &state.session("user_1").unwrap().history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].from_view, "v1");
        assert_eq!(history[0].to_view_type, "DetailView");
        assert_eq!(history[0].params, params);
    }

    #[test]
    fn test_navigation_without_source_is_ignored() {
        let state = create_test_state();
        let next = run(state.clone(), Msg::navigation("DetailView", Map::new()));

        assert_eq!(next, state);
    }

    #[test]
    fn test_component_interaction_records_in_order() {
        let state = run(
            create_test_state(),
            Msg::component_interaction("save", "v1", Some(1), Value::Bool(true)),
        );
        let state = run(
            state,
            Msg::component_interaction("save", "v1", Some(2), json!(false)),
        );

        let component = state.component("save").unwrap();
        assert_eq!(component.interactions.len(), 2);
        assert_eq!(component.interactions[0].user_id, Some(1));
        assert_eq!(component.last_value(), Some(&json!(false)));
        assert_eq!(
            component.last_interaction,
            Some(component.interactions[1].timestamp)
        );
    }

    #[test]
    fn test_handler_interaction_records_handler_name() {
        let state = run(
            create_test_state(),
            Msg::handler_interaction("refresh", "v1", Some(4), "on_refresh"),
        );

        let record = &state.component("refresh").unwrap().interactions[0];
        assert_eq!(record.handler.as_deref(), Some("on_refresh"));
        assert_eq!(record.value, Value::Null);
    }

    #[test]
    fn test_custom_msg_leaves_state_untouched() {
        let state = create_test_state();
        let next = run(state.clone(), Msg::custom("SOMETHING", json!({"a": 1})));

        assert_eq!(next, state);
    }
}
