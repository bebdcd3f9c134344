mod support;

use reports_core::{update, AppState, AuthAction, Effect, ModalPhase, Msg};
use support::{complete_ok, init_logging, operator, ready_state, select, start_run, tenant};

#[test]
fn started_resolves_session_and_loads_tenants_once() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::Started);

    assert_eq!(effects, vec![Effect::FetchCurrentUser, Effect::LoadTenants]);
    assert!(!state.session().is_resolved());
    assert!(state.consume_dirty());

    let (state, _) = update(state, Msg::SessionResolved(None));
    assert!(state.session().is_resolved());
    assert!(!state.session().is_signed_in());
}

#[test]
fn login_normalizes_email_and_emits_effect() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::LoginSubmitted {
            email: "  Ops@Example.com ".to_string(),
            password: "secret".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::Login {
            email: "ops@example.com".to_string(),
            password: "secret".to_string(),
        }]
    );
    assert_eq!(state.session().pending(), Some(AuthAction::Login));

    let (state, effects) = update(
        state,
        Msg::LoginSubmitted {
            email: "ops@example.com".to_string(),
            password: "secret".to_string(),
        },
    );
    assert!(effects.is_empty(), "second submit while pending is ignored");

    let (state, _) = update(state, Msg::AuthCompleted(Ok(operator())));
    assert!(state.session().is_signed_in());
    assert_eq!(state.session().pending(), None);
    assert_eq!(
        state.view().signed_in_as.as_deref(),
        Some("ops@example.com")
    );
}

#[test]
fn login_with_missing_fields_is_rejected_locally() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::LoginSubmitted {
            email: "ops@example.com".to_string(),
            password: String::new(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.session().auth_error(), Some("Missing Fields"));
}

#[test]
fn register_requires_matching_passwords() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::RegisterSubmitted {
            email: "ops@example.com".to_string(),
            password: "one".to_string(),
            confirm_password: "two".to_string(),
            invite: "key".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.session().auth_error(), Some("Passwords do not match"));

    let (state, effects) = update(
        state,
        Msg::RegisterSubmitted {
            email: "ops@example.com".to_string(),
            password: "one".to_string(),
            confirm_password: "one".to_string(),
            invite: "key".to_string(),
        },
    );
    assert_eq!(effects.len(), 1);
    assert_eq!(state.session().auth_error(), None);
}

#[test]
fn failed_login_surfaces_server_message() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::LoginSubmitted {
            email: "ops@example.com".to_string(),
            password: "wrong".to_string(),
        },
    );
    let (state, _) = update(state, Msg::AuthCompleted(Err("Unauthorized".to_string())));

    assert!(!state.session().is_signed_in());
    assert_eq!(state.view().auth_error.as_deref(), Some("Unauthorized"));
    assert!(!state.view().auth_pending);
}

#[test]
fn logout_resets_client_state_and_cancels_running_batch() {
    init_logging();
    let state = select(ready_state(), &["tenantA.com", "tenantB.com"]);
    let (state, batch_id, _) = start_run(state);
    let state = complete_ok(state, batch_id, "tenantA.com", "Tenant A");

    let (state, effects) = update(state, Msg::LogoutClicked);
    assert_eq!(effects, vec![Effect::Logout]);

    let (state, effects) = update(state, Msg::LogoutCompleted(Ok(())));
    assert_eq!(
        effects,
        vec![Effect::CancelBatch { batch_id }, Effect::LoadTenants]
    );
    assert!(!state.session().is_signed_in());
    assert!(state.session().is_resolved());
    assert!(state.selection().is_empty());
    assert!(state.tenants().is_empty());
    assert!(!state.is_generating());
    assert_eq!(state.modal_phase(), ModalPhase::Closed);
    assert_eq!(state.preview(), None);

    // Events from the abandoned batch must not resurrect it.
    let state = complete_ok(state, batch_id, "tenantB.com", "Tenant B");
    assert!(state.run().results().is_empty());
}

#[test]
fn logout_after_finished_run_does_not_cancel() {
    init_logging();
    let (state, _) = update(ready_state(), Msg::LogoutClicked);
    let (_, effects) = update(state, Msg::LogoutCompleted(Ok(())));

    assert_eq!(effects, vec![Effect::LoadTenants]);
}

#[test]
fn failed_logout_keeps_session() {
    init_logging();
    let state = select(ready_state(), &["tenantA.com"]);
    let (state, _) = update(state, Msg::LogoutClicked);
    let (state, effects) = update(state, Msg::LogoutCompleted(Err("network error".to_string())));

    assert!(effects.is_empty());
    assert!(state.session().is_signed_in());
    assert_eq!(state.selection().len(), 1);
    assert_eq!(state.session().auth_error(), Some("network error"));
}

#[test]
fn logout_while_signed_out_is_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SessionResolved(None));
    let (_, effects) = update(state, Msg::LogoutClicked);

    assert!(effects.is_empty());
}

#[test]
fn tenant_load_failure_is_reported_and_keeps_list() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::TenantsLoaded(Ok(vec![tenant("tenantA.com", "Tenant A")])),
    );
    let (state, _) = update(state, Msg::TenantsLoaded(Err("http status 502".to_string())));

    let view = state.view();
    assert_eq!(view.tenants.len(), 1);
    assert_eq!(view.tenants_error.as_deref(), Some("http status 502"));
}
