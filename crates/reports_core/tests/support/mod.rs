#![allow(dead_code)]

use std::sync::Once;

use reports_core::{update, AppState, Effect, Msg, ReportLinks, Tenant, User};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(reports_logging::initialize_for_tests);
}

pub fn tenant(domain: &str, name: &str) -> Tenant {
    Tenant {
        domain: domain.to_string(),
        name: name.to_string(),
    }
}

pub fn operator() -> User {
    User {
        id: 1,
        email: "ops@example.com".to_string(),
    }
}

pub fn links(name: &str, preview: &str, download: &str) -> ReportLinks {
    ReportLinks {
        name: name.to_string(),
        preview: preview.to_string(),
        download: download.to_string(),
    }
}

/// Signed-in state with tenants A, B and C in the directory.
pub fn ready_state() -> AppState {
    let (state, _) = update(AppState::new(), Msg::SessionResolved(Some(operator())));
    let (state, _) = update(
        state,
        Msg::TenantsLoaded(Ok(vec![
            tenant("tenantA.com", "Tenant A"),
            tenant("tenantB.com", "Tenant B"),
            tenant("tenantC.com", "Tenant C"),
        ])),
    );
    state
}

pub fn select(mut state: AppState, ids: &[&str]) -> AppState {
    for id in ids {
        (state, _) = update(state, Msg::TenantToggled(id.to_string()));
    }
    state
}

/// Clicks Generate and returns the batch id of the emitted run.
pub fn start_run(state: AppState) -> (AppState, u64, Vec<String>) {
    let (state, effects) = update(state, Msg::GenerateClicked);
    match effects.as_slice() {
        [Effect::RunBatch { batch_id, tenants }] => (state, *batch_id, tenants.clone()),
        other => panic!("expected a single RunBatch effect, got {other:?}"),
    }
}

pub fn complete_ok(state: AppState, batch_id: u64, tenant_id: &str, name: &str) -> AppState {
    let short = tenant_id.trim_end_matches(".com");
    let (state, _) = update(
        state,
        Msg::ReportCompleted {
            batch_id,
            tenant_id: tenant_id.to_string(),
            outcome: Ok(links(name, &format!("/p/{short}"), &format!("/d/{short}"))),
        },
    );
    state
}

pub fn finish(state: AppState, batch_id: u64) -> AppState {
    let (state, _) = update(state, Msg::BatchFinished { batch_id });
    state
}
