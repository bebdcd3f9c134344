use crate::state::tenant_display_name;
use crate::{AppState, AuthAction, DownloadState, Effect, Msg, ReportResult, Tenant, User};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            state.mark_dirty();
            vec![Effect::FetchCurrentUser, Effect::LoadTenants]
        }
        Msg::SessionResolved(user) => {
            state.session.resolve(user);
            state.mark_dirty();
            Vec::new()
        }
        Msg::LoginSubmitted { email, password } => {
            let email = email.trim().to_lowercase();
            if email.is_empty() || password.is_empty() {
                state.session.fail("Missing Fields");
                state.mark_dirty();
                return (state, Vec::new());
            }
            if !state.session.begin(AuthAction::Login) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            vec![Effect::Login { email, password }]
        }
        Msg::RegisterSubmitted {
            email,
            password,
            confirm_password,
            invite,
        } => {
            let email = email.trim().to_lowercase();
            if email.is_empty() || password.is_empty() || confirm_password.is_empty() {
                state.session.fail("Missing Fields");
                state.mark_dirty();
                return (state, Vec::new());
            }
            if password != confirm_password {
                state.session.fail("Passwords do not match");
                state.mark_dirty();
                return (state, Vec::new());
            }
            if !state.session.begin(AuthAction::Register) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            vec![Effect::Register {
                email,
                password,
                confirm_password,
                invite,
            }]
        }
        Msg::AuthCompleted(result) => {
            apply_auth_result(&mut state, result);
            Vec::new()
        }
        Msg::LogoutClicked => {
            if !state.session.is_signed_in() || !state.session.begin(AuthAction::Logout) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            vec![Effect::Logout]
        }
        Msg::LogoutCompleted(Ok(())) => {
            let mut effects = Vec::with_capacity(2);
            if let Some(batch_id) = state.reset_client_state() {
                effects.push(Effect::CancelBatch { batch_id });
            }
            effects.push(Effect::LoadTenants);
            effects
        }
        Msg::LogoutCompleted(Err(message)) => {
            state.session.fail(message);
            state.mark_dirty();
            Vec::new()
        }
        Msg::TenantsLoaded(result) => {
            apply_tenants(&mut state, result);
            Vec::new()
        }
        Msg::TenantToggled(tenant_id) => {
            if state.is_known_tenant(&tenant_id) {
                state.selection.toggle(&tenant_id);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::GenerateClicked => {
            if state.can_generate().is_err() {
                return (state, Vec::new());
            }
            let tenants = state.selection.as_slice().to_vec();
            state.modal.open();
            // Download state belongs to the cards of the run being replaced.
            state.downloads.clear();
            let batch_id = state.run.begin(tenants.clone());
            state.mark_dirty();
            vec![Effect::RunBatch { batch_id, tenants }]
        }
        Msg::ReportCompleted {
            batch_id,
            tenant_id,
            outcome,
        } => {
            let result = match outcome {
                Ok(links) => {
                    ReportResult::ready(tenant_id, links.name, links.preview, links.download)
                }
                Err(reason) => {
                    let name = state.display_name(&tenant_id);
                    ReportResult::failed(tenant_id, name, reason)
                }
            };
            if state.run.record(batch_id, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::BatchFinished { batch_id } => {
            let tenants = &state.tenants;
            let finished = state
                .run
                .finish(batch_id, |tenant_id| tenant_display_name(tenants, tenant_id));
            if finished {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ModalCloseClicked => {
            if state.modal.close() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ModalReopenClicked => {
            if state.run.has_started() && state.modal.open() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PreviewRequested { index } => {
            let reference = state
                .visible_result(index)
                .and_then(ReportResult::preview)
                .map(ToOwned::to_owned);
            if let Some(reference) = reference {
                state.preview.open(reference);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PreviewClosed => {
            if state.preview.close().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DownloadRequested { index } => {
            let request = state.visible_result(index).and_then(|result| {
                result
                    .download()
                    .map(|download| (result.tenant_id.clone(), download.to_string()))
            });
            let Some((tenant_id, download)) = request else {
                return (state, Vec::new());
            };
            if state.downloads.get(&tenant_id) == Some(&DownloadState::InProgress) {
                return (state, Vec::new());
            }
            state
                .downloads
                .insert(tenant_id.clone(), DownloadState::InProgress);
            state.mark_dirty();
            vec![Effect::Download {
                tenant_id,
                download,
            }]
        }
        Msg::DownloadCompleted { tenant_id, result } => {
            // Downloads cleared by a reset are not resurrected.
            if let Some(entry) = state.downloads.get_mut(&tenant_id) {
                *entry = match result {
                    Ok(path) => DownloadState::Saved(path),
                    Err(reason) => DownloadState::Failed(reason),
                };
                state.mark_dirty();
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn apply_auth_result(state: &mut AppState, result: Result<User, String>) {
    match result {
        Ok(user) => state.session.sign_in(user),
        Err(message) => state.session.fail(message),
    }
    state.mark_dirty();
}

fn apply_tenants(state: &mut AppState, result: Result<Vec<Tenant>, String>) {
    match result {
        Ok(tenants) => {
            state.tenants = tenants;
            state.tenants_error = None;
        }
        Err(message) => {
            state.tenants_error = Some(message);
        }
    }
    state.mark_dirty();
}

