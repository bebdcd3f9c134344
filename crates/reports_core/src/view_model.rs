use crate::{AppState, DownloadState, GenerateRejection, ModalPhase, ReportStatus, TenantId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session_resolved: bool,
    pub signed_in_as: Option<String>,
    pub auth_pending: bool,
    pub auth_error: Option<String>,
    pub tenants: Vec<TenantRowView>,
    pub tenants_error: Option<String>,
    pub selected: Vec<TenantRowView>,
    pub generate_blocked: Option<GenerateRejection>,
    pub modal: ModalView,
    pub preview: Option<String>,
}

impl AppViewModel {
    pub(crate) fn build(state: &AppState) -> Self {
        let tenants = state
            .tenants
            .iter()
            .map(|tenant| TenantRowView {
                domain: tenant.domain.clone(),
                name: tenant.name.clone(),
                selected: state.selection.contains(&tenant.domain),
            })
            .collect();
        let selected = state
            .selection
            .iter()
            .map(|domain| TenantRowView {
                domain: domain.clone(),
                name: state.display_name(domain),
                selected: true,
            })
            .collect();

        Self {
            session_resolved: state.session.is_resolved(),
            signed_in_as: state.session.user().map(|user| user.email.clone()),
            auth_pending: state.session.pending().is_some(),
            auth_error: state.session.auth_error().map(ToOwned::to_owned),
            tenants,
            tenants_error: state.tenants_error.clone(),
            selected,
            generate_blocked: state.can_generate().err(),
            modal: ModalView::build(state),
            preview: state.preview.current().map(ToOwned::to_owned),
        }
    }

    pub fn generate_enabled(&self) -> bool {
        self.generate_blocked.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRowView {
    pub domain: TenantId,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalView {
    #[default]
    Closed,
    /// `position` is 1-indexed: "processing item `position` of `total`".
    Generating { position: usize, total: usize },
    ShowingResults { cards: Vec<ResultCardView> },
}

impl ModalView {
    fn build(state: &AppState) -> Self {
        match state.modal_phase() {
            ModalPhase::Closed => ModalView::Closed,
            ModalPhase::Generating => {
                let progress = state.run.progress();
                ModalView::Generating {
                    position: progress.display_position(),
                    total: progress.total(),
                }
            }
            ModalPhase::ShowingResults => ModalView::ShowingResults {
                cards: state
                    .run
                    .results()
                    .iter()
                    .enumerate()
                    .map(|(index, result)| ResultCardView {
                        index,
                        tenant_id: result.tenant_id.clone(),
                        name: result.display_name.clone(),
                        status: result.status.clone(),
                        download: state.downloads.get(&result.tenant_id).cloned(),
                    })
                    .collect(),
            },
        }
    }
}

/// One result card: Preview and Download actions are offered when `status` is ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCardView {
    pub index: usize,
    pub tenant_id: TenantId,
    pub name: String,
    pub status: ReportStatus,
    pub download: Option<DownloadState>,
}

impl ResultCardView {
    pub fn has_actions(&self) -> bool {
        matches!(self.status, ReportStatus::Ready { .. })
    }
}
