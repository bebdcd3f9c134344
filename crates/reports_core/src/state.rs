use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::view_model::AppViewModel;
use crate::{
    BatchId, GenerationModal, GenerationRun, ModalPhase, PreviewOverlay, ReportResult,
    SelectionSet, Session, TenantId,
};

/// Entry of the tenant directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub domain: TenantId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadState {
    InProgress,
    Saved(PathBuf),
    Failed(String),
}

/// Why a generation request is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateRejection {
    EmptySelection,
    AlreadyGenerating,
    SignedOut,
}

impl fmt::Display for GenerateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateRejection::EmptySelection => write!(f, "no tenants selected"),
            GenerateRejection::AlreadyGenerating => write!(f, "a run is already in progress"),
            GenerateRejection::SignedOut => write!(f, "sign in to generate reports"),
        }
    }
}

/// Page-level controller state. All generation state lives here and is only
/// mutated through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) session: Session,
    pub(crate) tenants: Vec<Tenant>,
    pub(crate) tenants_error: Option<String>,
    pub(crate) selection: SelectionSet,
    pub(crate) run: GenerationRun,
    pub(crate) modal: GenerationModal,
    pub(crate) preview: PreviewOverlay,
    pub(crate) downloads: BTreeMap<TenantId, DownloadState>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::build(self)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tenants(&self) -> &[Tenant] {
        &self.tenants
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn run(&self) -> &GenerationRun {
        &self.run
    }

    pub fn is_generating(&self) -> bool {
        self.run.is_generating()
    }

    pub fn is_modal_visible(&self) -> bool {
        self.modal.is_visible()
    }

    pub fn modal_phase(&self) -> ModalPhase {
        self.modal.phase(self.run.is_generating())
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.current()
    }

    pub fn download_state(&self, tenant_id: &str) -> Option<&DownloadState> {
        self.downloads.get(tenant_id)
    }

    pub fn can_generate(&self) -> Result<(), GenerateRejection> {
        if !self.session.is_signed_in() {
            return Err(GenerateRejection::SignedOut);
        }
        if self.run.is_generating() {
            return Err(GenerateRejection::AlreadyGenerating);
        }
        if self.selection.is_empty() {
            return Err(GenerateRejection::EmptySelection);
        }
        Ok(())
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_known_tenant(&self, tenant_id: &str) -> bool {
        self.tenants.iter().any(|tenant| tenant.domain == tenant_id)
    }

    pub(crate) fn display_name(&self, tenant_id: &str) -> String {
        tenant_display_name(&self.tenants, tenant_id)
    }

    /// Result card shown in the modal at `index`, only while results are visible.
    pub(crate) fn visible_result(&self, index: usize) -> Option<&ReportResult> {
        if self.modal_phase() != ModalPhase::ShowingResults {
            return None;
        }
        self.run.results().get(index)
    }

    /// Returns every piece of client state to its initial value.
    /// Yields the batch that was still running so it can be cancelled.
    pub(crate) fn reset_client_state(&mut self) -> Option<BatchId> {
        let in_flight = self.run.abandon();
        self.session.clear();
        self.tenants.clear();
        self.tenants_error = None;
        self.selection.clear();
        self.modal.close();
        self.preview.close();
        self.downloads.clear();
        self.dirty = true;
        in_flight
    }
}

/// Directory name for `tenant_id`, falling back to the id itself.
pub(crate) fn tenant_display_name(tenants: &[Tenant], tenant_id: &str) -> String {
    tenants
        .iter()
        .find(|tenant| tenant.domain == tenant_id)
        .map(|tenant| tenant.name.clone())
        .unwrap_or_else(|| tenant_id.to_string())
}
