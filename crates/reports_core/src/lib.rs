//! Tenant reports core: pure state machine and view-model helpers.
mod effect;
mod modal;
mod msg;
mod preview;
mod run;
mod selection;
mod session;
mod state;
mod update;
mod view_model;

/// Domain-like identifier of a tenant.
pub type TenantId = String;
/// Identifier of one generation run.
pub type BatchId = u64;

pub use effect::Effect;
pub use modal::{GenerationModal, ModalPhase};
pub use msg::{Msg, ReportLinks};
pub use preview::PreviewOverlay;
pub use run::{GenerationProgress, GenerationRun, ReportResult, ReportStatus};
pub use selection::SelectionSet;
pub use session::{AuthAction, Session, User};
pub use state::{AppState, DownloadState, GenerateRejection, Tenant};
pub use update::update;
pub use view_model::{AppViewModel, ModalView, ResultCardView, TenantRowView};
