use std::path::PathBuf;

use crate::{BatchId, Tenant, TenantId, User};

/// References returned by the report service for one generated report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLinks {
    pub name: String,
    pub preview: String,
    pub download: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Front-end finished booting.
    Started,
    /// Current-user lookup finished; `None` means nobody is signed in.
    SessionResolved(Option<User>),
    /// User submitted the login form.
    LoginSubmitted { email: String, password: String },
    /// User submitted the registration form.
    RegisterSubmitted {
        email: String,
        password: String,
        confirm_password: String,
        invite: String,
    },
    /// Login or registration finished.
    AuthCompleted(Result<User, String>),
    /// User clicked Logout.
    LogoutClicked,
    /// Logout request finished.
    LogoutCompleted(Result<(), String>),
    /// Tenant directory listing finished.
    TenantsLoaded(Result<Vec<Tenant>, String>),
    /// User clicked a tenant card.
    TenantToggled(TenantId),
    /// User clicked Generate Report(s).
    GenerateClicked,
    /// Engine finished one item of a batch.
    ReportCompleted {
        batch_id: BatchId,
        tenant_id: TenantId,
        outcome: Result<ReportLinks, String>,
    },
    /// Engine finished a batch.
    BatchFinished { batch_id: BatchId },
    /// User clicked Close on the generation modal.
    ModalCloseClicked,
    /// User asked to show the generation modal again.
    ModalReopenClicked,
    /// User clicked Preview on the result card at `index`.
    PreviewRequested { index: usize },
    /// User closed the preview overlay.
    PreviewClosed,
    /// User clicked Download on the result card at `index`.
    DownloadRequested { index: usize },
    /// Engine finished saving a report.
    DownloadCompleted {
        tenant_id: TenantId,
        result: Result<PathBuf, String>,
    },
}
