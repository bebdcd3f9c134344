use crate::{BatchId, TenantId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCurrentUser,
    LoadTenants,
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        confirm_password: String,
        invite: String,
    },
    Logout,
    /// Generate reports for `tenants`, strictly one at a time, in order.
    RunBatch {
        batch_id: BatchId,
        tenants: Vec<TenantId>,
    },
    CancelBatch {
        batch_id: BatchId,
    },
    Download {
        tenant_id: TenantId,
        download: String,
    },
}
