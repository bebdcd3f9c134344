use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub type BatchId = u64;

/// Tenant directory entry as served by `/api/tenants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub domain: String,
    pub name: String,
}

/// Response of `/api/generate-report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub domain: String,
    pub name: String,
    pub preview: String,
    pub download: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub invite: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Started {
        batch_id: BatchId,
        total: usize,
    },
    ItemStarted {
        batch_id: BatchId,
        index: usize,
        tenant_id: String,
    },
    ItemCompleted {
        batch_id: BatchId,
        tenant_id: String,
        result: Result<ReportRecord, RequestFailed>,
    },
    Finished {
        batch_id: BatchId,
        summary: BatchSummary,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SessionResolved(Result<Option<UserRecord>, RequestFailed>),
    AuthCompleted(Result<UserRecord, RequestFailed>),
    LoggedOut(Result<(), RequestFailed>),
    TenantsLoaded(Result<Vec<TenantRecord>, RequestFailed>),
    Batch(BatchEvent),
    DownloadCompleted {
        tenant_id: String,
        result: Result<PathBuf, RequestFailed>,
    },
}

/// A single backend call did not complete successfully.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RequestFailed {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestFailed {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Cancelled,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response body"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
