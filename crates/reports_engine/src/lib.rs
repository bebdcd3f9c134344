//! Tenant reports engine: backend client, sequential batch runner and
//! report downloads.
mod client;
mod download;
mod engine;
mod filename;
mod orchestrator;
mod persist;
mod types;

pub use client::{
    resolve_reference, ClientSettings, HttpBackend, ReportClient, ReportDownloader, SessionApi,
    TenantDirectory,
};
pub use download::download_report;
pub use engine::{Backend, EngineConfig, EngineError, EngineHandle};
pub use filename::report_filename;
pub use orchestrator::{run_batch, ChannelProgressSink, ProgressSink};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    BatchEvent, BatchId, BatchSummary, Credentials, EngineEvent, FailureKind, Registration,
    ReportRecord, RequestFailed, TenantRecord, UserRecord,
};
pub use tokio_util::sync::CancellationToken;
