use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use reports_logging::{report_debug, report_info};
use tokio_util::sync::CancellationToken;

use crate::orchestrator::{run_batch, ChannelProgressSink};
use crate::{
    download_report, AtomicFileWriter, BatchId, ClientSettings, Credentials, EngineEvent,
    HttpBackend, PersistError, Registration, ReportClient, ReportDownloader, RequestFailed,
    SessionApi, TenantDirectory,
};

/// Everything the engine needs from the report service.
pub trait Backend: ReportClient + TenantDirectory + SessionApi + ReportDownloader {}

impl<T> Backend for T where T: ReportClient + TenantDirectory + SessionApi + ReportDownloader {}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub client: ClientSettings,
    pub output_dir: PathBuf,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            client: ClientSettings::default(),
            output_dir,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build backend client: {0}")]
    Client(#[from] RequestFailed),
    #[error("failed to prepare report directory: {0}")]
    Output(#[from] PersistError),
}

enum EngineCommand {
    FetchCurrentUser,
    LoadTenants,
    Login(Credentials),
    Register(Registration),
    Logout,
    RunBatch { batch_id: BatchId, tenants: Vec<String> },
    CancelBatch { batch_id: BatchId },
    Download { tenant_id: String, download: String },
}

type BatchTokens = Arc<Mutex<HashMap<BatchId, CancellationToken>>>;

/// Runs backend work on a dedicated tokio runtime thread and reports results
/// as [`EngineEvent`]s. Cloning shares the same engine.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        report_info!(
            "Engine starting base_url={} output_dir={:?}",
            config.client.base_url,
            config.output_dir
        );
        let backend = Arc::new(HttpBackend::new(config.client)?);
        let writer = AtomicFileWriter::open(config.output_dir)?;
        Self::with_backend(backend, writer)
    }

    pub fn with_backend(
        backend: Arc<dyn Backend>,
        writer: AtomicFileWriter,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let writer = Arc::new(writer);
        let batches: BatchTokens = Arc::default();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                dispatch(
                    &runtime,
                    command,
                    backend.clone(),
                    writer.clone(),
                    batches.clone(),
                    event_tx.clone(),
                );
            }
            report_debug!("Engine command channel closed");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn fetch_current_user(&self) {
        self.send(EngineCommand::FetchCurrentUser);
    }

    pub fn load_tenants(&self) {
        self.send(EngineCommand::LoadTenants);
    }

    pub fn login(&self, credentials: Credentials) {
        self.send(EngineCommand::Login(credentials));
    }

    pub fn register(&self, registration: Registration) {
        self.send(EngineCommand::Register(registration));
    }

    pub fn logout(&self) {
        self.send(EngineCommand::Logout);
    }

    pub fn run_batch(&self, batch_id: BatchId, tenants: Vec<String>) {
        self.send(EngineCommand::RunBatch { batch_id, tenants });
    }

    pub fn cancel_batch(&self, batch_id: BatchId) {
        self.send(EngineCommand::CancelBatch { batch_id });
    }

    pub fn download(&self, tenant_id: impl Into<String>, download: impl Into<String>) {
        self.send(EngineCommand::Download {
            tenant_id: tenant_id.into(),
            download: download.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

fn dispatch(
    runtime: &tokio::runtime::Runtime,
    command: EngineCommand,
    backend: Arc<dyn Backend>,
    writer: Arc<AtomicFileWriter>,
    batches: BatchTokens,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::RunBatch { batch_id, tenants } => {
            let token = CancellationToken::new();
            if let Ok(mut tokens) = batches.lock() {
                tokens.insert(batch_id, token.clone());
            }
            runtime.spawn(async move {
                let sink = ChannelProgressSink::new(event_tx);
                run_batch(backend.as_ref(), batch_id, &tenants, &token, &sink).await;
                if let Ok(mut tokens) = batches.lock() {
                    tokens.remove(&batch_id);
                }
            });
        }
        EngineCommand::CancelBatch { batch_id } => {
            let token = batches.lock().ok().and_then(|mut tokens| tokens.remove(&batch_id));
            if let Some(token) = token {
                report_info!("Cancelling batch {}", batch_id);
                token.cancel();
            }
        }
        EngineCommand::FetchCurrentUser => {
            runtime.spawn(async move {
                let result = backend.current_user().await;
                let _ = event_tx.send(EngineEvent::SessionResolved(result));
            });
        }
        EngineCommand::LoadTenants => {
            runtime.spawn(async move {
                let result = backend.list_tenants().await;
                let _ = event_tx.send(EngineEvent::TenantsLoaded(result));
            });
        }
        EngineCommand::Login(credentials) => {
            runtime.spawn(async move {
                let result = backend.login(&credentials).await;
                let _ = event_tx.send(EngineEvent::AuthCompleted(result));
            });
        }
        EngineCommand::Register(registration) => {
            runtime.spawn(async move {
                let result = backend.register(&registration).await;
                let _ = event_tx.send(EngineEvent::AuthCompleted(result));
            });
        }
        EngineCommand::Logout => {
            runtime.spawn(async move {
                let result = backend.logout().await;
                let _ = event_tx.send(EngineEvent::LoggedOut(result));
            });
        }
        EngineCommand::Download {
            tenant_id,
            download,
        } => {
            runtime.spawn(async move {
                let result =
                    download_report(backend.as_ref(), writer.as_ref(), &tenant_id, &download)
                        .await;
                let _ = event_tx.send(EngineEvent::DownloadCompleted { tenant_id, result });
            });
        }
    }
}
