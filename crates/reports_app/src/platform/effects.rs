use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use reports_core::{Effect, Msg, ReportLinks, Tenant, User};
use reports_engine::{
    BatchEvent, Credentials, EngineEvent, EngineHandle, Registration, TenantRecord, UserRecord,
};
use reports_logging::{report_debug, report_info, report_warn};

use super::app::AppEvent;

/// Turns core effects into engine commands and feeds engine events back as
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, event_tx: mpsc::Sender<AppEvent>) -> Self {
        let runner = Self { engine };
        runner.spawn_event_loop(event_tx);
        runner
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchCurrentUser => self.engine.fetch_current_user(),
                Effect::LoadTenants => self.engine.load_tenants(),
                Effect::Login { email, password } => {
                    report_info!("Login email={}", email);
                    self.engine.login(Credentials { email, password });
                }
                Effect::Register {
                    email,
                    password,
                    confirm_password,
                    invite,
                } => {
                    report_info!("Register email={}", email);
                    self.engine.register(Registration {
                        email,
                        password,
                        confirm_password,
                        invite,
                    });
                }
                Effect::Logout => self.engine.logout(),
                Effect::RunBatch { batch_id, tenants } => {
                    report_info!("RunBatch batch_id={} tenants={}", batch_id, tenants.len());
                    self.engine.run_batch(batch_id, tenants);
                }
                Effect::CancelBatch { batch_id } => {
                    report_info!("CancelBatch batch_id={}", batch_id);
                    self.engine.cancel_batch(batch_id);
                }
                Effect::Download {
                    tenant_id,
                    download,
                } => self.engine.download(tenant_id, download),
            }
        }
    }

    fn spawn_event_loop(&self, event_tx: mpsc::Sender<AppEvent>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(Duration::from_millis(100)) else {
                continue;
            };
            let Some(msg) = map_event(event) else {
                continue;
            };
            if event_tx.send(AppEvent::Msg(msg)).is_err() {
                break;
            }
        });
    }
}

/// Translates one engine event. Progress markers that the core derives on
/// its own map to `None`.
pub fn map_event(event: EngineEvent) -> Option<Msg> {
    let msg = match event {
        EngineEvent::SessionResolved(Ok(user)) => Msg::SessionResolved(user.map(map_user)),
        EngineEvent::SessionResolved(Err(err)) => {
            report_warn!("Session lookup failed, treating as signed out: {}", err);
            Msg::SessionResolved(None)
        }
        EngineEvent::AuthCompleted(result) => {
            Msg::AuthCompleted(result.map(map_user).map_err(|err| err.message))
        }
        EngineEvent::LoggedOut(result) => Msg::LogoutCompleted(result.map_err(|err| err.message)),
        EngineEvent::TenantsLoaded(result) => Msg::TenantsLoaded(
            result
                .map(|records| records.into_iter().map(map_tenant).collect())
                .map_err(|err| err.message),
        ),
        EngineEvent::Batch(BatchEvent::Started { batch_id, total }) => {
            report_debug!("Batch {} started total={}", batch_id, total);
            return None;
        }
        EngineEvent::Batch(BatchEvent::ItemStarted {
            batch_id,
            index,
            tenant_id,
        }) => {
            report_debug!("Batch {} item {} tenant={}", batch_id, index, tenant_id);
            return None;
        }
        EngineEvent::Batch(BatchEvent::ItemCompleted {
            batch_id,
            tenant_id,
            result,
        }) => Msg::ReportCompleted {
            batch_id,
            tenant_id,
            outcome: result
                .map(|record| ReportLinks {
                    name: record.name,
                    preview: record.preview,
                    download: record.download,
                })
                .map_err(|err| err.message),
        },
        EngineEvent::Batch(BatchEvent::Finished { batch_id, .. }) => {
            Msg::BatchFinished { batch_id }
        }
        EngineEvent::DownloadCompleted { tenant_id, result } => Msg::DownloadCompleted {
            tenant_id,
            result: result.map_err(|err| err.to_string()),
        },
    };
    Some(msg)
}

fn map_user(record: UserRecord) -> User {
    User {
        id: record.id,
        email: record.email,
    }
}

fn map_tenant(record: TenantRecord) -> Tenant {
    Tenant {
        domain: record.domain,
        name: record.name,
    }
}
