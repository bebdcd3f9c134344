use std::sync::mpsc;

use reports_logging::{report_debug, report_info, report_warn};
use tokio_util::sync::CancellationToken;

use crate::{
    BatchEvent, BatchId, BatchSummary, EngineEvent, FailureKind, ReportClient, RequestFailed,
};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Generates one report per tenant, strictly sequentially and in order.
///
/// A failed request is reported as a failed item and the loop moves on to the
/// next tenant. Cancellation stops the loop before the next request and drops
/// the one in flight, which is reported as a `Cancelled` failure. It is never
/// triggered by hiding the progress UI.
pub async fn run_batch<C>(
    client: &C,
    batch_id: BatchId,
    tenants: &[String],
    cancel: &CancellationToken,
    sink: &dyn ProgressSink,
) -> BatchSummary
where
    C: ReportClient + ?Sized,
{
    let total = tenants.len();
    let mut summary = BatchSummary {
        total,
        ..BatchSummary::default()
    };
    report_info!("Batch {} started with {} tenant(s)", batch_id, total);
    sink.emit(EngineEvent::Batch(BatchEvent::Started { batch_id, total }));

    for (index, tenant_id) in tenants.iter().enumerate() {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }
        report_debug!("Batch {} item {}/{} tenant={}", batch_id, index + 1, total, tenant_id);
        sink.emit(EngineEvent::Batch(BatchEvent::ItemStarted {
            batch_id,
            index,
            tenant_id: tenant_id.clone(),
        }));

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = client.request_report(tenant_id) => Some(result),
        };
        let Some(result) = outcome else {
            summary.cancelled = true;
            sink.emit(EngineEvent::Batch(BatchEvent::ItemCompleted {
                batch_id,
                tenant_id: tenant_id.clone(),
                result: Err(RequestFailed::new(
                    FailureKind::Cancelled,
                    "batch cancelled while the report was generating",
                )),
            }));
            break;
        };

        match &result {
            Ok(_) => summary.succeeded += 1,
            Err(err) => {
                summary.failed += 1;
                report_warn!("Batch {} tenant={} failed: {}", batch_id, tenant_id, err);
            }
        }
        sink.emit(EngineEvent::Batch(BatchEvent::ItemCompleted {
            batch_id,
            tenant_id: tenant_id.clone(),
            result,
        }));
    }

    report_info!(
        "Batch {} finished: {} ok, {} failed, cancelled={}",
        batch_id,
        summary.succeeded,
        summary.failed,
        summary.cancelled
    );
    sink.emit(EngineEvent::Batch(BatchEvent::Finished { batch_id, summary }));
    summary
}
