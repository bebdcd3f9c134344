use std::path::PathBuf;

use reports_logging::{report_info, report_warn};

use crate::{report_filename, AtomicFileWriter, FailureKind, ReportDownloader, RequestFailed};

/// Fetches the report behind `download` (passed through unmodified) and saves
/// it as `{tenant_id}-report.pdf` in the writer's directory.
pub async fn download_report<D>(
    downloader: &D,
    writer: &AtomicFileWriter,
    tenant_id: &str,
    download: &str,
) -> Result<PathBuf, RequestFailed>
where
    D: ReportDownloader + ?Sized,
{
    let bytes = downloader.fetch_report(download).await.inspect_err(|err| {
        report_warn!("Download failed tenant={} reference={}: {}", tenant_id, download, err);
    })?;

    let filename = report_filename(tenant_id);
    let path = writer
        .write(&filename, &bytes)
        .map_err(|err| RequestFailed::new(FailureKind::Io, err.to_string()))?;
    report_info!(
        "Saved report tenant={} bytes={} path={:?}",
        tenant_id,
        bytes.len(),
        path
    );
    Ok(path)
}
