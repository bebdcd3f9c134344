use crate::{BatchId, TenantId};

/// Progress of the active run. `current <= total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationProgress {
    current: usize,
    total: usize,
}

impl GenerationProgress {
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.current == self.total
    }

    /// 1-indexed position of the item being processed, capped at `total`.
    pub fn display_position(&self) -> usize {
        (self.current + 1).min(self.total)
    }

    fn advance(&mut self) -> bool {
        if self.current < self.total {
            self.current += 1;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    Ready { preview: String, download: String },
    Failed { reason: String },
}

/// One entry of the results log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportResult {
    pub tenant_id: TenantId,
    pub display_name: String,
    pub status: ReportStatus,
}

impl ReportResult {
    pub fn ready(
        tenant_id: impl Into<TenantId>,
        display_name: impl Into<String>,
        preview: impl Into<String>,
        download: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            display_name: display_name.into(),
            status: ReportStatus::Ready {
                preview: preview.into(),
                download: download.into(),
            },
        }
    }

    pub fn failed(
        tenant_id: impl Into<TenantId>,
        display_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            display_name: display_name.into(),
            status: ReportStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn preview(&self) -> Option<&str> {
        match &self.status {
            ReportStatus::Ready { preview, .. } => Some(preview),
            ReportStatus::Failed { .. } => None,
        }
    }

    pub fn download(&self) -> Option<&str> {
        match &self.status {
            ReportStatus::Ready { download, .. } => Some(download),
            ReportStatus::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ReportStatus::Failed { .. })
    }
}

/// Generation state of the latest batch: flag, progress and results log.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationRun {
    batch_id: Option<BatchId>,
    last_batch_id: BatchId,
    tenants: Vec<TenantId>,
    progress: GenerationProgress,
    results: Vec<ReportResult>,
    generating: bool,
}

impl GenerationRun {
    /// Starts a new batch over `tenants`, clearing the previous results.
    pub(crate) fn begin(&mut self, tenants: Vec<TenantId>) -> BatchId {
        self.last_batch_id += 1;
        self.batch_id = Some(self.last_batch_id);
        self.progress = GenerationProgress::new(tenants.len());
        self.tenants = tenants;
        self.results.clear();
        self.generating = true;
        self.last_batch_id
    }

    /// Appends a completed item. Events for another batch, or arriving after
    /// the run finished, are rejected.
    pub(crate) fn record(&mut self, batch_id: BatchId, result: ReportResult) -> bool {
        if !self.accepts(batch_id) {
            return false;
        }
        if !self.progress.advance() {
            return false;
        }
        self.results.push(result);
        true
    }

    /// Ends the run. Tenants that never reported are logged as failures so
    /// the results log always covers the whole batch.
    pub(crate) fn finish(
        &mut self,
        batch_id: BatchId,
        display_name: impl Fn(&str) -> String,
    ) -> bool {
        if !self.accepts(batch_id) {
            return false;
        }
        let reported = self.results.len();
        let missing: Vec<TenantId> = self.tenants.iter().skip(reported).cloned().collect();
        for tenant_id in missing {
            let name = display_name(&tenant_id);
            self.progress.advance();
            self.results
                .push(ReportResult::failed(tenant_id, name, "report was not generated"));
        }
        self.generating = false;
        true
    }

    /// Drops the active run entirely. Returns the batch that was still in
    /// flight, if any.
    pub(crate) fn abandon(&mut self) -> Option<BatchId> {
        let in_flight = if self.generating { self.batch_id } else { None };
        self.batch_id = None;
        self.tenants.clear();
        self.progress = GenerationProgress::default();
        self.results.clear();
        self.generating = false;
        in_flight
    }

    fn accepts(&self, batch_id: BatchId) -> bool {
        self.generating && self.batch_id == Some(batch_id)
    }

    pub fn batch_id(&self) -> Option<BatchId> {
        self.batch_id
    }

    pub fn has_started(&self) -> bool {
        self.batch_id.is_some()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn progress(&self) -> GenerationProgress {
        self.progress
    }

    pub fn results(&self) -> &[ReportResult] {
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<TenantId> {
        list.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn display_position_is_capped_at_total() {
        let mut progress = GenerationProgress::new(2);
        assert_eq!(progress.display_position(), 1);
        progress.advance();
        assert_eq!(progress.display_position(), 2);
        progress.advance();
        assert_eq!(progress.display_position(), 2);
        assert!(!progress.advance());
        assert_eq!(progress.current(), 2);
    }

    #[test]
    fn empty_progress_displays_zero() {
        assert_eq!(GenerationProgress::new(0).display_position(), 0);
    }

    #[test]
    fn record_rejects_other_batches() {
        let mut run = GenerationRun::default();
        let first = run.begin(ids(&["a.com"]));
        run.finish(first, str::to_string);
        let second = run.begin(ids(&["b.com"]));

        assert!(!run.record(first, ReportResult::failed("a.com", "A", "late")));
        assert!(run.record(second, ReportResult::ready("b.com", "B", "/p", "/d")));
        assert_eq!(run.results().len(), 1);
    }

    #[test]
    fn finish_fills_unreported_tenants() {
        let mut run = GenerationRun::default();
        let batch = run.begin(ids(&["a.com", "b.com", "c.com"]));
        run.record(batch, ReportResult::ready("a.com", "A", "/p/a", "/d/a"));

        assert!(run.finish(batch, |id| id.to_uppercase()));

        assert!(!run.is_generating());
        assert_eq!(run.progress().current(), 3);
        let names: Vec<_> = run.results().iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, ["A", "B.COM", "C.COM"]);
        assert!(run.results()[1].is_failed());
    }

    #[test]
    fn abandon_reports_only_in_flight_batches() {
        let mut run = GenerationRun::default();
        let batch = run.begin(ids(&["a.com"]));
        assert_eq!(run.abandon(), Some(batch));
        assert!(!run.has_started());

        let batch = run.begin(ids(&["a.com"]));
        run.finish(batch, str::to_string);
        assert_eq!(run.abandon(), None);
    }
}
