//! Fan-out: apply an action to every pipeline of a project

use freeze_client::{ClientError, CodefreshGateway};
use freeze_core::dto::pipeline::{ListPipelinesParams, Pipelines};
use futures::future::join_all;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::report::{FanOutReport, PipelineReport};
use crate::{Action, TriggerOrchestrator};

/// Cursor over the pipelines of a project
///
/// Requests one page at a time until the offset reaches the total count
/// reported by the service. The offset advances by the requested page size,
/// or by the number of documents returned when the page size is 0
/// (unbounded). Pages are not cached; once exhausted the pager stays done.
pub struct PipelinePager<'a> {
    gateway: &'a dyn CodefreshGateway,
    project_id: String,
    limit: u64,
    offset: u64,
    done: bool,
}

impl<'a> PipelinePager<'a> {
    pub fn new(gateway: &'a dyn CodefreshGateway, project_id: impl Into<String>, limit: u64) -> Self {
        Self {
            gateway,
            project_id: project_id.into(),
            limit,
            offset: 0,
            done: false,
        }
    }

    /// Offset of the next page to request
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Fetches the next page, or `None` once every page was returned
    pub async fn next_page(&mut self) -> std::result::Result<Option<Pipelines>, ClientError> {
        if self.done {
            return Ok(None);
        }

        let params = ListPipelinesParams::for_project(&self.project_id, self.offset, self.limit);
        let page = self.gateway.list_pipelines(&params).await?;

        let advance = if self.limit == 0 {
            page.docs.len() as u64
        } else {
            self.limit
        };
        self.offset += advance;
        // An empty unbounded page would never move the offset
        self.done = self.offset >= page.count || advance == 0;

        debug!(
            "Project {}: fetched {} pipelines (next offset {}, total {})",
            self.project_id,
            page.docs.len(),
            self.offset,
            page.count
        );

        Ok(Some(page))
    }
}

impl TriggerOrchestrator {
    /// Applies `action` to every pipeline of a project
    ///
    /// Pipelines of a page are processed concurrently and the whole page
    /// completes before the next one is requested. A failure on any pipeline
    /// stops the run once its page has finished.
    pub async fn fan_out(&self, project_id: &str, action: Action) -> Result<FanOutReport> {
        let mut pager = PipelinePager::new(self.gateway.as_ref(), project_id, self.config.page_size);
        let mut report = FanOutReport::new(project_id);

        while let Some(page) = pager.next_page().await? {
            report.pages += 1;
            info!(
                "Project {}: applying {} to {} pipelines (page {})",
                project_id,
                action,
                page.docs.len(),
                report.pages
            );

            let results = join_all(page.docs.iter().map(|p| self.apply(p.id(), action))).await;

            let mut failure = None;
            for (pipeline, result) in page.docs.iter().zip(results) {
                match result {
                    Ok(outcome) => report.pipelines.push(PipelineReport {
                        pipeline_id: pipeline.id().to_string(),
                        outcome,
                    }),
                    Err(e) => {
                        error!("Pipeline {}: {} failed: {}", pipeline.id(), action, e);
                        if failure.is_none() {
                            failure = Some(e);
                        }
                    }
                }
            }

            if let Some(e) = failure {
                return Err(e);
            }
        }

        let changed = report
            .pipelines
            .iter()
            .filter(|p| !p.outcome.is_noop())
            .count();
        info!(
            "Project {}: {} applied to {} pipelines, {} changed",
            project_id,
            action,
            report.pipelines.len(),
            changed
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::PipelinePager;
    use crate::fake::{Call, FakeGateway, pipeline};
    use crate::{Action, OrchestratorConfig, TriggerOrchestrator};

    fn project_with(gateway: &FakeGateway, project_id: &str, count: usize) {
        for i in 0..count {
            let mut p = pipeline(&format!("p{:02}", i), &[("g1", false)], None);
            p.metadata.project_id = Some(project_id.to_string());
            gateway.add_pipeline(p);
        }
    }

    fn page_requests(gateway: &FakeGateway) -> Vec<(u64, u64)> {
        gateway
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ListPipelines { offset, limit, .. } => Some((offset, limit)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_fan_out_pages_until_count() {
        let gateway = Arc::new(FakeGateway::new());
        project_with(&gateway, "proj", 45);
        let orchestrator = TriggerOrchestrator::new(gateway.clone(), OrchestratorConfig::default());

        let report = orchestrator.fan_out("proj", Action::Suspend).await.unwrap();

        assert_eq!(page_requests(&gateway), vec![(0, 20), (20, 20), (40, 20)]);
        assert_eq!(report.pages, 3);
        assert_eq!(report.pipelines.len(), 45);

        let unique: HashSet<&str> = report
            .pipelines
            .iter()
            .map(|r| r.pipeline_id.as_str())
            .collect();
        assert_eq!(unique.len(), 45);

        let replaces = gateway
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::ReplacePipeline(_)))
            .count();
        assert_eq!(replaces, 45);
    }

    #[tokio::test]
    async fn test_fan_out_ignores_other_projects() {
        let gateway = Arc::new(FakeGateway::new());
        project_with(&gateway, "proj", 3);
        let mut other = pipeline("other", &[("g1", false)], None);
        other.metadata.project_id = Some("elsewhere".to_string());
        gateway.add_pipeline(other);
        let orchestrator = TriggerOrchestrator::new(gateway.clone(), OrchestratorConfig::default());

        let report = orchestrator.fan_out("proj", Action::Suspend).await.unwrap();

        assert_eq!(report.pipelines.len(), 3);
        assert!(!gateway.pipeline("other").spec.triggers[0].disabled);
    }

    #[tokio::test]
    async fn test_empty_project_requests_one_page() {
        let gateway = Arc::new(FakeGateway::new());
        let orchestrator = TriggerOrchestrator::new(gateway.clone(), OrchestratorConfig::default());

        let report = orchestrator.fan_out("proj", Action::Restore).await.unwrap();

        assert_eq!(report.pages, 1);
        assert!(report.pipelines.is_empty());
        assert_eq!(page_requests(&gateway), vec![(0, 20)]);
    }

    #[tokio::test]
    async fn test_unbounded_pages_advance_by_returned_docs() {
        let gateway = Arc::new(FakeGateway::new());
        project_with(&gateway, "proj", 5);
        gateway.cap_page_size(2);

        let mut pager = PipelinePager::new(gateway.as_ref(), "proj", 0);
        let mut seen = 0;
        while let Some(page) = pager.next_page().await.unwrap() {
            seen += page.docs.len();
        }

        assert_eq!(seen, 5);
        assert_eq!(page_requests(&gateway), vec![(0, 0), (2, 0), (4, 0)]);
        assert!(pager.next_page().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unbounded_empty_page_terminates() {
        let gateway = Arc::new(FakeGateway::new());
        project_with(&gateway, "proj", 3);
        gateway.cap_page_size(0);

        let mut pager = PipelinePager::new(gateway.as_ref(), "proj", 0);
        let page = pager.next_page().await.unwrap().unwrap();

        assert!(page.docs.is_empty());
        assert_eq!(page.count, 3);
        assert!(pager.next_page().await.unwrap().is_none());
        assert_eq!(pager.offset(), 0);
    }

    #[tokio::test]
    async fn test_failure_in_page_fails_run_after_siblings() {
        let gateway = Arc::new(FakeGateway::new());
        project_with(&gateway, "proj", 25);
        gateway.fail_replace("p03");
        let orchestrator = TriggerOrchestrator::new(gateway.clone(), OrchestratorConfig::default());

        let err = orchestrator.fan_out("proj", Action::Suspend).await.unwrap_err();

        assert_eq!(err.kind(), "TransportError");
        // Siblings of the first page still ran, the second page was never requested
        assert_eq!(page_requests(&gateway), vec![(0, 20)]);
        assert!(gateway.pipeline("p19").spec.triggers[0].disabled);
        assert!(!gateway.pipeline("p20").spec.triggers[0].disabled);
    }
}
