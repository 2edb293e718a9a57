//! Background worker draining the collection job queue.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::CollectorService;
use crate::domain::collect_job::CollectJob;
use crate::domain::repositories::MirrorRepository;

/// Executes queued jobs one after another until every sender is dropped.
///
/// The summary of each run is only logged; nobody awaits it.
pub async fn run_collect_worker<M>(
    mut rx: mpsc::Receiver<CollectJob>,
    collector: Arc<CollectorService<M>>,
) where
    M: MirrorRepository + 'static,
{
    while let Some(job) = rx.recv().await {
        let kind = job.kind();
        tracing::info!(job = kind, "Collect job started");

        let summary = match job {
            CollectJob::All { limit } => collector.collect_all(limit).await,
            CollectJob::Batch {
                configs,
                limit,
                strategy,
            } => collector.collect_batch(configs, limit, strategy).await,
        };

        tracing::info!(
            job = kind,
            created = summary.created,
            updated = summary.updated,
            merchants = summary.merchants_count,
            "Collect job finished"
        );
    }

    tracing::info!("Collect worker stopped");
}
