mod scheduler_jobs;

use crate::{
    api::Api,
    network::{EmailTransport, EmailTransportError},
    scheduler::scheduler_jobs::WorkflowsRunJob,
};
use std::sync::Arc;
use tokio_cron_scheduler::JobScheduler;
use tracing::{debug, info};

/// Defines a scheduler that periodically runs the workflow steps that are due.
pub struct Scheduler<ET: EmailTransport> {
    pub inner_scheduler: JobScheduler,
    pub api: Arc<Api<ET>>,
}

impl<ET: EmailTransport> Scheduler<ET>
where
    ET::Error: EmailTransportError,
{
    /// Starts the scheduler with all the jobs. Workflow state lives in the database, so the jobs
    /// themselves aren't persisted and are re-created on every start.
    pub async fn start(api: Arc<Api<ET>>) -> anyhow::Result<Self> {
        let scheduler = Self {
            inner_scheduler: JobScheduler::new().await?,
            api,
        };

        if !scheduler.api.config.scheduler.enabled {
            info!("Scheduler is disabled, workflow steps won't be executed by this instance.");
            return Ok(scheduler);
        }

        let job_id = scheduler
            .inner_scheduler
            .add(WorkflowsRunJob::create(scheduler.api.clone())?)
            .await?;
        debug!(job.id = %job_id, "Scheduled workflows run job.");

        scheduler.inner_scheduler.start().await?;

        Ok(scheduler)
    }

    /// Stops the scheduler and all its jobs.
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        Ok(self.inner_scheduler.shutdown().await?)
    }
}
