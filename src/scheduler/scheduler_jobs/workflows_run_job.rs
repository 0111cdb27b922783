use crate::{
    api::Api,
    network::{EmailTransport, EmailTransportError},
};
use anyhow::Context;
use std::{sync::Arc, time::Instant};
use tokio::sync::Mutex;
use tokio_cron_scheduler::Job;
use tracing::{debug, error, info, trace};

/// Defines a maximum number of workflow steps that can be executed during a single job tick.
const MAX_STEPS_TO_EXECUTE: usize = 100;

/// The job run on a regular interval to check if there are any workflow steps that are due.
pub(crate) struct WorkflowsRunJob;
impl WorkflowsRunJob {
    /// Creates a new `WorkflowsRunJob` job.
    pub fn create<ET: EmailTransport>(api: Arc<Api<ET>>) -> anyhow::Result<Job>
    where
        ET::Error: EmailTransportError,
    {
        let schedule = api.config.scheduler.workflows_run.clone();
        // Ticks must not overlap, otherwise the same step can be picked up twice.
        let run_lock = Arc::new(Mutex::new(()));
        Job::new_async(schedule.clone(), move |_, _| {
            let api = api.clone();
            let run_lock = run_lock.clone();
            Box::pin(async move {
                let Ok(_run_guard) = run_lock.try_lock_owned() else {
                    debug!("Previous workflows run is still in progress, skipping.");
                    return;
                };

                Self::execute(api).await;
            })
        })
        .with_context(|| format!("Cannot create job with `workflows_run` schedule: {schedule}"))
    }

    /// Executes a `WorkflowsRunJob` job, errors are logged and the next tick retries.
    async fn execute<ET: EmailTransport>(api: Arc<Api<ET>>)
    where
        ET::Error: EmailTransportError,
    {
        let execute_start = Instant::now();
        match api
            .workflows()
            .execute_pending_steps(MAX_STEPS_TO_EXECUTE)
            .await
        {
            Ok(executed_steps_count) if executed_steps_count > 0 => {
                info!(
                    "Executed {executed_steps_count} workflow steps ({} elapsed).",
                    humantime::format_duration(execute_start.elapsed())
                );
            }
            Ok(_) => {
                trace!(
                    "No pending workflow steps to execute ({} elapsed).",
                    humantime::format_duration(execute_start.elapsed())
                );
            }
            Err(err) => {
                error!(
                    "Failed to execute pending workflow steps ({} elapsed): {err:?}",
                    humantime::format_duration(execute_start.elapsed())
                );
            }
        }
    }
}
