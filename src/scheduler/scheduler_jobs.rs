mod workflows_run_job;

pub(crate) use workflows_run_job::WorkflowsRunJob;
