mod database_config;
mod raw_config;
mod scheduler_jobs_config;
mod smtp_config;
mod workflows_config;

use url::Url;

pub use self::{
    database_config::DatabaseConfig,
    raw_config::RawConfig,
    scheduler_jobs_config::SchedulerJobsConfig,
    smtp_config::SmtpConfig,
    workflows_config::{StepRetryStrategy, WorkflowsConfig},
};

#[cfg(test)]
pub use self::{smtp_config::SmtpCatchAllConfig, workflows_config::WorkflowStepConfig};

/// Main server config.
#[derive(Clone, Debug)]
pub struct Config {
    /// External/public URL of the task management application.
    pub public_url: Url,
    /// Database configuration.
    #[allow(dead_code)]
    pub db: DatabaseConfig,
    /// Configuration for the SMTP functionality.
    pub smtp: Option<SmtpConfig>,
    /// Configuration for the scheduler jobs.
    pub scheduler: SchedulerJobsConfig,
    /// Configuration for the workflow steps.
    pub workflows: WorkflowsConfig,
}

impl AsRef<Config> for Config {
    fn as_ref(&self) -> &Config {
        self
    }
}

impl From<RawConfig> for Config {
    fn from(raw_config: RawConfig) -> Self {
        Self {
            public_url: raw_config.public_url,
            db: raw_config.db,
            smtp: raw_config.smtp,
            scheduler: raw_config.scheduler,
            workflows: raw_config.workflows,
        }
    }
}
