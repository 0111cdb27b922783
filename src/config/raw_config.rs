use crate::config::{DatabaseConfig, SchedulerJobsConfig, SmtpConfig, WorkflowsConfig};
use figment::{providers, providers::Format, Figment};
use serde::{Deserialize, Serialize};
use url::Url;

/// Raw configuration structure that is used to read the configuration from the file.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RawConfig {
    /// Defines a TCP port to listen on.
    pub port: u16,
    /// External/public URL through which the task management application is accessed. Used to
    /// build links to tasks when assignment event doesn't specify the origin.
    pub public_url: Url,
    /// Database configuration.
    pub db: DatabaseConfig,
    /// Configuration for the scheduler jobs.
    pub scheduler: SchedulerJobsConfig,
    /// Configuration for the workflow steps.
    pub workflows: WorkflowsConfig,
    /// Configuration for the SMTP functionality.
    pub smtp: Option<SmtpConfig>,
}

impl RawConfig {
    /// Reads the configuration from the file (TOML) and merges it with the default values and
    /// `FLOWGRID_` prefixed environment variables (e.g. `FLOWGRID_DB__HOST`).
    pub fn read_from_file(path: &str) -> anyhow::Result<Self> {
        Ok(
            Figment::from(providers::Serialized::defaults(Self::default()))
                .merge(providers::Toml::file(path))
                .merge(providers::Env::prefixed("FLOWGRID_").split("__"))
                .extract()?,
        )
    }
}

impl Default for RawConfig {
    fn default() -> Self {
        let port = 7676;
        Self {
            port,
            public_url: Url::parse(&format!("http://localhost:{port}"))
                .expect("Cannot parse public URL parameter."),
            db: Default::default(),
            scheduler: Default::default(),
            workflows: Default::default(),
            smtp: None,
        }
    }
}
