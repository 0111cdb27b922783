use serde::{Deserialize, Serialize};

/// Configuration for the scheduler and its jobs.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SchedulerJobsConfig {
    /// Indicates whether the scheduler should be started at all.
    pub enabled: bool,
    /// The schedule (6-field cron expression) of the job that executes pending workflow steps.
    pub workflows_run: String,
}

impl Default for SchedulerJobsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            workflows_run: "0/10 * * * * *".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SchedulerJobsConfig;
    use insta::assert_toml_snapshot;

    #[test]
    fn serialization_and_default() {
        assert_toml_snapshot!(SchedulerJobsConfig::default(), @r###"
        enabled = true
        workflows_run = '0/10 * * * * *'
        "###);
    }

    #[test]
    fn deserialization() -> anyhow::Result<()> {
        let config: SchedulerJobsConfig = toml::from_str(
            r#"
        enabled = false
        workflows_run = '0 * * * * *'
    "#,
        )?;
        assert_eq!(
            config,
            SchedulerJobsConfig {
                enabled: false,
                workflows_run: "0 * * * * *".to_string(),
            }
        );

        Ok(())
    }
}
