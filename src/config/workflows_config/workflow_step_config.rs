use crate::config::StepRetryStrategy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a group of workflow steps.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct WorkflowStepConfig {
    /// Defines how the failed step is retried before the workflow is considered failed.
    pub retry_strategy: StepRetryStrategy,
}

impl Default for WorkflowStepConfig {
    fn default() -> Self {
        Self {
            retry_strategy: StepRetryStrategy::Exponential {
                initial_interval: Duration::from_secs(60),
                multiplier: 2,
                max_interval: Duration::from_secs(600),
                max_attempts: 3,
            },
        }
    }
}
