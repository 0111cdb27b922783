mod step_retry_strategy;
mod workflow_step_config;

use serde::{Deserialize, Serialize};

pub use self::{
    step_retry_strategy::StepRetryStrategy, workflow_step_config::WorkflowStepConfig,
};

/// Configuration for the workflow steps, grouped by the kind of work the step performs.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct WorkflowsConfig {
    /// Configuration for the assignee notification and reminder steps.
    pub notifications: WorkflowStepConfig,
    /// Configuration for the standalone email delivery steps (e.g. failure reports).
    pub email: WorkflowStepConfig,
}
