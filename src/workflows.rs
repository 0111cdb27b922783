mod api_ext;
mod database_ext;
mod email_step_type;
mod workflow_step;
mod workflow_step_type;

pub use self::{
    email_step_type::{EmailStepContent, EmailStepType},
    workflow_step::WorkflowStep,
    workflow_step_type::WorkflowStepType,
};
