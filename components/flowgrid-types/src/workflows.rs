mod assignment_event;
mod workflow;
mod workflow_state;

pub use self::{
    assignment_event::AssignmentEvent, workflow::Workflow, workflow_state::WorkflowState,
};
