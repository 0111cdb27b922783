use crate::workflows::EmailStepType;
use flowgrid_types::workflows::AssignmentEvent;
use serde::{Deserialize, Serialize};

/// Type of the workflow step along with the data required to execute it. Variants are stored
/// postcard-encoded, new variants must be appended to the end.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowStepType {
    /// Fetches the task, notifies the assignee and arms the due date reminder.
    NotifyAssignee(AssignmentEvent),
    /// Re-fetches the task and sends the due date reminder unless the task is done or deleted.
    RemindAssignee(AssignmentEvent),
    Email(EmailStepType),
}

impl WorkflowStepType {
    /// Returns a short tag of the step type used in logs and reports.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::NotifyAssignee(_) => "notify_assignee",
            Self::RemindAssignee(_) => "remind_assignee",
            Self::Email(_) => "email",
        }
    }
}
