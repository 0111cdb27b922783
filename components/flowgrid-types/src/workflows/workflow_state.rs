use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// State of the task assignment notification workflow.
///
/// `STARTED → TASK_FETCHED → ASSIGNMENT_EMAIL_SENT → (REMINDER_SCHEDULED | NO_REMINDER_NEEDED)
/// → WAITING → (REMINDER_SUPPRESSED | REMINDER_SENT)`, with `NO_ASSIGNEE` as an early exit right
/// after `STARTED`. `FAILED` is set by the step runner once all retries of a step are exhausted.
#[derive(Debug, Copy, Clone, Deserialize, Serialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    Started,
    TaskFetched,
    AssignmentEmailSent,
    ReminderScheduled,
    NoReminderNeeded,
    Waiting,
    ReminderSuppressed,
    ReminderSent,
    /// Task doesn't exist or doesn't have an assignee.
    NoAssignee,
    Failed,
}

impl WorkflowState {
    /// Indicates whether the workflow cannot transition to any other state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::NoAssignee
                | Self::NoReminderNeeded
                | Self::ReminderSuppressed
                | Self::ReminderSent
                | Self::Failed
        )
    }
}
