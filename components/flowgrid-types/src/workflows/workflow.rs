use crate::workflows::WorkflowState;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Single instance of the task assignment notification workflow.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Unique workflow id (UUIDv7).
    pub id: Uuid,
    /// ID of the task the workflow was started for.
    pub task_id: String,
    /// Origin the assignment event was emitted from.
    pub origin: String,
    /// Current state of the workflow.
    pub state: WorkflowState,
    /// Date and time when the due date reminder is scheduled to be sent, if any.
    #[serde(
        with = "time::serde::timestamp::option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub remind_at: Option<OffsetDateTime>,
    /// Date and time when the workflow was started.
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
    /// Date and time when the workflow state was last updated.
    #[serde(with = "time::serde::timestamp")]
    pub updated_at: OffsetDateTime,
}
