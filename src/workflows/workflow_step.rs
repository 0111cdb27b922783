use crate::workflows::WorkflowStepType;
use time::OffsetDateTime;
use uuid::Uuid;

/// Single durable step of the workflow waiting in the queue to be executed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WorkflowStep {
    /// Unique id of the step (UUIDv7).
    pub id: Uuid,
    /// ID of the workflow the step belongs to, if any (standalone email steps don't belong to any
    /// workflow).
    pub workflow_id: Option<Uuid>,
    pub step_type: WorkflowStepType,
    /// Arbitrary tags attached to the step, used for logging only.
    pub tags: Vec<String>,
    /// The time at which the step is scheduled to be executed, in UTC.
    pub scheduled_at: OffsetDateTime,
    /// Number of retries made so far, if the step failed before.
    pub retry_attempt: Option<u32>,
}
