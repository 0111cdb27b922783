use crate::workflows::WorkflowStep;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Eq, PartialEq, Clone, FromRow)]
pub(super) struct RawWorkflowStep {
    pub id: Uuid,
    pub workflow_id: Option<Uuid>,
    pub step_type: Vec<u8>,
    pub tags: Vec<String>,
    pub scheduled_at: OffsetDateTime,
    pub retry_attempt: Option<i32>,
}

impl TryFrom<RawWorkflowStep> for WorkflowStep {
    type Error = anyhow::Error;

    fn try_from(raw_step: RawWorkflowStep) -> Result<Self, Self::Error> {
        Ok(WorkflowStep {
            id: raw_step.id,
            workflow_id: raw_step.workflow_id,
            step_type: postcard::from_bytes(&raw_step.step_type)?,
            tags: raw_step.tags,
            scheduled_at: raw_step.scheduled_at,
            retry_attempt: raw_step.retry_attempt.map(u32::try_from).transpose()?,
        })
    }
}

impl TryFrom<&WorkflowStep> for RawWorkflowStep {
    type Error = anyhow::Error;

    fn try_from(step: &WorkflowStep) -> Result<Self, Self::Error> {
        Ok(RawWorkflowStep {
            id: step.id,
            workflow_id: step.workflow_id,
            step_type: postcard::to_stdvec(&step.step_type)?,
            tags: step.tags.clone(),
            scheduled_at: step.scheduled_at,
            retry_attempt: step.retry_attempt.map(i32::try_from).transpose()?,
        })
    }
}
