use anyhow::bail;
use flowgrid_types::workflows::Workflow;
use serde_json::Value;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Eq, PartialEq, Clone, FromRow)]
pub(super) struct RawWorkflow {
    pub id: Uuid,
    pub task_id: String,
    pub origin: String,
    /// Name of the state as it's exposed through the API (e.g. `WAITING`).
    pub state: String,
    pub remind_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<RawWorkflow> for Workflow {
    type Error = anyhow::Error;

    fn try_from(raw_workflow: RawWorkflow) -> Result<Self, Self::Error> {
        Ok(Workflow {
            id: raw_workflow.id,
            task_id: raw_workflow.task_id,
            origin: raw_workflow.origin,
            state: serde_json::from_value(Value::String(raw_workflow.state))?,
            remind_at: raw_workflow.remind_at,
            created_at: raw_workflow.created_at,
            updated_at: raw_workflow.updated_at,
        })
    }
}

impl TryFrom<&Workflow> for RawWorkflow {
    type Error = anyhow::Error;

    fn try_from(workflow: &Workflow) -> Result<Self, Self::Error> {
        Ok(RawWorkflow {
            id: workflow.id,
            task_id: workflow.task_id.clone(),
            origin: workflow.origin.clone(),
            state: match serde_json::to_value(workflow.state)? {
                Value::String(state) => state,
                value => bail!("Workflow state must be serialized as a string: {value}"),
            },
            remind_at: workflow.remind_at,
            created_at: workflow.created_at,
            updated_at: workflow.updated_at,
        })
    }
}
