use crate::tasks::{Task, TaskAssignee, TaskProject};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Eq, PartialEq, Clone, FromRow)]
pub(super) struct RawTask {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<OffsetDateTime>,
    pub assignee_id: Option<String>,
    pub assignee_name: Option<String>,
    pub assignee_email: Option<String>,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
}

impl TryFrom<RawTask> for Task {
    type Error = anyhow::Error;

    fn try_from(raw_task: RawTask) -> Result<Self, Self::Error> {
        let assignee = match (
            raw_task.assignee_id,
            raw_task.assignee_name,
            raw_task.assignee_email,
        ) {
            (Some(id), Some(name), Some(email)) => Some(TaskAssignee { id, name, email }),
            _ => None,
        };

        let project = match (raw_task.project_id, raw_task.project_name) {
            (Some(id), Some(name)) => Some(TaskProject { id, name }),
            _ => None,
        };

        Ok(Task {
            id: raw_task.id,
            title: raw_task.title,
            description: raw_task.description,
            due_date: raw_task.due_date,
            priority: raw_task.priority.parse()?,
            status: raw_task.status.parse()?,
            assignee,
            project,
        })
    }
}
