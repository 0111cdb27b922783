mod raw_workflow;
mod raw_workflow_step;

use crate::{database::Database, workflows::WorkflowStep};
use async_stream::try_stream;
use flowgrid_types::workflows::Workflow;
use futures::Stream;
use raw_workflow::RawWorkflow;
use raw_workflow_step::RawWorkflowStep;
use sqlx::{query, query_as, Pool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

/// A database extension for the workflow-related operations.
pub struct WorkflowsDatabaseExt<'pool> {
    pool: &'pool Pool<Postgres>,
}

impl<'pool> WorkflowsDatabaseExt<'pool> {
    pub fn new(pool: &'pool Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Retrieves workflow from the database using ID.
    pub async fn get_workflow(&self, id: Uuid) -> anyhow::Result<Option<Workflow>> {
        query_as::<_, RawWorkflow>(
            r#"SELECT id, task_id, origin, state, remind_at, created_at, updated_at FROM workflows WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(Workflow::try_from)
        .transpose()
    }

    /// Updates state and reminder time of the existing workflow.
    pub async fn update_workflow(&self, workflow: &Workflow) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;
        update_workflow(&mut conn, workflow).await
    }

    /// Retrieves workflow step from the database using ID.
    pub async fn get_workflow_step(&self, id: Uuid) -> anyhow::Result<Option<WorkflowStep>> {
        query_as::<_, RawWorkflowStep>(
            r#"SELECT id, workflow_id, step_type, tags, scheduled_at, retry_attempt FROM workflow_steps WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(WorkflowStep::try_from)
        .transpose()
    }

    /// Updates schedule and retry attempt of the existing workflow step.
    pub async fn update_workflow_step(&self, step: &WorkflowStep) -> anyhow::Result<()> {
        let raw_step = RawWorkflowStep::try_from(step)?;
        query(
            r#"UPDATE workflow_steps SET step_type = $2, tags = $3, scheduled_at = $4, retry_attempt = $5 WHERE id = $1"#,
        )
        .bind(raw_step.id)
        .bind(raw_step.step_type)
        .bind(raw_step.tags)
        .bind(raw_step.scheduled_at)
        .bind(raw_step.retry_attempt)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a new workflow along with its first step in a single transaction.
    pub async fn start_workflow(
        &self,
        workflow: &Workflow,
        first_step: &WorkflowStep,
    ) -> anyhow::Result<()> {
        let raw_workflow = RawWorkflow::try_from(workflow)?;

        let mut tx = self.pool.begin().await?;
        query(
            r#"
INSERT INTO workflows (id, task_id, origin, state, remind_at, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(raw_workflow.id)
        .bind(raw_workflow.task_id)
        .bind(raw_workflow.origin)
        .bind(raw_workflow.state)
        .bind(raw_workflow.remind_at)
        .bind(raw_workflow.created_at)
        .bind(raw_workflow.updated_at)
        .execute(&mut *tx)
        .await?;
        insert_workflow_step(&mut tx, first_step).await?;

        Ok(tx.commit().await?)
    }

    /// Removes the executed (or abandoned) step and, in the same transaction, records the new
    /// workflow state and queues the follow-up step, if any.
    pub async fn complete_workflow_step(
        &self,
        step_id: Uuid,
        workflow: Option<&Workflow>,
        next_step: Option<&WorkflowStep>,
    ) -> anyhow::Result<()> {
        let mut tx: Transaction<'_, Postgres> = self.pool.begin().await?;
        query(r#"DELETE FROM workflow_steps WHERE id = $1"#)
            .bind(step_id)
            .execute(&mut *tx)
            .await?;

        if let Some(workflow) = workflow {
            update_workflow(&mut tx, workflow).await?;
        }

        if let Some(next_step) = next_step {
            insert_workflow_step(&mut tx, next_step).await?;
        }

        Ok(tx.commit().await?)
    }

    /// Retrieves IDs of the workflow steps that are scheduled at or before the specified date,
    /// ordered by the schedule.
    pub fn get_workflow_steps_ids(
        &self,
        scheduled_before_or_at: OffsetDateTime,
        page_size: usize,
    ) -> impl Stream<Item = anyhow::Result<Uuid>> + 'pool {
        let pool = self.pool;
        let page_limit = page_size as i64;
        try_stream! {
            let mut last_key: Option<(OffsetDateTime, Uuid)> = None;
            loop {
                let raw_steps = query_as::<_, (Uuid, OffsetDateTime)>(
                    r#"
SELECT id, scheduled_at FROM workflow_steps
WHERE scheduled_at <= $1 AND ($2::timestamptz IS NULL OR (scheduled_at, id) > ($2::timestamptz, $3::uuid))
ORDER BY scheduled_at, id
LIMIT $4
                    "#,
                )
                .bind(scheduled_before_or_at)
                .bind(last_key.map(|(scheduled_at, _)| scheduled_at))
                .bind(last_key.map(|(_, id)| id).unwrap_or_else(Uuid::nil))
                .bind(page_limit)
                .fetch_all(pool)
                .await?;

                let is_last_page = raw_steps.is_empty() || raw_steps.len() < page_size;
                for (id, scheduled_at) in raw_steps {
                    last_key = Some((scheduled_at, id));
                    yield id;
                }

                if is_last_page {
                    break;
                }
            }
        }
    }
}

async fn update_workflow(
    conn: &mut sqlx::PgConnection,
    workflow: &Workflow,
) -> anyhow::Result<()> {
    let raw_workflow = RawWorkflow::try_from(workflow)?;
    query(r#"UPDATE workflows SET state = $2, remind_at = $3, updated_at = $4 WHERE id = $1"#)
        .bind(raw_workflow.id)
        .bind(raw_workflow.state)
        .bind(raw_workflow.remind_at)
        .bind(raw_workflow.updated_at)
        .execute(conn)
        .await?;

    Ok(())
}

async fn insert_workflow_step(
    conn: &mut sqlx::PgConnection,
    step: &WorkflowStep,
) -> anyhow::Result<()> {
    let raw_step = RawWorkflowStep::try_from(step)?;
    query(
        r#"
INSERT INTO workflow_steps (id, workflow_id, step_type, tags, scheduled_at, retry_attempt)
VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(raw_step.id)
    .bind(raw_step.workflow_id)
    .bind(raw_step.step_type)
    .bind(raw_step.tags)
    .bind(raw_step.scheduled_at)
    .bind(raw_step.retry_attempt)
    .execute(conn)
    .await?;

    Ok(())
}

/// Steps are only ever queued by the workflows themselves, tests queue and drop them directly.
#[cfg(test)]
impl WorkflowsDatabaseExt<'_> {
    /// Inserts a new workflow step to the database.
    pub async fn insert_workflow_step(&self, step: &WorkflowStep) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;
        insert_workflow_step(&mut conn, step).await
    }

    /// Removes workflow step from the database using ID.
    pub async fn remove_workflow_step(&self, id: Uuid) -> anyhow::Result<()> {
        query(r#"DELETE FROM workflow_steps WHERE id = $1"#)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

impl Database {
    /// Returns a database extension for the workflow operations.
    pub fn workflows(&self) -> WorkflowsDatabaseExt<'_> {
        WorkflowsDatabaseExt::new(&self.pool)
    }
}
