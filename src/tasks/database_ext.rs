mod raw_task;

use crate::{database::Database, tasks::Task};
use raw_task::RawTask;
use sqlx::{query_as, Pool, Postgres};

/// A database extension for the read-only access to the tasks owned by the task management
/// application.
pub struct TasksDatabaseExt<'pool> {
    pool: &'pool Pool<Postgres>,
}

impl<'pool> TasksDatabaseExt<'pool> {
    pub fn new(pool: &'pool Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Retrieves task with the specified ID along with its assignee and project. Returns `None`
    /// if the task doesn't exist (e.g. it was deleted).
    pub async fn get_task(&self, id: &str) -> anyhow::Result<Option<Task>> {
        query_as::<_, RawTask>(
            r#"
SELECT t.id, t.title, t.description, t.status, t.priority, t.due_date,
       u.id AS assignee_id, u.name AS assignee_name, u.email AS assignee_email,
       p.id AS project_id, p.name AS project_name
FROM tasks t
LEFT JOIN users u ON u.id = t.assignee_id
LEFT JOIN projects p ON p.id = t.project_id
WHERE t.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(Task::try_from)
        .transpose()
    }
}

impl Database {
    /// Returns a database extension for the tasks operations.
    pub fn tasks(&self) -> TasksDatabaseExt<'_> {
        TasksDatabaseExt::new(&self.pool)
    }
}

/// Tasks are written by the task management application only, these helpers emulate it in tests.
#[cfg(test)]
impl TasksDatabaseExt<'_> {
    /// Inserts or fully replaces the task, its assignee and its project.
    pub async fn upsert_task(&self, task: &Task) -> anyhow::Result<()> {
        if let Some(ref project) = task.project {
            sqlx::query(
                r#"INSERT INTO projects (id, name) VALUES ($1, $2) ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name"#,
            )
            .bind(&project.id)
            .bind(&project.name)
            .execute(self.pool)
            .await?;
        } else {
            anyhow::bail!("Task must belong to a project.");
        }

        if let Some(ref assignee) = task.assignee {
            sqlx::query(
                r#"INSERT INTO users (id, name, email) VALUES ($1, $2, $3) ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, email = EXCLUDED.email"#,
            )
            .bind(&assignee.id)
            .bind(&assignee.name)
            .bind(&assignee.email)
            .execute(self.pool)
            .await?;
        }

        sqlx::query(
            r#"
INSERT INTO tasks (id, project_id, title, description, status, priority, assignee_id, due_date)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
ON CONFLICT (id) DO UPDATE
SET project_id = EXCLUDED.project_id, title = EXCLUDED.title, description = EXCLUDED.description,
    status = EXCLUDED.status, priority = EXCLUDED.priority, assignee_id = EXCLUDED.assignee_id,
    due_date = EXCLUDED.due_date, updated_at = NOW()
            "#,
        )
        .bind(&task.id)
        .bind(task.project.as_ref().map(|project| project.id.as_str()))
        .bind(&task.title)
        .bind(task.description.as_deref())
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.assignee.as_ref().map(|assignee| assignee.id.as_str()))
        .bind(task.due_date)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove_task(&self, id: &str) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM tasks WHERE id = $1"#)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        database::Database,
        tasks::{tests::mock_task, TaskPriority, TaskStatus},
    };
    use insta::assert_debug_snapshot;
    use sqlx::PgPool;
    use time::OffsetDateTime;

    #[sqlx::test]
    async fn can_retrieve_task(pool: PgPool) -> anyhow::Result<()> {
        let db = Database::create(pool).await?;
        assert!(db.tasks().get_task("task-1").await?.is_none());

        let task = mock_task(
            "task-1",
            Some(OffsetDateTime::from_unix_timestamp(946720800)?),
        );
        db.tasks().upsert_task(&task).await?;

        assert_debug_snapshot!(db.tasks().get_task("task-1").await?, @r###"
        Some(
            Task {
                id: "task-1",
                title: "Migrate billing to v2",
                description: Some(
                    "Move all invoices to the new billing service.",
                ),
                due_date: Some(
                    2000-01-01 10:00:00.0 +00:00:00,
                ),
                priority: Medium,
                status: Todo,
                assignee: Some(
                    TaskAssignee {
                        id: "user-1",
                        name: "Dev",
                        email: "dev@flowgrid.dev",
                    },
                ),
                project: Some(
                    TaskProject {
                        id: "project-1",
                        name: "Platform",
                    },
                ),
            },
        )
        "###);
        assert!(db.tasks().get_task("task-2").await?.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn reflects_task_updates(pool: PgPool) -> anyhow::Result<()> {
        let db = Database::create(pool).await?;

        let task = mock_task("task-1", None);
        db.tasks().upsert_task(&task).await?;
        assert_eq!(db.tasks().get_task("task-1").await?, Some(task.clone()));

        let task = crate::tasks::Task {
            status: TaskStatus::Done,
            priority: TaskPriority::High,
            assignee: None,
            ..task
        };
        db.tasks().upsert_task(&task).await?;
        assert_eq!(db.tasks().get_task("task-1").await?, Some(task));

        db.tasks().remove_task("task-1").await?;
        assert!(db.tasks().get_task("task-1").await?.is_none());

        Ok(())
    }
}
