use crate::{
    api::Api,
    network::EmailTransport,
    notifications::Email,
    tasks::{Task, TaskAssignee},
};
use serde_json::json;
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime, UtcOffset};
use url::Url;
use uuid::Uuid;

/// Format of the due date in emails, e.g. `January 5, 2000`.
const DUE_DATE_FORMAT: &[FormatItem<'_>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// Content of the notification email rendered from the Handlebars templates.
#[derive(Debug, Clone, Copy)]
pub enum NotificationContentTemplate<'a> {
    /// Sent to the assignee as soon as the task is assigned.
    TaskAssigned {
        task: &'a Task,
        assignee: &'a TaskAssignee,
        origin: &'a str,
    },
    /// Sent to the assignee one day before the task is due.
    TaskReminder {
        task: &'a Task,
        assignee: &'a TaskAssignee,
        origin: &'a str,
    },
    /// Sent to the operators when the workflow step fails after all retries.
    WorkflowStepFailed {
        workflow_id: Option<Uuid>,
        step_type: &'a str,
        step_tags: &'a [String],
        error_message: &'a str,
    },
}

impl NotificationContentTemplate<'_> {
    /// Compiles the template to an email.
    pub fn compile_to_email<ET: EmailTransport>(&self, api: &Api<ET>) -> anyhow::Result<Email> {
        match *self {
            Self::TaskAssigned {
                task,
                assignee,
                origin,
            } => {
                let task_link = task_link(origin, &api.config.public_url, &task.id);
                let due_date = format_due_date(task.due_date)?;
                let mut text = vec![format!(
                    "Hi {}, you have been assigned to \"{}\"{}.",
                    assignee.name,
                    task.title,
                    task.project
                        .as_ref()
                        .map(|project| format!(" in the \"{}\" project", project.name))
                        .unwrap_or_default()
                )];
                if let Some(ref description) = task.description {
                    text.push(format!("Description: {description}"));
                }
                text.push(format!("Due date: {due_date}"));
                text.push(format!("Priority: {}", priority_text(task)));
                text.push(format!("View the task: {task_link}"));

                Ok(Email::html(
                    format!("[Flowgrid] New task assigned: \"{}\"", task.title),
                    text.join("\n"),
                    api.templates.render(
                        "task_assigned_email",
                        &json!({
                            "assignee_name": assignee.name,
                            "task_title": task.title,
                            "task_description": task.description,
                            "project_name": task.project.as_ref().map(|project| &project.name),
                            "due_date": due_date,
                            "priority": task.priority.label(),
                            "is_high_priority": task.priority.is_high(),
                            "task_link": task_link,
                        }),
                    )?,
                ))
            }
            Self::TaskReminder {
                task,
                assignee,
                origin,
            } => {
                let task_link = task_link(origin, &api.config.public_url, &task.id);
                let due_date = format_due_date(task.due_date)?;
                let text = [
                    format!(
                        "Hi {}, this is a reminder that \"{}\" is due soon.",
                        assignee.name, task.title
                    ),
                    format!("Due date: {due_date}"),
                    format!("Priority: {}", priority_text(task)),
                    format!("View the task: {task_link}"),
                ];

                Ok(Email::html(
                    format!("[Flowgrid] Reminder: \"{}\" is due soon", task.title),
                    text.join("\n"),
                    api.templates.render(
                        "task_reminder_email",
                        &json!({
                            "assignee_name": assignee.name,
                            "task_title": task.title,
                            "due_date": due_date,
                            "priority": task.priority.label(),
                            "is_high_priority": task.priority.is_high(),
                            "task_link": task_link,
                        }),
                    )?,
                ))
            }
            Self::WorkflowStepFailed {
                workflow_id,
                step_type,
                step_tags,
                error_message,
            } => {
                let workflow_id = workflow_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let step_tags = step_tags.join(", ");
                Ok(Email::html(
                    format!("[Flowgrid] Workflow step failed: {step_type}"),
                    format!(
                        "Workflow step \"{step_type}\" (workflow: {workflow_id}, tags: {step_tags}) failed with the following error: {error_message}"
                    ),
                    api.templates.render(
                        "workflow_step_failed_email",
                        &json!({
                            "workflow_id": workflow_id,
                            "step_type": step_type,
                            "step_tags": step_tags,
                            "error_message": error_message,
                        }),
                    )?,
                ))
            }
        }
    }
}

/// Builds a link to the task: `<origin>/tasks/<task_id>`. Falls back to the public URL if the
/// origin isn't specified.
fn task_link(origin: &str, public_url: &Url, task_id: &str) -> String {
    let origin = match origin.trim() {
        "" => public_url.as_str(),
        origin => origin,
    };

    format!(
        "{}/tasks/{}",
        origin.trim_end_matches('/'),
        urlencoding::encode(task_id)
    )
}

fn format_due_date(due_date: Option<OffsetDateTime>) -> anyhow::Result<String> {
    Ok(match due_date {
        Some(due_date) => due_date.to_offset(UtcOffset::UTC).format(DUE_DATE_FORMAT)?,
        None => "No due date".to_string(),
    })
}

fn priority_text(task: &Task) -> String {
    if task.priority.is_high() {
        format!("{} (urgent)", task.priority.label())
    } else {
        task.priority.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{format_due_date, task_link, NotificationContentTemplate};
    use crate::{
        notifications::Email,
        tasks::{tests::mock_task, Task, TaskPriority},
        tests::mock_api,
    };
    use insta::assert_debug_snapshot;
    use sqlx::PgPool;
    use time::OffsetDateTime;
    use url::Url;
    use uuid::uuid;

    #[test]
    fn builds_task_link() -> anyhow::Result<()> {
        let public_url = Url::parse("http://localhost:7676")?;
        assert_eq!(
            task_link("https://app.flowgrid.dev", &public_url, "task-1"),
            "https://app.flowgrid.dev/tasks/task-1"
        );
        assert_eq!(
            task_link("https://app.flowgrid.dev/", &public_url, "task 1/2"),
            "https://app.flowgrid.dev/tasks/task%201%2F2"
        );
        assert_eq!(
            task_link("", &public_url, "task-1"),
            "http://localhost:7676/tasks/task-1"
        );

        Ok(())
    }

    #[test]
    fn formats_due_date() -> anyhow::Result<()> {
        assert_eq!(
            format_due_date(Some(OffsetDateTime::from_unix_timestamp(947066400)?))?,
            "January 5, 2000"
        );
        assert_eq!(format_due_date(None)?, "No due date");

        Ok(())
    }

    #[sqlx::test]
    async fn can_compile_task_assigned_template(pool: PgPool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;

        let task = mock_task(
            "task-1",
            Some(OffsetDateTime::from_unix_timestamp(947066400)?),
        );
        let email = NotificationContentTemplate::TaskAssigned {
            task: &task,
            assignee: task.assignee.as_ref().unwrap(),
            origin: "https://app.flowgrid.dev",
        }
        .compile_to_email(&api)?;

        assert_debug_snapshot!((&email.subject, &email.text), @r###"
        (
            "[Flowgrid] New task assigned: \"Migrate billing to v2\"",
            "Hi Dev, you have been assigned to \"Migrate billing to v2\" in the \"Platform\" project.\nDescription: Move all invoices to the new billing service.\nDue date: January 5, 2000\nPriority: Medium\nView the task: https://app.flowgrid.dev/tasks/task-1",
        )
        "###);

        let html = email.html.unwrap_or_default();
        assert!(html.contains("Hi Dev, you have a new task"));
        assert!(html.contains("<td>January 5, 2000</td>"));
        assert!(html.contains(r#"<span class="priority-badge">Medium</span>"#));
        assert!(html.contains(r#"href="https://app.flowgrid.dev/tasks/task-1""#));

        Ok(())
    }

    #[sqlx::test]
    async fn highlights_high_priority_tasks(pool: PgPool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;

        let task = Task {
            priority: TaskPriority::High,
            description: None,
            project: None,
            ..mock_task("task-1", None)
        };
        let email = NotificationContentTemplate::TaskAssigned {
            task: &task,
            assignee: task.assignee.as_ref().unwrap(),
            origin: "",
        }
        .compile_to_email(&api)?;

        assert_eq!(
            email.text,
            "Hi Dev, you have been assigned to \"Migrate billing to v2\".\nDue date: No due date\nPriority: High (urgent)\nView the task: http://localhost:1234/tasks/task-1"
        );
        let html = email.html.unwrap_or_default();
        assert!(html.contains(r#"<span class="priority-badge high">High</span>"#));
        assert!(!html.contains("</b> project"));

        Ok(())
    }

    #[sqlx::test]
    async fn can_compile_task_reminder_template(pool: PgPool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;

        let task = Task {
            title: "<Release> & deploy".to_string(),
            priority: TaskPriority::High,
            ..mock_task(
                "task-1",
                Some(OffsetDateTime::from_unix_timestamp(947066400)?),
            )
        };
        let email = NotificationContentTemplate::TaskReminder {
            task: &task,
            assignee: task.assignee.as_ref().unwrap(),
            origin: "https://app.flowgrid.dev",
        }
        .compile_to_email(&api)?;

        assert_debug_snapshot!((&email.subject, &email.text), @r###"
        (
            "[Flowgrid] Reminder: \"<Release> & deploy\" is due soon",
            "Hi Dev, this is a reminder that \"<Release> & deploy\" is due soon.\nDue date: January 5, 2000\nPriority: High (urgent)\nView the task: https://app.flowgrid.dev/tasks/task-1",
        )
        "###);

        let html = email.html.unwrap_or_default();
        assert!(html.contains("<b>&lt;Release&gt; &amp; deploy</b>"));
        assert!(html.contains(r#"<span class="priority-badge high">High</span>"#));

        Ok(())
    }

    #[sqlx::test]
    async fn can_compile_workflow_step_failed_template(pool: PgPool) -> anyhow::Result<()> {
        let api = mock_api(pool).await?;

        let email = NotificationContentTemplate::WorkflowStepFailed {
            workflow_id: Some(uuid!("00000000-0000-0000-0000-000000000001")),
            step_type: "notify_assignee",
            step_tags: &["task:task-1".to_string()],
            error_message: "SMTP is not available.",
        }
        .compile_to_email(&api)?;

        assert_eq!(
            Email {
                html: None,
                ..email.clone()
            },
            Email::text(
                "[Flowgrid] Workflow step failed: notify_assignee",
                "Workflow step \"notify_assignee\" (workflow: 00000000-0000-0000-0000-000000000001, tags: task:task-1) failed with the following error: SMTP is not available."
            )
        );
        assert!(email
            .html
            .unwrap_or_default()
            .contains("<pre>SMTP is not available.</pre>"));

        Ok(())
    }
}
