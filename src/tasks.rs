mod database_ext;
mod task;
mod task_priority;
mod task_status;

pub use self::{
    task::{Task, TaskAssignee, TaskProject},
    task_priority::TaskPriority,
    task_status::TaskStatus,
};

#[cfg(test)]
pub mod tests {
    use crate::tasks::{Task, TaskAssignee, TaskPriority, TaskProject, TaskStatus};
    use time::OffsetDateTime;

    /// Builds a task assigned to `dev@flowgrid.dev` in the `Platform` project.
    pub fn mock_task(id: &str, due_date: Option<OffsetDateTime>) -> Task {
        Task {
            id: id.to_string(),
            title: "Migrate billing to v2".to_string(),
            description: Some("Move all invoices to the new billing service.".to_string()),
            due_date,
            priority: TaskPriority::Medium,
            status: TaskStatus::Todo,
            assignee: Some(TaskAssignee {
                id: "user-1".to_string(),
                name: "Dev".to_string(),
                email: "dev@flowgrid.dev".to_string(),
            }),
            project: Some(TaskProject {
                id: "project-1".to_string(),
                name: "Platform".to_string(),
            }),
        }
    }
}
