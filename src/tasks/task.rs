use crate::tasks::{TaskPriority, TaskStatus};
use time::OffsetDateTime;

/// User the task is delegated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskAssignee {
    pub id: String,
    /// Display name of the user.
    pub name: String,
    pub email: String,
}

/// Project the task belongs to (display context only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskProject {
    pub id: String,
    pub name: String,
}

/// Snapshot of the task record as it's stored in the task management application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Opaque ID of the task.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Date and time when the task is due, if any.
    pub due_date: Option<OffsetDateTime>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assignee: Option<TaskAssignee>,
    pub project: Option<TaskProject>,
}
