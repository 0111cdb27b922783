use std::{fmt, str::FromStr};

/// Status of the task as stored by the task management application.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Task is assigned, and the assignee is notified, but the work hasn't started yet.
    Todo,
    InProgress,
    /// Terminal status, reminders are never sent for completed tasks.
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "TODO" => Self::Todo,
            "IN_PROGRESS" => Self::InProgress,
            "DONE" => Self::Done,
            _ => anyhow::bail!("Unknown task status: {value}"),
        })
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
