use crate::tasks::{Task, TaskAssignee};
use time::{Duration, OffsetDateTime};

/// How long before the due date the reminder is sent.
pub const REMINDER_LEAD_TIME: Duration = Duration::days(1);

/// Calculates when the due date reminder should be sent. Returns `None` if the task has no due
/// date, or if the reminder time isn't strictly in the future (task is due within the lead time
/// or already overdue).
pub fn reminder_time(
    due_date: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> Option<OffsetDateTime> {
    let remind_at = due_date?.checked_sub(REMINDER_LEAD_TIME)?;
    (remind_at > now).then_some(remind_at)
}

/// Reason the due date reminder isn't sent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReminderSuppressReason {
    TaskNotFound,
    TaskDone,
    NoAssignee,
}

/// Decision whether the due date reminder should be sent for the freshly fetched task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderDecision<'t> {
    Send {
        task: &'t Task,
        assignee: &'t TaskAssignee,
    },
    Suppress(ReminderSuppressReason),
}

impl<'t> ReminderDecision<'t> {
    /// Makes a decision based solely on the current state of the task.
    pub fn decide(task: Option<&'t Task>) -> Self {
        let Some(task) = task else {
            return Self::Suppress(ReminderSuppressReason::TaskNotFound);
        };

        if task.status.is_done() {
            return Self::Suppress(ReminderSuppressReason::TaskDone);
        }

        match task.assignee {
            Some(ref assignee) => Self::Send { task, assignee },
            None => Self::Suppress(ReminderSuppressReason::NoAssignee),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{reminder_time, ReminderDecision, ReminderSuppressReason};
    use crate::tasks::{tests::mock_task, Task, TaskStatus};
    use time::{Duration, OffsetDateTime};

    #[test]
    fn reminder_is_one_day_before_due_date() -> anyhow::Result<()> {
        let now = OffsetDateTime::from_unix_timestamp(946720800)?;

        assert_eq!(
            reminder_time(Some(now + Duration::days(3)), now),
            Some(now + Duration::days(2))
        );
        assert_eq!(
            reminder_time(Some(now + Duration::days(1) + Duration::seconds(1)), now),
            Some(now + Duration::seconds(1))
        );

        Ok(())
    }

    #[test]
    fn no_reminder_if_due_too_soon() -> anyhow::Result<()> {
        let now = OffsetDateTime::from_unix_timestamp(946720800)?;

        assert_eq!(reminder_time(Some(now + Duration::hours(2)), now), None);
        // Reminder time must be strictly in the future.
        assert_eq!(reminder_time(Some(now + Duration::days(1)), now), None);
        assert_eq!(reminder_time(Some(now - Duration::days(5)), now), None);
        assert_eq!(reminder_time(None, now), None);

        Ok(())
    }

    #[test]
    fn sends_reminder_for_active_assigned_task() {
        let task = mock_task("task-1", None);
        assert_eq!(
            ReminderDecision::decide(Some(&task)),
            ReminderDecision::Send {
                task: &task,
                assignee: task.assignee.as_ref().unwrap(),
            }
        );

        let task = Task {
            status: TaskStatus::InProgress,
            ..task
        };
        assert!(matches!(
            ReminderDecision::decide(Some(&task)),
            ReminderDecision::Send { .. }
        ));
    }

    #[test]
    fn suppresses_reminder() {
        assert_eq!(
            ReminderDecision::decide(None),
            ReminderDecision::Suppress(ReminderSuppressReason::TaskNotFound)
        );

        let task = Task {
            status: TaskStatus::Done,
            ..mock_task("task-1", None)
        };
        assert_eq!(
            ReminderDecision::decide(Some(&task)),
            ReminderDecision::Suppress(ReminderSuppressReason::TaskDone)
        );

        let task = Task {
            assignee: None,
            ..mock_task("task-1", None)
        };
        assert_eq!(
            ReminderDecision::decide(Some(&task)),
            ReminderDecision::Suppress(ReminderSuppressReason::NoAssignee)
        );
    }

    #[test]
    fn decision_is_repeatable() {
        for task in [
            None,
            Some(mock_task("task-1", None)),
            Some(Task {
                status: TaskStatus::Done,
                ..mock_task("task-2", None)
            }),
        ] {
            assert_eq!(
                ReminderDecision::decide(task.as_ref()),
                ReminderDecision::decide(task.as_ref())
            );
        }
    }
}
