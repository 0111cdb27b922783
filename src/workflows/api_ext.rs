use crate::{
    api::Api,
    config::StepRetryStrategy,
    database::Database,
    error::Error as FlowgridError,
    network::{EmailTransport, EmailTransportError},
    notifications::{reminder_time, ReminderDecision},
    workflows::{EmailStepContent, EmailStepType, WorkflowStep, WorkflowStepType},
};
use anyhow::{bail, Context};
use flowgrid_types::workflows::{AssignmentEvent, Workflow, WorkflowState};
use futures::{pin_mut, StreamExt};
use std::{cmp, ops::Add};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Defines a maximum number of workflow steps that can be retrieved from the database at once.
const MAX_STEPS_PAGE_SIZE: usize = 100;

/// Result of the successfully executed step: new state of the workflow (if changed) and the step
/// that should be executed next (if any).
#[derive(Default)]
struct StepOutcome {
    workflow: Option<Workflow>,
    next_step: Option<WorkflowStep>,
}

/// Describes the API to work with the task assignment notification workflows.
pub struct WorkflowsApi<'a, ET: EmailTransport> {
    api: &'a Api<ET>,
}

impl<'a, ET: EmailTransport> WorkflowsApi<'a, ET>
where
    ET::Error: EmailTransportError,
{
    /// Creates Workflows API.
    pub fn new(api: &'a Api<ET>) -> Self {
        Self { api }
    }

    /// Starts a new workflow instance for the task assignment event. Every event starts an
    /// independent instance, the first step is picked up by the workflow runner.
    pub async fn start_assignment_workflow(
        &self,
        event: AssignmentEvent,
    ) -> anyhow::Result<Workflow> {
        if event.task_id.trim().is_empty() {
            bail!(FlowgridError::client("Task ID cannot be empty."));
        }

        let now = Database::utc_now()?;
        let workflow = Workflow {
            id: Uuid::now_v7(),
            task_id: event.task_id.clone(),
            origin: event.origin.clone(),
            state: WorkflowState::Started,
            remind_at: None,
            created_at: now,
            updated_at: now,
        };
        let first_step = WorkflowStep {
            id: Uuid::now_v7(),
            workflow_id: Some(workflow.id),
            tags: vec![format!("task:{}", event.task_id)],
            step_type: WorkflowStepType::NotifyAssignee(event),
            scheduled_at: now,
            retry_attempt: None,
        };

        self.api
            .db
            .workflows()
            .start_workflow(&workflow, &first_step)
            .await?;

        info!(
            workflow.id = %workflow.id, task.id = %workflow.task_id,
            "Started task assignment workflow."
        );

        Ok(workflow)
    }

    /// Returns workflow by its ID.
    pub async fn get_workflow(&self, id: Uuid) -> anyhow::Result<Option<Workflow>> {
        self.api.db.workflows().get_workflow(id).await
    }

    /// Executes pending workflow steps limited by the `limit` parameter.
    pub async fn execute_pending_steps(&self, limit: usize) -> anyhow::Result<usize> {
        if limit == 0 {
            return Ok(0);
        }

        let workflows = self.api.db.workflows();
        let pending_steps_ids = workflows.get_workflow_steps_ids(
            Database::utc_now()?,
            cmp::min(MAX_STEPS_PAGE_SIZE, limit),
        );
        pin_mut!(pending_steps_ids);

        let mut executed_steps = 0;
        while let Some(step_id) = pending_steps_ids.next().await {
            let Some(step) = workflows.get_workflow_step(step_id?).await? else {
                continue;
            };

            let step_type = step.step_type.type_tag();
            match self.execute_step(&step).await {
                Ok(outcome) => {
                    debug!(
                        step.id = %step.id, step.step_type = step_type, step.tags = ?step.tags,
                        "Successfully executed workflow step."
                    );
                    workflows
                        .complete_workflow_step(
                            step.id,
                            outcome.workflow.as_ref(),
                            outcome.next_step.as_ref(),
                        )
                        .await?;
                }
                Err(err) => {
                    error!(
                        step.id = %step.id, step.step_type = step_type, step.tags = ?step.tags,
                        "Failed to execute workflow step: {err:?}"
                    );
                    self.handle_step_failure(step, err).await?;
                }
            }

            executed_steps += 1;
            if executed_steps >= limit {
                break;
            }
        }

        Ok(executed_steps)
    }

    async fn execute_step(&self, step: &WorkflowStep) -> anyhow::Result<StepOutcome> {
        debug!(
            step.id = %step.id, step.step_type = step.step_type.type_tag(), step.tags = ?step.tags,
            "Executing workflow step."
        );

        match step.step_type {
            WorkflowStepType::NotifyAssignee(ref event) => self.notify_assignee(step, event).await,
            WorkflowStepType::RemindAssignee(ref event) => self.remind_assignee(step, event).await,
            WorkflowStepType::Email(ref email_step) => {
                let email = email_step.content.clone().into_email(self.api)?;
                self.api
                    .notifications()
                    .send_email(&email_step.to, email, step.scheduled_at)
                    .await?;
                Ok(StepOutcome::default())
            }
        }
    }

    /// Fetches the task, notifies the assignee and arms the due date reminder, if needed.
    async fn notify_assignee(
        &self,
        step: &WorkflowStep,
        event: &AssignmentEvent,
    ) -> anyhow::Result<StepOutcome> {
        let workflow = self.get_step_workflow(step).await?;

        let task = self.api.db.tasks().get_task(&event.task_id).await?;
        let Some((task, assignee)) =
            task.and_then(|task| task.assignee.clone().map(|assignee| (task, assignee)))
        else {
            info!(
                workflow.id = %workflow.id, task.id = %event.task_id,
                "Task doesn't exist or isn't assigned to anyone, no notifications will be sent."
            );
            return Ok(StepOutcome {
                workflow: Some(transition(workflow, WorkflowState::NoAssignee)?),
                next_step: None,
            });
        };

        let workflows = self.api.db.workflows();
        let workflow = transition(workflow, WorkflowState::TaskFetched)?;
        workflows.update_workflow(&workflow).await?;

        self.api
            .notifications()
            .send_task_assigned_email(&task, &assignee, &event.origin, step.scheduled_at)
            .await?;
        let workflow = transition(workflow, WorkflowState::AssignmentEmailSent)?;
        workflows.update_workflow(&workflow).await?;

        let Some(remind_at) = reminder_time(task.due_date, Database::utc_now()?) else {
            debug!(
                workflow.id = %workflow.id, task.id = %task.id,
                "Task isn't due far enough in the future, reminder isn't needed."
            );
            return Ok(StepOutcome {
                workflow: Some(transition(workflow, WorkflowState::NoReminderNeeded)?),
                next_step: None,
            });
        };

        let workflow = Workflow {
            remind_at: Some(remind_at),
            ..transition(workflow, WorkflowState::ReminderScheduled)?
        };
        workflows.update_workflow(&workflow).await?;

        info!(
            workflow.id = %workflow.id, task.id = %task.id,
            "Scheduled due date reminder at {remind_at}."
        );

        Ok(StepOutcome {
            next_step: Some(WorkflowStep {
                id: Uuid::now_v7(),
                workflow_id: Some(workflow.id),
                step_type: WorkflowStepType::RemindAssignee(event.clone()),
                tags: step.tags.clone(),
                scheduled_at: remind_at,
                retry_attempt: None,
            }),
            workflow: Some(transition(workflow, WorkflowState::Waiting)?),
        })
    }

    /// Re-fetches the task and sends the due date reminder unless the task is done, deleted or
    /// unassigned.
    async fn remind_assignee(
        &self,
        step: &WorkflowStep,
        event: &AssignmentEvent,
    ) -> anyhow::Result<StepOutcome> {
        let workflow = self.get_step_workflow(step).await?;

        let task = self.api.db.tasks().get_task(&event.task_id).await?;
        let state = match ReminderDecision::decide(task.as_ref()) {
            ReminderDecision::Suppress(reason) => {
                info!(
                    workflow.id = %workflow.id, task.id = %event.task_id,
                    "Due date reminder is suppressed ({reason:?})."
                );
                WorkflowState::ReminderSuppressed
            }
            ReminderDecision::Send { task, assignee } => {
                self.api
                    .notifications()
                    .send_task_reminder_email(task, assignee, &event.origin, step.scheduled_at)
                    .await?;
                WorkflowState::ReminderSent
            }
        };

        Ok(StepOutcome {
            workflow: Some(transition(workflow, state)?),
            next_step: None,
        })
    }

    /// Re-schedules the failed step, or gives up on it if there are no retries left.
    async fn handle_step_failure(
        &self,
        step: WorkflowStep,
        err: anyhow::Error,
    ) -> anyhow::Result<()> {
        let workflows = self.api.db.workflows();
        let step_type = step.step_type.type_tag();

        let retry_attempt = step.retry_attempt.unwrap_or_default();
        if let Some(retry_in) = self
            .get_step_retry_strategy(&step.step_type)
            .next_retry_in(retry_attempt)
        {
            let next_at = Database::utc_now()?.add(retry_in);
            warn!(
                step.id = %step.id, step.step_type = step_type, step.tags = ?step.tags,
                metrics.step_retries = retry_attempt + 1,
                "Scheduled a workflow step retry in {} ({next_at}).",
                humantime::format_duration(retry_in)
            );

            return workflows
                .update_workflow_step(&WorkflowStep {
                    retry_attempt: Some(retry_attempt + 1),
                    scheduled_at: next_at,
                    ..step
                })
                .await;
        }

        warn!(
            step.id = %step.id, step.step_type = step_type, step.tags = ?step.tags,
            "Retry limit reached ('{retry_attempt}') for a workflow step."
        );

        let failed_workflow = match step.workflow_id {
            Some(workflow_id) => workflows
                .get_workflow(workflow_id)
                .await?
                .map(|workflow| transition(workflow, WorkflowState::Failed))
                .transpose()?,
            None => None,
        };

        let report_step = self.failure_report_step(&step, err)?;
        workflows
            .complete_workflow_step(step.id, failed_workflow.as_ref(), report_step.as_ref())
            .await
    }

    /// Builds a step that reports the failed step to the catch-all recipient, if configured.
    fn failure_report_step(
        &self,
        step: &WorkflowStep,
        err: anyhow::Error,
    ) -> anyhow::Result<Option<WorkflowStep>> {
        let step_type = step.step_type.type_tag();
        let Some(ref smtp) = self.api.config.smtp else {
            warn!(
                step.id = %step.id, step.step_type = step_type, step.tags = ?step.tags,
                "Failed to report failed workflow step: SMTP configuration is missing."
            );
            return Ok(None);
        };

        let Some(ref catch_all) = smtp.catch_all else {
            warn!(
                step.id = %step.id, step.step_type = step_type, step.tags = ?step.tags,
                "Failed to report failed workflow step: catch-all recipient is missing."
            );
            return Ok(None);
        };

        // Email steps only deliver failure reports, these are never reported again.
        if let WorkflowStepType::Email(_) = step.step_type {
            error!(
                step.id = %step.id, step.step_type = step_type, step.tags = ?step.tags,
                "Failed to report failed workflow step: {err}."
            );
            return Ok(None);
        }

        Ok(Some(WorkflowStep {
            id: Uuid::now_v7(),
            workflow_id: None,
            step_type: WorkflowStepType::Email(EmailStepType {
                to: vec![catch_all.recipient.clone()],
                content: EmailStepContent::WorkflowStepFailed {
                    workflow_id: step.workflow_id,
                    step_type: step_type.to_string(),
                    step_tags: step.tags.clone(),
                    error_message: err
                        .downcast::<FlowgridError>()
                        .map(|err| format!("{err}"))
                        .unwrap_or_else(|_| "Unknown error".to_string()),
                },
            }),
            tags: step.tags.clone(),
            scheduled_at: Database::utc_now()?,
            retry_attempt: None,
        }))
    }

    async fn get_step_workflow(&self, step: &WorkflowStep) -> anyhow::Result<Workflow> {
        let workflow_id = step
            .workflow_id
            .with_context(|| format!("Workflow step ({}) doesn't belong to any workflow.", step.id))?;
        self.api
            .db
            .workflows()
            .get_workflow(workflow_id)
            .await?
            .with_context(|| format!("Workflow ({workflow_id}) doesn't exist."))
    }

    /// Returns retry strategy for the specified step type.
    fn get_step_retry_strategy(&self, step_type: &WorkflowStepType) -> &StepRetryStrategy {
        let workflows_config = &self.api.config.workflows;
        match step_type {
            WorkflowStepType::NotifyAssignee(_) | WorkflowStepType::RemindAssignee(_) => {
                &workflows_config.notifications.retry_strategy
            }
            WorkflowStepType::Email(_) => &workflows_config.email.retry_strategy,
        }
    }
}

/// Moves workflow to the specified state.
fn transition(workflow: Workflow, state: WorkflowState) -> anyhow::Result<Workflow> {
    Ok(Workflow {
        state,
        updated_at: Database::utc_now()?,
        ..workflow
    })
}

impl<ET: EmailTransport> Api<ET>
where
    ET::Error: EmailTransportError,
{
    /// Returns an API to work with workflows.
    pub fn workflows(&self) -> WorkflowsApi<'_, ET> {
        WorkflowsApi::new(self)
    }
}
