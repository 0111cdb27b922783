use crate::{
    api::Api,
    network::EmailTransport,
    notifications::{Email, NotificationContentTemplate},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standalone email delivery step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EmailStepType {
    /// List of recipients.
    pub to: Vec<String>,
    pub content: EmailStepContent,
}

/// Content of the email, rendered right before sending. Variants are stored postcard-encoded,
/// new variants must be appended to the end.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum EmailStepContent {
    /// Report about a workflow step that failed after all retries.
    WorkflowStepFailed {
        workflow_id: Option<Uuid>,
        step_type: String,
        step_tags: Vec<String>,
        error_message: String,
    },
}

impl EmailStepContent {
    /// Renders the content into an email.
    pub fn into_email<ET: EmailTransport>(self, api: &Api<ET>) -> anyhow::Result<Email> {
        match self {
            Self::WorkflowStepFailed {
                workflow_id,
                step_type,
                step_tags,
                error_message,
            } => NotificationContentTemplate::WorkflowStepFailed {
                workflow_id,
                step_type: &step_type,
                step_tags: &step_tags,
                error_message: &error_message,
            }
            .compile_to_email(api),
        }
    }
}
