use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Event emitted every time a task is created or re-assigned with a non-empty assignee.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentEvent {
    /// ID of the assigned task.
    pub task_id: String,
    /// Origin (base URL) of the application the task was assigned from, used to build links back
    /// to the task. Configured public URL is used if empty.
    #[serde(default)]
    pub origin: String,
}
