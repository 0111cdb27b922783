pub mod events_task_assigned;
pub mod status_get;
pub mod workflows_get;

use crate::server::Status;
use flowgrid_types::workflows::{AssignmentEvent, Workflow, WorkflowState};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Flowgrid"),
    paths(
        status_get::status_get,
        events_task_assigned::events_task_assigned,
        workflows_get::workflows_get
    ),
    components(schemas(AssignmentEvent, Status, Workflow, WorkflowState))
)]
pub(super) struct FlowgridOpenApi;
