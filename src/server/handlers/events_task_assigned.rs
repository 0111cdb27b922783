use crate::{error::Error as FlowgridError, server::ServerState};
use actix_web::{post, web, HttpResponse};
use flowgrid_types::workflows::{AssignmentEvent, Workflow};
use tracing::error;

/// Starts a task assignment notification workflow. Should be called every time a task is created
/// with an assignee or re-assigned.
#[utoipa::path(
    tags = ["events"],
    request_body = AssignmentEvent,
    responses(
        (status = 201, description = "Workflow was successfully started.", body = Workflow),
        (status = BAD_REQUEST, description = "Event is malformed or doesn't reference any task.")
    )
)]
#[post("/api/events/task_assigned")]
pub async fn events_task_assigned(
    state: web::Data<ServerState>,
    event: web::Json<AssignmentEvent>,
) -> Result<HttpResponse, FlowgridError> {
    match state
        .api
        .workflows()
        .start_assignment_workflow(event.into_inner())
        .await
    {
        Ok(workflow) => Ok(HttpResponse::Created().json(workflow)),
        Err(err) => {
            error!("Failed to start task assignment workflow: {err:?}");
            Err(err.into())
        }
    }
}
