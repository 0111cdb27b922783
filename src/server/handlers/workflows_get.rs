use crate::{error::Error as FlowgridError, server::ServerState};
use actix_web::{get, web, HttpResponse};
use flowgrid_types::workflows::Workflow;
use tracing::error;
use uuid::Uuid;

/// Gets a task assignment notification workflow with the specified ID.
#[utoipa::path(
    tags = ["workflows"],
    params(
        ("workflow_id" = Uuid, Path, description = "A unique workflow ID."),
    ),
    responses(
        (status = 200, description = "Workflow with the specified ID.", body = Workflow),
        (status = NOT_FOUND, description = "Workflow with the specified ID was not found or the ID is not a valid UUID.")
    )
)]
#[get("/api/workflows/{workflow_id}")]
pub async fn workflows_get(
    state: web::Data<ServerState>,
    workflow_id: web::Path<Uuid>,
) -> Result<HttpResponse, FlowgridError> {
    match state.api.workflows().get_workflow(*workflow_id).await {
        Ok(Some(workflow)) => Ok(HttpResponse::Ok().json(workflow)),
        Ok(None) => Ok(HttpResponse::NotFound().finish()),
        Err(err) => {
            error!("Failed to retrieve workflow: {err:?}");
            Err(err.into())
        }
    }
}
