use crate::{
    error::Error as FlowgridError,
    server::{ServerState, Status},
};
use actix_web::{get, web, HttpResponse};

/// Gets server status.
#[utoipa::path(
    tags = ["platform"],
    responses(
        (status = 200, body = Status)
    )
)]
#[get("/api/status")]
pub async fn status_get(state: web::Data<ServerState>) -> Result<HttpResponse, FlowgridError> {
    Ok(HttpResponse::Ok().json(state.status()))
}
