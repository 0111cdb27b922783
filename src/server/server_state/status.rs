use serde::Serialize;
use utoipa::ToSchema;

/// Server status.
#[derive(Clone, Serialize, ToSchema)]
pub struct Status {
    /// Version of the server.
    pub version: String,
}
