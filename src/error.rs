use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use anyhow::anyhow;
use std::fmt::{Debug, Display, Formatter};

/// Describes the kind of the application error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The error was caused by the invalid input supplied by the client (e.g. malformed event).
    ClientError,
    Unknown,
}

/// Application error that keeps the root cause along with the error kind.
#[derive(thiserror::Error)]
#[error("{root_cause}")]
pub struct Error {
    root_cause: anyhow::Error,
    kind: ErrorKind,
}

impl Error {
    /// Creates a client error with the specified message.
    pub fn client<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self {
            root_cause: anyhow!(message),
            kind: ErrorKind::ClientError,
        }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::ClientError => StatusCode::BAD_REQUEST,
            ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self.kind() {
            ErrorKind::ClientError => self.root_cause.to_string(),
            ErrorKind::Unknown => "Internal Server Error".to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({ "message": message }))
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.root_cause, f)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<Error>() {
            Ok(err) => err,
            Err(root_cause) => Self {
                root_cause,
                kind: ErrorKind::Unknown,
            },
        }
    }
}
