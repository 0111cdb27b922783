mod status;

pub use self::status::Status;
use crate::{
    api::Api,
    network::{EmailTransport, EmailTransportError},
    scheduler::Scheduler,
};
use lettre::{AsyncSmtpTransport, Tokio1Executor};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct ServerState<ET: EmailTransport = AsyncSmtpTransport<Tokio1Executor>> {
    pub api: Arc<Api<ET>>,
    pub scheduler: Mutex<Scheduler<ET>>,
    /// Version of the API server.
    version: String,
}

impl<ET: EmailTransport> ServerState<ET>
where
    ET::Error: EmailTransportError,
{
    pub fn new(api: Arc<Api<ET>>, scheduler: Scheduler<ET>) -> Self {
        Self {
            api,
            scheduler: Mutex::new(scheduler),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Stops the scheduler, steps that are still pending are picked up after the next start.
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        let mut scheduler = self.scheduler.lock().await;
        scheduler.shutdown().await?;

        Ok(())
    }

    /// Gets the status of the server.
    pub fn status(&self) -> Status {
        Status {
            version: self.version.clone(),
        }
    }
}
