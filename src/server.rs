mod handlers;
mod server_state;

use crate::{
    api::Api,
    config::{Config, RawConfig},
    database::Database,
    network::Network,
    scheduler::Scheduler,
    server::handlers::FlowgridOpenApi,
    templates::create_templates,
};
use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer, Result};
use anyhow::Context;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    Tokio1Executor,
};
use sqlx::postgres::PgPoolOptions;
use std::{str::FromStr, sync::Arc};
use tracing::info;
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

pub use server_state::{ServerState, Status};

pub async fn run(raw_config: RawConfig) -> Result<(), anyhow::Error> {
    let database = Database::create(
        PgPoolOptions::new()
            .max_connections(raw_config.db.max_connections)
            .connect(&Database::connection_url(&raw_config.db))
            .await?,
    )
    .await?;

    let email_transport = if let Some(ref smtp_config) = raw_config.smtp {
        if let Some(ref catch_all_config) = smtp_config.catch_all {
            Mailbox::from_str(catch_all_config.recipient.as_str())
                .context("Cannot parse SMTP catch-all recipient.")?;
        }

        AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp_config.address)?
            .credentials(Credentials::new(
                smtp_config.username.clone(),
                smtp_config.password.clone(),
            ))
            .build()
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::unencrypted_localhost()
    };

    let http_port = raw_config.port;
    let api = Arc::new(Api::new(
        Config::from(raw_config),
        database,
        Network::new(email_transport),
        create_templates()?,
    ));

    let scheduler = Scheduler::start(api.clone()).await?;
    let state = web::Data::new(ServerState::new(api, scheduler));
    let http_server_state = state.clone();
    let http_server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compat::new(TracingLogger::default()))
            .wrap(middleware::Compat::new(middleware::Compress::default()))
            .wrap(middleware::NormalizePath::trim())
            .app_data(http_server_state.clone())
            .service(RapiDoc::with_openapi(
                "/api-docs/openapi.json",
                FlowgridOpenApi::openapi(),
            ))
            .service(handlers::status_get::status_get)
            .service(handlers::events_task_assigned::events_task_assigned)
            .service(handlers::workflows_get::workflows_get)
            .wrap(Cors::permissive())
    });

    let http_server_url = format!("0.0.0.0:{}", http_port);
    let http_server = http_server
        .bind(&http_server_url)
        .with_context(|| format!("Failed to bind to {http_server_url}."))?;

    info!("Flowgrid API server is available at http://{http_server_url}");

    http_server
        .run()
        .await
        .context("Failed to run Flowgrid API server.")?;

    info!("Flowgrid API server stopped, shutting down scheduler.");
    state.shutdown().await?;

    Ok(())
}
