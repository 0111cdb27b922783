#![deny(warnings)]

mod api;
mod config;
mod database;
mod error;
mod network;
mod notifications;
mod scheduler;
mod server;
mod tasks;
mod templates;
mod workflows;

use crate::config::RawConfig;
use anyhow::anyhow;
use clap::{crate_authors, crate_description, crate_version, value_parser, Arg, Command};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    if env::var("RUST_LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt().json().flatten_event(true).init();
    } else {
        tracing_subscriber::fmt::init();
    }

    // Install default crypto provider.
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default RusTLS crypto provider."))?;

    let matches = Command::new("Flowgrid notifications server.")
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg(
            Arg::new("CONFIG")
                .env("FLOWGRID_CONFIG")
                .short('c')
                .long("config")
                .default_value("flowgrid.toml")
                .help("Path to the Flowgrid configuration file."),
        )
        .arg(
            Arg::new("PORT")
                .env("FLOWGRID_PORT")
                .short('p')
                .long("port")
                .value_parser(value_parser!(u16))
                .help("Defines a TCP port to listen on."),
        )
        .get_matches();

    let mut raw_config = RawConfig::read_from_file(
        matches
            .get_one::<String>("CONFIG")
            .ok_or_else(|| anyhow!("<CONFIG> argument is not provided."))?,
    )?;

    // CLI argument takes precedence.
    if let Some(port) = matches.get_one::<u16>("PORT") {
        raw_config.port = *port;
    }

    info!(config = ?raw_config, "Flowgrid raw configuration.");

    server::run(raw_config).await
}
