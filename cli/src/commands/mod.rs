pub mod inventory;
pub mod migrate;

use crate::{tls, uaa};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::MigratorConfig;
use migrator::{CloudControllerClient, Retriever};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "cc-to-perm-migrator",
    author,
    version,
    about = "Migrates Cloud Controller organization and space role assignments into Perm"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Recreate roles and role assignments in Perm")]
    Migrate(migrate::MigrateArgs),

    #[command(about = "Count role assignments without touching Perm")]
    Inventory(inventory::InventoryArgs)
}

impl Commands {
    pub fn config_file_path(&self) -> &Path {
        match self {
            Self::Migrate(args) => &args.config.config_file_path,
            Self::Inventory(args) => &args.config.config_file_path
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    #[arg(long, value_name = "PATH")]
    pub config_file_path: PathBuf
}

pub(crate) fn uaa_client(config: &MigratorConfig) -> Result<uaa::UaaClient> {
    let http = tls::client_builder(&config.uaa.ca_cert_path)?
        .build()
        .context("failed to build UAA client")?;
    Ok(uaa::UaaClient::new(&config.uaa.url, http))
}

/// Authenticates against UAA and returns a retriever reading the Cloud
/// Controller with that token.
pub(crate) async fn connect_source(
    config: &MigratorConfig,
    uaa: &uaa::UaaClient
) -> Result<Arc<Retriever>> {
    let cc = &config.cloud_controller;
    let token = uaa
        .client_credentials_token(&cc.client_id, &cc.client_secret, &cc.client_scopes)
        .await
        .context("failed to obtain Cloud Controller token")?;
    info!(client_id = %cc.client_id, "Obtained Cloud Controller token");

    let http = uaa::authorized_client(tls::client_builder(&cc.ca_cert_path)?, &token)?;
    let client = CloudControllerClient::new(
        &cc.url,
        http,
        Duration::from_secs(cc.request_timeout_seconds)
    )?;

    Ok(Arc::new(Retriever::new(Arc::new(client))))
}
