use super::{ConfigArgs, connect_source, uaa_client};
use crate::tls;
use anyhow::{Context, Result};
use clap::Args;
use config::MigratorConfig;
use migrator::{Migrator, Populator, Reporter, create_http_role_service};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Retrieve and report without creating anything in Perm
    #[arg(long)]
    pub dry_run: bool
}

pub async fn run(args: MigrateArgs, config: MigratorConfig) -> Result<()> {
    let dry_run = args.dry_run || config.dry_run;

    let uaa = uaa_client(&config)?;
    let retriever = connect_source(&config, &uaa).await?;

    let namespace = match uaa.issuer().await {
        Ok(issuer) => issuer,
        Err(e) => {
            error!(error = %e, "failed-to-get-issuer-from-oidc-provider");
            return Err(e).context("failed-to-get-issuer-from-oidc-provider");
        }
    };
    info!(namespace = %namespace, "Resolved actor namespace");

    let perm_ca = tls::load_ca(&config.perm.ca_cert.clone().unwrap_or_default())?;
    let perm_url = config.perm.base_url(perm_ca.is_some());
    let perm_http = tls::with_roots(reqwest::Client::builder(), perm_ca)
        .build()
        .context("failed to build Perm client")?;
    info!(url = %perm_url, "Connecting to Perm");
    let role_service = create_http_role_service(
        &perm_url,
        perm_http,
        Duration::from_secs(config.perm.request_timeout_seconds)
    )?;

    let migrator = Migrator::new(
        retriever,
        Arc::new(Populator::new(role_service)),
        Reporter,
        namespace
    );

    let outcome = migrator.migrate(&mut std::io::stderr(), dry_run).await?;
    if outcome.has_errors() {
        info!(errors = outcome.errors, "Migration finished with errors, see report");
    }

    Ok(())
}
