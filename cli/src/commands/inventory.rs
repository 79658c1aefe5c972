use super::{ConfigArgs, connect_source, uaa_client};
use anyhow::Result;
use clap::Args;
use config::MigratorConfig;

#[derive(Args, Debug)]
pub struct InventoryArgs {
    #[command(flatten)]
    pub config: ConfigArgs
}

pub async fn run(_args: InventoryArgs, config: MigratorConfig) -> Result<()> {
    let uaa = uaa_client(&config)?;
    let retriever = connect_source(&config, &uaa).await?;

    migrator::inventory(retriever, &mut std::io::stderr()).await?;
    Ok(())
}
