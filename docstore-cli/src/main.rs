mod cli;

use clap::Parser;
use docstore::{ConnectionProvider, ConnectionRegistry, Settings};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::new(path)?,
        None => Settings::default(),
    };
    let registry = ConnectionRegistry::new(settings);

    let output = match &cli.command {
        Command::Connections => cli::list_connections(&registry)?,
        Command::Op(op) => {
            tracing::debug!(connection = %cli.connection, operation = ?op, "starting");
            let client = registry.get_client_by_name(&cli.connection).await?;

            op.run(&client).await?
        }
    };
    println!("{}", output);

    Ok(())
}
