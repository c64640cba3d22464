use anyhow::Result;
use clap::Parser;
use teller::cli::Cli;
use teller::logging::{LoggingConfig, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig::new(cli.verbose))?;
    cli.run().await
}
