//! Binary entry point.

use clap::Parser;

use yomiage_cli::Cli;
use yomiage_cli::bootstrap::{init_tracing, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli).await
}
