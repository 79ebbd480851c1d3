use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tally::cli::{Cli, init_tracing};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.run().await
}
