mod cli;
mod runner;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();
    engine_logging::initialize(cli.log.into(), cli.log_level.into());
    runner::run(cli).await
}
