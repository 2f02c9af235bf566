use anyhow::{Context, Result};
use clap::Parser;

use fetcher::cli::Cli;
use fetcher::{cycle, logging, source};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_config()).context("failed to initialize logging")?;

    let files = cli.data_files();
    tracing::info!(
        api_url = %cli.api_url,
        data_dir = %cli.data_dir.display(),
        dry_run = cli.dry_run,
        "starting fetch cycle"
    );

    let client = source::build_client(cli.timeout()).context("failed to build HTTP client")?;
    let report = match cycle::run(&client, &cli.api_url, &files, cli.dry_run).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(error = %err, "cycle aborted");
            return Err(err).context("fetch cycle failed");
        }
    };

    report.log();
    Ok(())
}
