use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    distraction::logging::init().context("init logging")?;

    let cli = distraction::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        distraction::cli::Command::Serve(args) => {
            distraction::server::run(args).await.context("serve")?;
        }
        distraction::cli::Command::Quote(args) => {
            distraction::store::run(args).context("quote")?;
        }
        distraction::cli::Command::Feed(args) => {
            distraction::feed::run(args).context("feed")?;
        }
        distraction::cli::Command::Contributor(args) => {
            distraction::contributors::run(args).context("contributor")?;
        }
    }

    Ok(())
}
